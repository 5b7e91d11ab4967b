//! Structural limits imposed by individual platforms.

use crate::detector::FlagSource;
use crate::models::{Flag, Platform, Severity};

/// Maximum characters in a Twitter post.
pub const TWITTER_CHAR_LIMIT: usize = 280;
/// Maximum hashtags in an Instagram post.
pub const INSTAGRAM_HASHTAG_LIMIT: usize = 30;
/// Maximum mentions in a LinkedIn post.
pub const LINKEDIN_MENTION_LIMIT: usize = 5;

/// A platform limit that the content exceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    CharacterLimit { length: usize, limit: usize },
    HashtagLimit { count: usize, limit: usize },
    MentionLimit { count: usize, limit: usize },
}

impl PolicyViolation {
    /// Returns the flag type for this violation.
    pub fn flag_type(&self) -> &'static str {
        match self {
            PolicyViolation::CharacterLimit { .. } => "character_limit",
            PolicyViolation::HashtagLimit { .. } => "hashtag_limit",
            PolicyViolation::MentionLimit { .. } => "mention_limit",
        }
    }

    fn to_flag(self) -> Flag {
        let (description, suggestion) = match self {
            PolicyViolation::CharacterLimit { length, limit } => (
                format!("Content exceeds the {limit} character limit ({length} characters)"),
                format!("Shorten the post to {limit} characters or split it into a thread"),
            ),
            PolicyViolation::HashtagLimit { count, limit } => (
                format!("Content uses {count} hashtags, more than the {limit} allowed"),
                format!("Keep hashtags to {limit} or fewer"),
            ),
            PolicyViolation::MentionLimit { count, limit } => (
                format!("Content mentions {count} accounts, more than the recommended {limit}"),
                format!("Mention {limit} or fewer people per post"),
            ),
        };
        Flag::new(self.flag_type(), Severity::Low, 1.0, description).with_suggestion(suggestion)
    }
}

/// Result of checking content against a platform's limits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyReport {
    pub violations: Vec<PolicyViolation>,
}

impl FlagSource for PolicyReport {
    fn flags(&self) -> Vec<Flag> {
        self.violations.iter().map(|v| v.to_flag()).collect()
    }
}

/// Checks content against the limits of the target platform.
pub fn check(content: &str, platform: Platform) -> PolicyReport {
    let mut violations = Vec::new();

    match platform {
        Platform::Twitter => {
            let length = content.chars().count();
            if length > TWITTER_CHAR_LIMIT {
                violations.push(PolicyViolation::CharacterLimit {
                    length,
                    limit: TWITTER_CHAR_LIMIT,
                });
            }
        }
        Platform::Instagram => {
            let count = content.matches('#').count();
            if count > INSTAGRAM_HASHTAG_LIMIT {
                violations.push(PolicyViolation::HashtagLimit {
                    count,
                    limit: INSTAGRAM_HASHTAG_LIMIT,
                });
            }
        }
        Platform::Linkedin => {
            let count = content.matches('@').count();
            if count > LINKEDIN_MENTION_LIMIT {
                violations.push(PolicyViolation::MentionLimit {
                    count,
                    limit: LINKEDIN_MENTION_LIMIT,
                });
            }
        }
        Platform::Facebook | Platform::Tiktok | Platform::Youtube => {}
    }

    PolicyReport { violations }
}

/// Returns the flags for content on the target platform.
pub fn flags(content: &str, platform: Platform) -> Vec<Flag> {
    check(content, platform).flags()
}
