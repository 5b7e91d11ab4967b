//! Content detectors.
//!
//! Each detector is a pure function of the input text and its static
//! lexicon tables. Detectors produce their own report types and expose
//! findings through the common [`FlagSource`] capability, which is all the
//! coordinator consumes.

mod personal_info;
mod profanity;
mod sentiment;
mod spam;
mod toxicity;

use serde::{Deserialize, Serialize};

use crate::models::Flag;

pub use personal_info::{PersonalInfoDetector, PersonalInfoReport};
pub use profanity::{ProfanityDetector, ProfanityReport};
pub use sentiment::{SentimentAnalyzer, SentimentCategory, SentimentReport};
pub use spam::{SpamDetector, SpamReport};
pub use toxicity::{ToxicityDetector, ToxicityReport, ToxicityScores};

/// The detector categories, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    Profanity,
    Sentiment,
    Toxicity,
    Spam,
    PersonalInfo,
}

impl DetectorKind {
    /// Returns all detector kinds in the order they contribute flags.
    pub fn all() -> &'static [DetectorKind] {
        &[
            DetectorKind::Profanity,
            DetectorKind::Sentiment,
            DetectorKind::Toxicity,
            DetectorKind::Spam,
            DetectorKind::PersonalInfo,
        ]
    }

    /// Returns the stable name of this detector.
    pub fn name(&self) -> &'static str {
        match self {
            DetectorKind::Profanity => "profanity",
            DetectorKind::Sentiment => "sentiment",
            DetectorKind::Toxicity => "toxicity",
            DetectorKind::Spam => "spam",
            DetectorKind::PersonalInfo => "personal_info",
        }
    }
}

/// Anything that contributes flags to a moderation verdict.
pub trait FlagSource {
    /// Returns the flags this result contributes, possibly none.
    fn flags(&self) -> Vec<Flag>;
}

/// A content detector.
///
/// All detectors in the pipeline implement this trait so the coordinator can
/// schedule them uniformly.
pub trait Detector: Send + Sync {
    /// Detector-specific result type.
    type Report: FlagSource;

    /// Returns which category this detector covers.
    fn kind(&self) -> DetectorKind;

    /// Analyzes the text.
    fn analyze(&self, text: &str) -> Self::Report;

    /// Analyzes the text and returns only the resulting flags.
    fn detect(&self, text: &str) -> Vec<Flag> {
        self.analyze(text).flags()
    }
}

/// Ratio of uppercase characters to all characters.
pub(crate) fn uppercase_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let upper = text.chars().filter(|c| c.is_uppercase()).count();
    upper as f32 / total as f32
}

/// Number of occurrences of `needle` in `text`.
pub(crate) fn count_char(text: &str, needle: char) -> usize {
    text.chars().filter(|&c| c == needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_kind_order() {
        let names: Vec<_> = DetectorKind::all().iter().map(|k| k.name()).collect();
        assert_eq!(
            names,
            vec!["profanity", "sentiment", "toxicity", "spam", "personal_info"]
        );
    }

    #[test]
    fn uppercase_ratio_counts_all_characters() {
        assert_eq!(uppercase_ratio(""), 0.0);
        assert_eq!(uppercase_ratio("ABCD"), 1.0);
        assert_eq!(uppercase_ratio("AB  "), 0.5);
    }

    #[test]
    fn count_char_counts_occurrences() {
        assert_eq!(count_char("a!b!c!", '!'), 3);
        assert_eq!(count_char("none", '?'), 0);
    }
}
