//! Spam detection.
//!
//! Unlike the other detectors, spam signals are additive: each heuristic
//! adds to the score, which is clipped to 1.0.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{count_char, uppercase_ratio, Detector, DetectorKind, FlagSource};
use crate::models::{Flag, Severity};

/// Score above which content is considered spam.
pub const SPAM_THRESHOLD: f32 = 0.6;

/// Placeholder substituted for links in `clean_content`.
pub const URL_PLACEHOLDER: &str = "[URL]";

const URL_WEIGHT: f32 = 0.5;
const CAPS_WEIGHT: f32 = 0.4;
const PUNCTUATION_WEIGHT: f32 = 0.3;
const REPETITION_WEIGHT: f32 = 0.2;
const SUSPICIOUS_WEIGHT: f32 = 0.6;

/// Promotional and scam phrases with their score contribution.
const SPAM_PHRASES: &[(&str, f32)] = &[
    ("buy now", 0.7),
    ("free money", 0.9),
    ("make money fast", 0.9),
    ("limited time", 0.6),
    ("limited offer", 0.6),
    ("act now", 0.6),
    ("click here", 0.6),
    ("order now", 0.6),
    ("call now", 0.5),
    ("earn cash", 0.7),
    ("cash bonus", 0.6),
    ("double your income", 0.8),
    ("work from home", 0.5),
    ("no credit check", 0.7),
    ("risk free", 0.5),
    ("100% free", 0.7),
    ("guaranteed", 0.4),
    ("winner", 0.5),
    ("you have won", 0.8),
    ("claim your prize", 0.8),
    ("congratulations you", 0.6),
    ("lose weight fast", 0.7),
    ("miracle cure", 0.8),
    ("once in a lifetime", 0.5),
    ("exclusive deal", 0.5),
    ("special promotion", 0.5),
];

/// Suspicious content shapes. Any match adds a flat score once.
const SUSPICIOUS_PATTERNS: &[&str] = &[
    r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b",
    r"\b\d{3}[\s-]?\d{2}[\s-]?\d{4}\b",
    r"\d{10,}",
    r"\b[A-Z]{5,}\b",
    r"\$\d+",
    r"\d+%",
    r"(?i)\bfree \w+",
    r"(?i)\blimited time\b",
    r"(?i)\bact now\b",
    r"(?i)\bclick here\b",
    r"(?i)\bbuy now\b",
];

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)https?://\S+|\bwww\.\S+|\b(?:bit\.ly|tinyurl\.com|goo\.gl|t\.co|ow\.ly|is\.gd|buff\.ly)/\S*",
    )
    .expect("URL pattern is valid")
});

static REPEATED_BANG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!{2,}").expect("bang pattern is valid"));

static REPEATED_QUESTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\?{2,}").expect("question pattern is valid"));

/// Result of spam detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpamReport {
    pub is_spam: bool,
    /// Additive score clipped to `[0, 1]`.
    pub spam_score: f32,
    /// Heuristics that contributed to the score.
    pub reasons: Vec<String>,
    /// Number of links found.
    pub url_count: usize,
    /// Content with links replaced and repeated `!`/`?` collapsed.
    pub clean_content: String,
}

impl FlagSource for SpamReport {
    fn flags(&self) -> Vec<Flag> {
        if !self.is_spam {
            return Vec::new();
        }

        let mut flag = Flag::new(
            "spam",
            Severity::Medium,
            self.spam_score,
            "Content appears to be spam or overly promotional",
        )
        .with_suggestion("Reduce promotional phrases, links and excessive punctuation");

        if !self.reasons.is_empty() {
            flag = flag.with_flagged_text(self.reasons.join(", "));
        }

        vec![flag]
    }
}

/// Heuristic spam detector.
pub struct SpamDetector {
    suspicious: RegexSet,
}

impl SpamDetector {
    /// Creates a detector with the default phrase table and patterns.
    pub fn new() -> Self {
        Self {
            suspicious: RegexSet::new(SUSPICIOUS_PATTERNS).expect("Invalid suspicious patterns"),
        }
    }

    /// Counts link-like substrings.
    pub fn count_urls(text: &str) -> usize {
        URL_RE.find_iter(text).count()
    }

    /// Replaces links with a placeholder and collapses repeated `!`/`?`.
    pub fn clean_content(text: &str) -> String {
        let without_urls = URL_RE.replace_all(text, URL_PLACEHOLDER);
        let collapsed = REPEATED_BANG_RE.replace_all(&without_urls, "!");
        REPEATED_QUESTION_RE
            .replace_all(&collapsed, "?")
            .into_owned()
    }

    /// Scores text for spam.
    pub fn check(&self, text: &str) -> SpamReport {
        let lower = text.to_lowercase();
        let mut score = 0.0f32;
        let mut reasons = Vec::new();

        // Promotional phrases
        for (phrase, weight) in SPAM_PHRASES {
            if lower.contains(phrase) {
                score += weight;
                reasons.push(phrase.to_string());
            }
        }

        // Link density
        let url_count = Self::count_urls(text);
        if url_count > 2 {
            score += URL_WEIGHT * url_count as f32;
            reasons.push(format!("{} links", url_count));
        }

        // Shouting
        if uppercase_ratio(text) > 0.5 && text.chars().count() > 20 {
            score += CAPS_WEIGHT;
            reasons.push("excessive capitalization".to_string());
        }

        // Punctuation
        if count_char(text, '!') > 2 || count_char(text, '?') > 3 {
            score += PUNCTUATION_WEIGHT;
            reasons.push("excessive punctuation".to_string());
        }

        // Word repetition
        let mut word_counts: HashMap<&str, usize> = HashMap::new();
        for word in lower.split(|c: char| !c.is_alphanumeric()) {
            if word.chars().count() > 3 {
                *word_counts.entry(word).or_insert(0) += 1;
            }
        }
        let mut repeated: Vec<&str> = word_counts
            .into_iter()
            .filter(|(_, count)| *count > 3)
            .map(|(word, _)| word)
            .collect();
        repeated.sort_unstable();
        for word in repeated {
            score += REPETITION_WEIGHT;
            reasons.push(format!("repeated word '{}'", word));
        }

        // Suspicious shapes
        if self.suspicious.is_match(text) {
            score += SUSPICIOUS_WEIGHT;
            reasons.push("suspicious pattern".to_string());
        }

        let spam_score = score.min(1.0);
        let is_spam = spam_score > SPAM_THRESHOLD;

        debug!(spam_score, is_spam, url_count, "Spam scored");

        SpamReport {
            is_spam,
            spam_score,
            reasons,
            url_count,
            clean_content: Self::clean_content(text),
        }
    }
}

impl Default for SpamDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SpamDetector {
    type Report = SpamReport;

    fn kind(&self) -> DetectorKind {
        DetectorKind::Spam
    }

    fn analyze(&self, text: &str) -> SpamReport {
        self.check(text)
    }
}
