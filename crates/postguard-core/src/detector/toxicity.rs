//! Toxicity detection across four independent categories.
//!
//! Each category score is the maximum confidence over its matching signals;
//! the overall toxicity score is the maximum across categories.

use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{count_char, uppercase_ratio, Detector, DetectorKind, FlagSource};
use crate::models::{Flag, Severity};

/// Score above which content is considered toxic.
pub const TOXICITY_THRESHOLD: f32 = 0.5;

const HATE_CONFIDENCE: f32 = 0.8;
const VIOLENCE_CONFIDENCE: f32 = 0.9;
const SEXUAL_CONFIDENCE: f32 = 0.7;
const SHOUTING_FLOOR: f32 = 0.3;
const PUNCTUATION_FLOOR: f32 = 0.2;

/// Toxic phrases and their confidence.
const TOXIC_PHRASES: &[(&str, f32)] = &[
    ("kill yourself", 0.9),
    ("go die", 0.8),
    ("i hate you", 0.7),
    ("nobody likes you", 0.7),
    ("you're stupid", 0.7),
    ("you are stupid", 0.7),
    ("idiot", 0.6),
    ("moron", 0.6),
    ("worthless", 0.6),
    ("shut up", 0.5),
    ("loser", 0.5),
    ("pathetic", 0.5),
];

/// Templates for group-targeted hate speech.
const HATE_PATTERNS: &[&str] = &[
    r"\ball \w+ are\b",
    r"\byou people\b",
    r"\bgo back to\b",
    r"\b(those|these) people\b",
    r"\bsubhuman\b",
];

/// Violent threat phrases.
const VIOLENCE_PHRASES: &[&str] = &[
    "i will kill",
    "i'll kill",
    "going to kill",
    "punch you",
    "beat you up",
    "hurt you",
    "shoot you",
    "stab you",
];

/// Sexual content keywords.
const SEXUAL_KEYWORDS: &[&str] = &["nude", "porn", "explicit", "xxx", "naked", "sex video"];

/// Per-category toxicity scores (0.0 to 1.0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ToxicityScores {
    pub general_toxicity: f32,
    pub hate_speech: f32,
    pub violence: f32,
    pub sexual_content: f32,
}

impl ToxicityScores {
    /// Returns the maximum across all categories.
    pub fn max(&self) -> f32 {
        self.general_toxicity
            .max(self.hate_speech)
            .max(self.violence)
            .max(self.sexual_content)
    }

    /// Returns the names of categories with a non-zero score.
    pub fn active_categories(&self) -> Vec<&'static str> {
        [
            ("general_toxicity", self.general_toxicity),
            ("hate_speech", self.hate_speech),
            ("violence", self.violence),
            ("sexual_content", self.sexual_content),
        ]
        .into_iter()
        .filter(|(_, score)| *score > 0.0)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Result of toxicity detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToxicityReport {
    pub is_toxic: bool,
    pub toxicity_score: f32,
    pub categories: ToxicityScores,
    /// Phrases and patterns that matched.
    pub matched: Vec<String>,
}

impl FlagSource for ToxicityReport {
    fn flags(&self) -> Vec<Flag> {
        if !self.is_toxic {
            return Vec::new();
        }

        let mut flag = Flag::new(
            "toxicity",
            Severity::High,
            self.toxicity_score,
            format!(
                "Content contains toxic language ({})",
                self.categories.active_categories().join(", ")
            ),
        )
        .with_suggestion("Rephrase the content using respectful language");

        if !self.matched.is_empty() {
            flag = flag.with_flagged_text(self.matched.join(", "));
        }

        vec![flag]
    }
}

/// Phrase- and pattern-based toxicity detector.
pub struct ToxicityDetector {
    /// Regex set for fast hate template matching.
    hate_set: RegexSet,
    /// Individual regexes for extracting matched text.
    hate_regexes: Vec<Regex>,
}

impl ToxicityDetector {
    /// Creates a detector with the default phrase tables.
    pub fn new() -> Self {
        let hate_set = RegexSet::new(HATE_PATTERNS).expect("Invalid hate patterns");
        let hate_regexes = HATE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("Invalid hate pattern"))
            .collect();

        Self {
            hate_set,
            hate_regexes,
        }
    }

    /// Scores text for toxicity.
    pub fn score(&self, text: &str) -> ToxicityReport {
        let lower = text.to_lowercase();
        let mut matched = Vec::new();
        let mut scores = ToxicityScores::default();

        // General toxicity: phrase map plus shouting and punctuation floors
        for (phrase, confidence) in TOXIC_PHRASES {
            if lower.contains(phrase) {
                scores.general_toxicity = scores.general_toxicity.max(*confidence);
                matched.push(phrase.to_string());
            }
        }
        if uppercase_ratio(text) > 0.7 && text.chars().count() > 10 {
            scores.general_toxicity = scores.general_toxicity.max(SHOUTING_FLOOR);
        }
        if count_char(text, '!') > 3 || count_char(text, '?') > 5 {
            scores.general_toxicity = scores.general_toxicity.max(PUNCTUATION_FLOOR);
        }

        // Hate speech templates
        if self.hate_set.is_match(&lower) {
            scores.hate_speech = HATE_CONFIDENCE;
            for idx in self.hate_set.matches(&lower).iter() {
                if let Some(m) = self.hate_regexes[idx].find(&lower) {
                    matched.push(m.as_str().to_string());
                }
            }
        }

        // Violence
        for phrase in VIOLENCE_PHRASES {
            if lower.contains(phrase) {
                scores.violence = VIOLENCE_CONFIDENCE;
                matched.push(phrase.to_string());
            }
        }

        // Sexual content
        for keyword in SEXUAL_KEYWORDS {
            if lower.contains(keyword) {
                scores.sexual_content = SEXUAL_CONFIDENCE;
                matched.push(keyword.to_string());
            }
        }

        let toxicity_score = scores.max();
        let is_toxic = toxicity_score > TOXICITY_THRESHOLD;

        debug!(toxicity_score, is_toxic, "Toxicity scored");

        ToxicityReport {
            is_toxic,
            toxicity_score,
            categories: scores,
            matched,
        }
    }
}

impl Default for ToxicityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ToxicityDetector {
    type Report = ToxicityReport;

    fn kind(&self) -> DetectorKind {
        DetectorKind::Toxicity
    }

    fn analyze(&self, text: &str) -> ToxicityReport {
        self.score(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ToxicityDetector {
        ToxicityDetector::new()
    }

    #[test]
    fn detects_violent_threat() {
        let report = detector().score("I will kill you if you come back");
        assert!(report.is_toxic);
        assert_eq!(report.categories.violence, VIOLENCE_CONFIDENCE);
        assert_eq!(report.toxicity_score, VIOLENCE_CONFIDENCE);
    }

    #[test]
    fn detects_hate_template() {
        let report = detector().score("All lawyers are liars");
        assert!(report.is_toxic);
        assert_eq!(report.categories.hate_speech, HATE_CONFIDENCE);
        assert!(report.matched.contains(&"all lawyers are".to_string()));
    }

    #[test]
    fn detects_sexual_content() {
        let report = detector().score("Click for NUDE pics");
        assert!(report.is_toxic);
        assert_eq!(report.categories.sexual_content, SEXUAL_CONFIDENCE);
    }

    #[test]
    fn phrase_confidence_is_max_not_sum() {
        let report = detector().score("shut up, you idiot loser");
        assert_eq!(report.categories.general_toxicity, 0.6);
        assert_eq!(report.matched.len(), 3);
    }

    #[test]
    fn threshold_is_strict() {
        let report = detector().score("oh shut up");
        assert_eq!(report.toxicity_score, 0.5);
        assert!(!report.is_toxic);
        assert!(report.flags().is_empty());
    }

    #[test]
    fn shouting_floor() {
        let report = detector().score("THIS IS A VERY LOUD MESSAGE");
        assert_eq!(report.categories.general_toxicity, SHOUTING_FLOOR);
        assert!(!report.is_toxic);
    }

    #[test]
    fn shouting_requires_length() {
        let report = detector().score("STOP NOW");
        assert_eq!(report.categories.general_toxicity, 0.0);
    }

    #[test]
    fn punctuation_floor() {
        let report = detector().score("really!!!! why");
        assert_eq!(report.categories.general_toxicity, PUNCTUATION_FLOOR);

        let report = detector().score("what??????");
        assert_eq!(report.categories.general_toxicity, PUNCTUATION_FLOOR);
    }

    #[test]
    fn benign_text() {
        let report = detector().score("Looking forward to the product launch next week.");
        assert!(!report.is_toxic);
        assert_eq!(report.toxicity_score, 0.0);
        assert!(report.matched.is_empty());
    }

    #[test]
    fn flag_shape() {
        let flags = detector().score("kill yourself").flags();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].flag_type, "toxicity");
        assert_eq!(flags[0].severity, Severity::High);
        assert_eq!(flags[0].confidence, 0.9);
        assert!(flags[0].description.contains("general_toxicity"));
    }
}
