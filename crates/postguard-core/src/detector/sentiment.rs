//! Lexicon-based sentiment analysis.
//!
//! Scores each token with an AFINN-style valence (-5 to +5), augmented with
//! business vocabulary. The comparative score (sum / token count) drives the
//! `negative_sentiment` flag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Detector, DetectorKind, FlagSource};
use crate::models::{Flag, Severity};

/// Comparative score below which content is flagged as negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.3;

/// Coarse sentiment bucket derived from the comparative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    VeryPositive,
    Positive,
    Neutral,
    Negative,
    VeryNegative,
}

impl SentimentCategory {
    /// Buckets a comparative score.
    pub fn from_comparative(comparative: f32) -> Self {
        if comparative > 2.0 {
            SentimentCategory::VeryPositive
        } else if comparative > 0.0 {
            SentimentCategory::Positive
        } else if comparative == 0.0 {
            SentimentCategory::Neutral
        } else if comparative > -2.0 {
            SentimentCategory::Negative
        } else {
            SentimentCategory::VeryNegative
        }
    }

    /// Returns the stable name of this category.
    pub fn name(&self) -> &'static str {
        match self {
            SentimentCategory::VeryPositive => "very_positive",
            SentimentCategory::Positive => "positive",
            SentimentCategory::Neutral => "neutral",
            SentimentCategory::Negative => "negative",
            SentimentCategory::VeryNegative => "very_negative",
        }
    }
}

/// Result of sentiment analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Sum of token valences.
    pub score: i32,
    /// Score divided by token count (0 when there are no tokens).
    pub comparative: f32,
    /// All tokens, in order.
    pub tokens: Vec<String>,
    /// Tokens found in the lexicon, in order.
    pub words: Vec<String>,
    /// Lexicon words with positive valence.
    pub positive: Vec<String>,
    /// Lexicon words with negative valence.
    pub negative: Vec<String>,
}

impl SentimentReport {
    /// Returns the coarse sentiment bucket.
    pub fn category(&self) -> SentimentCategory {
        SentimentCategory::from_comparative(self.comparative)
    }

    /// Returns true if the comparative score is below the flag threshold.
    pub fn is_negative(&self) -> bool {
        self.comparative < NEGATIVE_THRESHOLD
    }
}

impl FlagSource for SentimentReport {
    fn flags(&self) -> Vec<Flag> {
        if !self.is_negative() {
            return Vec::new();
        }

        let mut flag = Flag::new(
            "negative_sentiment",
            Severity::Low,
            self.comparative.abs(),
            "Content has a strongly negative tone",
        )
        .with_suggestion("Consider a more positive or constructive framing");

        if !self.negative.is_empty() {
            flag = flag.with_flagged_text(self.negative.join(", "));
        }

        vec![flag]
    }
}

/// Lexicon-based sentiment analyzer.
pub struct SentimentAnalyzer {
    /// Word valences (lowercase).
    lexicon: HashMap<String, i32>,
}

impl SentimentAnalyzer {
    /// Creates a new sentiment analyzer with the default lexicons.
    pub fn new() -> Self {
        let mut analyzer = Self {
            lexicon: HashMap::new(),
        };
        analyzer.load_base_lexicon();
        analyzer.load_business_terms();
        analyzer
    }

    /// Returns the valence of a word, if known.
    pub fn valence(&self, word: &str) -> Option<i32> {
        self.lexicon.get(&word.to_lowercase()).copied()
    }

    /// Splits text into lowercase tokens, dropping punctuation.
    pub fn tokenize(text: &str) -> Vec<String> {
        let cleaned: String = text
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '\'' || c == '-' || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        cleaned
            .split_whitespace()
            .map(|t| t.trim_matches(|c| c == '\'' || c == '-'))
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Analyzes text sentiment.
    pub fn analyze_text(&self, text: &str) -> SentimentReport {
        let tokens = Self::tokenize(text);
        let mut score = 0;
        let mut words = Vec::new();
        let mut positive = Vec::new();
        let mut negative = Vec::new();

        for token in &tokens {
            let Some(&valence) = self.lexicon.get(token) else {
                continue;
            };
            score += valence;
            words.push(token.clone());
            if valence > 0 {
                positive.push(token.clone());
            } else if valence < 0 {
                negative.push(token.clone());
            }
        }

        let comparative = if tokens.is_empty() {
            0.0
        } else {
            score as f32 / tokens.len() as f32
        };

        debug!(score, comparative, tokens = tokens.len(), "Sentiment analyzed");

        SentimentReport {
            score,
            comparative,
            tokens,
            words,
            positive,
            negative,
        }
    }

    fn load_base_lexicon(&mut self) {
        let entries = [
            // Negative
            ("abandon", -2),
            ("abuse", -3),
            ("angry", -3),
            ("annoyed", -2),
            ("annoying", -2),
            ("awful", -3),
            ("bad", -3),
            ("boring", -3),
            ("broken", -1),
            ("catastrophe", -3),
            ("cheat", -3),
            ("complain", -2),
            ("crap", -3),
            ("crisis", -3),
            ("cruel", -3),
            ("damn", -4),
            ("dead", -3),
            ("depressed", -2),
            ("destroy", -3),
            ("disappointed", -2),
            ("disappointing", -2),
            ("disaster", -2),
            ("disgusting", -3),
            ("dislike", -2),
            ("dumb", -3),
            ("evil", -3),
            ("fail", -2),
            ("failed", -2),
            ("failure", -2),
            ("fake", -3),
            ("fear", -2),
            ("fraud", -4),
            ("furious", -3),
            ("hate", -3),
            ("hated", -3),
            ("hopeless", -2),
            ("horrible", -3),
            ("hurt", -2),
            ("idiot", -3),
            ("ignorant", -2),
            ("kill", -3),
            ("lame", -2),
            ("liar", -3),
            ("lose", -3),
            ("loser", -3),
            ("lost", -3),
            ("mad", -3),
            ("mess", -2),
            ("miserable", -3),
            ("nasty", -3),
            ("pathetic", -2),
            ("poor", -2),
            ("problem", -2),
            ("sad", -2),
            ("scam", -2),
            ("scared", -2),
            ("shame", -2),
            ("sick", -2),
            ("stupid", -2),
            ("suck", -3),
            ("sucks", -3),
            ("terrible", -3),
            ("toxic", -3),
            ("ugly", -3),
            ("unhappy", -2),
            ("upset", -2),
            ("useless", -2),
            ("waste", -1),
            ("worst", -3),
            ("worthless", -2),
            ("wrong", -2),
            // Positive
            ("amazing", 4),
            ("awesome", 4),
            ("beautiful", 3),
            ("best", 3),
            ("better", 2),
            ("brilliant", 4),
            ("celebrate", 3),
            ("cool", 1),
            ("delighted", 3),
            ("easy", 1),
            ("enjoy", 2),
            ("excellent", 3),
            ("excited", 3),
            ("exciting", 3),
            ("fantastic", 4),
            ("fun", 4),
            ("glad", 3),
            ("good", 3),
            ("grateful", 3),
            ("great", 3),
            ("happy", 3),
            ("helpful", 2),
            ("hope", 2),
            ("impressive", 3),
            ("inspiring", 3),
            ("love", 3),
            ("lovely", 3),
            ("nice", 3),
            ("perfect", 3),
            ("pleased", 3),
            ("proud", 2),
            ("recommend", 2),
            ("superb", 5),
            ("thank", 2),
            ("thanks", 2),
            ("win", 4),
            ("wonderful", 4),
            ("wow", 4),
        ];

        for (word, valence) in entries {
            self.lexicon.insert(word.to_string(), valence);
        }
    }

    /// Business vocabulary; overrides base valences where both define a word.
    fn load_business_terms(&mut self) {
        let entries = [
            ("innovative", 2),
            ("growth", 2),
            ("success", 2),
            ("successful", 2),
            ("opportunity", 2),
            ("opportunities", 2),
            ("collaboration", 2),
            ("partnership", 2),
            ("efficient", 2),
            ("profitable", 2),
            ("milestone", 2),
            ("launch", 1),
            ("good", 1),
        ];

        for (word, valence) in entries {
            self.lexicon.insert(word.to_string(), valence);
        }
    }
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for SentimentAnalyzer {
    type Report = SentimentReport;

    fn kind(&self) -> DetectorKind {
        DetectorKind::Sentiment
    }

    fn analyze(&self, text: &str) -> SentimentReport {
        self.analyze_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new()
    }

    #[test]
    fn tokenize_strips_punctuation() {
        assert_eq!(
            SentimentAnalyzer::tokenize("Hello, World! It's great."),
            vec!["hello", "world", "it's", "great"]
        );
        assert!(SentimentAnalyzer::tokenize("!!! ...").is_empty());
    }

    #[test]
    fn business_terms_override_base() {
        let a = analyzer();
        assert_eq!(a.valence("good"), Some(1));
        assert_eq!(a.valence("Innovative"), Some(2));
        assert_eq!(a.valence("growth"), Some(2));
        assert_eq!(a.valence("unknownword"), None);
    }

    #[test]
    fn positive_text() {
        let report = analyzer().analyze_text("Our innovative team drives growth");
        assert_eq!(report.score, 4);
        assert_eq!(report.tokens.len(), 5);
        assert!((report.comparative - 0.8).abs() < 1e-6);
        assert_eq!(report.positive, vec!["innovative", "growth"]);
        assert!(report.negative.is_empty());
        assert_eq!(report.category(), SentimentCategory::Positive);
        assert!(report.flags().is_empty());
    }

    #[test]
    fn negative_text_is_flagged() {
        let report = analyzer().analyze_text("I hate this terrible product");
        assert_eq!(report.score, -6);
        assert!((report.comparative + 1.2).abs() < 1e-6);
        assert_eq!(report.negative, vec!["hate", "terrible"]);
        assert_eq!(report.category(), SentimentCategory::Negative);

        let flags = report.flags();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].flag_type, "negative_sentiment");
        assert_eq!(flags[0].severity, Severity::Low);
        // |comparative| is 1.2, capped into the confidence range
        assert_eq!(flags[0].confidence, 1.0);
    }

    #[test]
    fn mildly_negative_below_threshold_not_flagged() {
        // -2 over 11 tokens
        let report = analyzer()
            .analyze_text("the meeting ran long and one small problem came up today");
        assert!(report.comparative > NEGATIVE_THRESHOLD);
        assert!(report.flags().is_empty());
    }

    #[test]
    fn confidence_is_abs_comparative() {
        // -2 over 5 tokens = -0.4
        let report = analyzer().analyze_text("this launch plan looks awful");
        let expected = (report.score as f32 / 5.0).abs();
        let flags = report.flags();
        assert_eq!(flags.len(), 1);
        assert!((flags[0].confidence - expected).abs() < 1e-6);
    }

    #[test]
    fn neutral_text() {
        let report = analyzer().analyze_text("The report is attached");
        assert_eq!(report.score, 0);
        assert_eq!(report.comparative, 0.0);
        assert_eq!(report.category(), SentimentCategory::Neutral);
    }

    #[test]
    fn category_thresholds() {
        assert_eq!(
            SentimentCategory::from_comparative(2.5),
            SentimentCategory::VeryPositive
        );
        assert_eq!(
            SentimentCategory::from_comparative(2.0),
            SentimentCategory::Positive
        );
        assert_eq!(
            SentimentCategory::from_comparative(0.0),
            SentimentCategory::Neutral
        );
        assert_eq!(
            SentimentCategory::from_comparative(-1.9),
            SentimentCategory::Negative
        );
        assert_eq!(
            SentimentCategory::from_comparative(-2.0),
            SentimentCategory::VeryNegative
        );
    }
}
