//! Profanity detection.
//!
//! Two word lists are involved:
//!
//! - the **blocklist lexicon** decides whether text is profane, by masking
//!   blocked words and checking whether the text changed;
//! - the **reporting set** is a small canonical list of terms reported back
//!   as `profane_words`, matched as plain substrings of the original text.
//!
//! The lists are intentionally different, so text can be profane with no
//! reported words, and reported words can appear in clean text.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Detector, DetectorKind, FlagSource};
use crate::models::{Flag, Severity};

/// Confidence attached to profanity flags.
pub const PROFANITY_CONFIDENCE: f32 = 0.9;

/// Minimum blocklist entry length for inflection matching ("fucking", "shitty").
const MIN_STEM_LEN: usize = 4;

/// Endings that turn a blocked stem into a blocked inflection.
const INFLECTIONS: &[&str] = &["s", "es", "ed", "er", "ers", "ing", "in", "y", "ty"];

/// Base profanity lexicon, before business-context exemptions.
const BASE_LEXICON: &[&str] = &[
    "arse", "ass", "asshole", "bastard", "bitch", "bloody", "bollocks", "bugger", "bullshit",
    "cock", "crap", "cunt", "damn", "dick", "dickhead", "douche", "dumbass", "fuck", "fucker",
    "goddamn", "hell", "jackass", "motherfucker", "piss", "prick", "pussy", "screw", "shit",
    "slut", "sucks", "twat", "wanker", "whore",
];

/// Words acceptable in business contexts: mild exclamations removed from the
/// lexicon, and homographs of blocked stems that must never be masked.
const ALLOW_LIST: &[&str] = &[
    "hell",
    "damn",
    "crap",
    "sucks",
    "bloody",
    "screw",
    "class",
    "classic",
    "analysis",
    "assessment",
    "assignment",
    "hello",
    "cocktail",
    "cockpit",
    "cocky",
    "cocker",
    "dickens",
    "arsenal",
    "prickly",
    "scrap",
];

/// Canonical profane terms reported back to callers.
const REPORTED_WORDS: &[&str] = &["fuck", "shit", "damn", "bitch", "ass", "bastard", "crap"];

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{L}\p{N}']+").expect("word pattern is valid"));

/// Result of a profanity check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfanityReport {
    /// Whether masking against the blocklist changed the text.
    pub is_profane: bool,
    /// Reporting-set terms that appear in the original text.
    pub profane_words: Vec<String>,
    /// Text with blocklisted words masked by `*`.
    pub clean_text: String,
}

impl FlagSource for ProfanityReport {
    fn flags(&self) -> Vec<Flag> {
        if !self.is_profane {
            return Vec::new();
        }

        let mut flag = Flag::new(
            "profanity",
            Severity::Medium,
            PROFANITY_CONFIDENCE,
            "Content contains profane language",
        )
        .with_suggestion("Remove or replace profane language to keep the post professional");

        if !self.profane_words.is_empty() {
            flag = flag.with_flagged_text(self.profane_words.join(", "));
        }

        vec![flag]
    }
}

/// Lexicon-based profanity detector.
pub struct ProfanityDetector {
    /// Blocked words (lowercase), allow-list already removed.
    lexicon: HashSet<String>,
    /// Tokens never masked even if they extend a blocked stem.
    allow: HashSet<String>,
}

impl ProfanityDetector {
    /// Creates a detector with the default lexicon and allow-list.
    pub fn new() -> Self {
        let allow: HashSet<String> = ALLOW_LIST.iter().map(|w| w.to_string()).collect();
        let lexicon = BASE_LEXICON
            .iter()
            .map(|w| w.to_string())
            .filter(|w| !allow.contains(w))
            .collect();

        Self { lexicon, allow }
    }

    /// Returns true if the given word is in the effective blocklist.
    pub fn is_blocked_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        let token = lower.trim_matches('\'');
        if token.is_empty() || self.allow.contains(token) {
            return false;
        }
        if self.lexicon.contains(token) {
            return true;
        }
        self.lexicon
            .iter()
            .filter(|stem| stem.len() >= MIN_STEM_LEN)
            .filter_map(|stem| token.strip_prefix(stem.as_str()))
            .any(|suffix| INFLECTIONS.contains(&suffix))
    }

    /// Masks every blocklisted word with `*`, one per character.
    pub fn clean(&self, text: &str) -> String {
        WORD_RE
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let word = &caps[0];
                if self.is_blocked_word(word) {
                    "*".repeat(word.chars().count())
                } else {
                    word.to_string()
                }
            })
            .into_owned()
    }

    /// Checks text for profanity.
    pub fn check(&self, text: &str) -> ProfanityReport {
        let clean_text = self.clean(text);
        let is_profane = clean_text != text;

        let lower = text.to_lowercase();
        let profane_words: Vec<String> = REPORTED_WORDS
            .iter()
            .filter(|w| lower.contains(*w))
            .map(|w| w.to_string())
            .collect();

        debug!(
            is_profane,
            reported = profane_words.len(),
            "Profanity check complete"
        );

        ProfanityReport {
            is_profane,
            profane_words,
            clean_text,
        }
    }
}

impl Default for ProfanityDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for ProfanityDetector {
    type Report = ProfanityReport;

    fn kind(&self) -> DetectorKind {
        DetectorKind::Profanity
    }

    fn analyze(&self, text: &str) -> ProfanityReport {
        self.check(text)
    }
}
