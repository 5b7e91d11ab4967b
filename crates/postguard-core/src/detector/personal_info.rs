//! Personal information detection.
//!
//! Signals are independent and the confidence is the maximum over all that
//! fire. Capitalized name sequences are only counted when they are
//! corroborated, since ordinary title-case phrases look the same.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Detector, DetectorKind, FlagSource};
use crate::models::{Flag, Severity};

const EMAIL_CONFIDENCE: f32 = 0.9;
const PHONE_CONFIDENCE: f32 = 0.8;
const SSN_CONFIDENCE: f32 = 0.95;
const CREDIT_CARD_CONFIDENCE: f32 = 0.9;
const ADDRESS_CONFIDENCE: f32 = 0.7;
const NAME_CONFIDENCE: f32 = 0.6;
const KEYWORD_CONFIDENCE: f32 = 0.5;

/// Confidence at or above which a finding is treated as direct identifier exposure.
const HIGH_SEVERITY_CONFIDENCE: f32 = 0.8;

/// Street suffixes recognised in addresses.
const STREET_SUFFIXES: &str =
    "street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|court|ct|way|place|pl|terrace|parkway";

/// Terms that indicate sensitive personal data is being shared.
const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "pin",
    "ssn",
    "social security",
    "date of birth",
    "driver license",
    "driver's license",
    "passport",
    "account number",
    "routing number",
    "credit card",
    "bank account",
];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern")
});

static PHONE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 555-123-4567, 555.123.4567
        r"\b\d{3}[-.]\d{3}[-.]\d{4}\b",
        // (555) 123-4567
        r"\(\d{3}\)\s*\d{3}[-.\s]?\d{4}\b",
        // +1 555 123 4567, +44-20-7946-0958
        r"\+\d{1,3}[\s-]?\d{1,4}[\s-]?\d{3,4}[\s-]?\d{3,4}\b",
        // bare 10-11 digit run
        r"\b\d{10,11}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("phone pattern"))
    .collect()
});

static SSN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{3}-\d{2}-\d{4}\b").expect("ssn pattern"));

static CREDIT_CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b").expect("credit card pattern")
});

static ADDRESS_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // 123 Main Street
        format!(r"(?i)\b\d+\s+(?:[a-z]+\s+){{0,3}}(?:{})\b", STREET_SUFFIXES),
        // Street 42
        format!(r"(?i)\b(?:{})\s+\d+\b", STREET_SUFFIXES),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("address pattern"))
    .collect()
});

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+){1,2}\b").expect("name pattern"));

/// Result of personal information detection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfoReport {
    pub has_personal_info: bool,
    /// Literal matches, deduplicated, in discovery order.
    pub detected_info: Vec<String>,
    /// Category tags, deduplicated, in discovery order.
    pub info_types: Vec<String>,
    /// Maximum confidence across the signals that fired.
    pub confidence: f32,
}

impl PersonalInfoReport {
    /// Direct identifiers (email, phone, SSN, card) are high severity;
    /// addresses, names and keywords alone are medium.
    pub fn severity(&self) -> Severity {
        if self.confidence >= HIGH_SEVERITY_CONFIDENCE {
            Severity::High
        } else {
            Severity::Medium
        }
    }

    fn record(&mut self, info_type: &str, matched: &str, confidence: f32) {
        if !self.detected_info.iter().any(|d| d == matched) {
            self.detected_info.push(matched.to_string());
        }
        if !self.info_types.iter().any(|t| t == info_type) {
            self.info_types.push(info_type.to_string());
        }
        self.confidence = self.confidence.max(confidence);
    }
}

impl FlagSource for PersonalInfoReport {
    fn flags(&self) -> Vec<Flag> {
        if !self.has_personal_info {
            return Vec::new();
        }

        vec![Flag::new(
            "personal_info",
            self.severity(),
            self.confidence,
            format!(
                "Content may expose personal information ({})",
                self.info_types.join(", ")
            ),
        )
        .with_flagged_text(self.detected_info.join(", "))
        .with_suggestion("Remove personal or sensitive details before posting publicly")]
    }
}

/// Pattern-based personal information detector.
pub struct PersonalInfoDetector;

impl PersonalInfoDetector {
    /// Creates a new detector.
    pub fn new() -> Self {
        Self
    }

    /// Scans text for personal information.
    pub fn scan(&self, text: &str) -> PersonalInfoReport {
        let mut report = PersonalInfoReport::default();

        for m in EMAIL_RE.find_iter(text) {
            report.record("email", m.as_str(), EMAIL_CONFIDENCE);
        }

        for re in PHONE_RES.iter() {
            for m in re.find_iter(text) {
                report.record("phone", m.as_str(), PHONE_CONFIDENCE);
            }
        }

        for m in SSN_RE.find_iter(text) {
            report.record("ssn", m.as_str(), SSN_CONFIDENCE);
        }

        for m in CREDIT_CARD_RE.find_iter(text) {
            report.record("credit_card", m.as_str(), CREDIT_CARD_CONFIDENCE);
        }

        for re in ADDRESS_RES.iter() {
            for m in re.find_iter(text) {
                report.record("address", m.as_str(), ADDRESS_CONFIDENCE);
            }
        }

        // Names only count with corroboration: several sequences, or other PII.
        let names: Vec<&str> = NAME_RE.find_iter(text).map(|m| m.as_str()).collect();
        if names.len() > 1 || (!names.is_empty() && !report.detected_info.is_empty()) {
            for name in names {
                report.record("name", name, NAME_CONFIDENCE);
            }
        }

        let lower = text.to_lowercase();
        for keyword in SENSITIVE_KEYWORDS {
            if lower.contains(keyword) {
                report.record("sensitive_keyword", keyword, KEYWORD_CONFIDENCE);
            }
        }

        report.has_personal_info = !report.detected_info.is_empty();

        debug!(
            has_personal_info = report.has_personal_info,
            types = ?report.info_types,
            "Personal info scanned"
        );

        report
    }
}

impl Default for PersonalInfoDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector for PersonalInfoDetector {
    type Report = PersonalInfoReport;

    fn kind(&self) -> DetectorKind {
        DetectorKind::PersonalInfo
    }

    fn analyze(&self, text: &str) -> PersonalInfoReport {
        self.scan(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> PersonalInfoDetector {
        PersonalInfoDetector::new()
    }

    #[test]
    fn detects_email_and_phone() {
        let report = detector().scan("My email is test@example.com and phone is 555-123-4567");
        assert!(report.has_personal_info);
        assert!(report.info_types.contains(&"email".to_string()));
        assert!(report.info_types.contains(&"phone".to_string()));
        assert!(report.confidence >= 0.9);
        assert!(report.detected_info.contains(&"test@example.com".to_string()));
        assert!(report.detected_info.contains(&"555-123-4567".to_string()));
    }

    #[test]
    fn phone_formats() {
        for text in [
            "call 555.123.4567",
            "call (555) 123-4567",
            "call +1 555 123 4567",
            "call 5551234567",
        ] {
            let report = detector().scan(text);
            assert!(
                report.info_types.contains(&"phone".to_string()),
                "no phone in {text}"
            );
        }
    }

    #[test]
    fn ssn_has_highest_confidence() {
        let report = detector().scan("ssn 123-45-6789");
        assert!(report.info_types.contains(&"ssn".to_string()));
        assert_eq!(report.confidence, SSN_CONFIDENCE);
    }

    #[test]
    fn detects_credit_card() {
        let report = detector().scan("card: 4111 1111 1111 1111");
        assert!(report.info_types.contains(&"credit_card".to_string()));
        assert_eq!(report.confidence, CREDIT_CARD_CONFIDENCE);
    }

    #[test]
    fn detects_address_both_orders() {
        let report = detector().scan("we moved to 42 Elm Street last year");
        assert!(report.info_types.contains(&"address".to_string()));

        let report = detector().scan("office at Avenue 12 now");
        assert!(report.info_types.contains(&"address".to_string()));
    }

    #[test]
    fn single_name_sequence_is_ignored() {
        let report = detector().scan("Welcome to New York everyone");
        assert!(!report.has_personal_info);
        assert!(report.flags().is_empty());
    }

    #[test]
    fn multiple_name_sequences_count() {
        let report = detector().scan("John Smith met Jane Doe for coffee");
        assert!(report.has_personal_info);
        assert_eq!(report.info_types, vec!["name"]);
        assert_eq!(report.confidence, NAME_CONFIDENCE);
    }

    #[test]
    fn name_corroborated_by_other_pii() {
        let report = detector().scan("Reach John Smith at john@example.com");
        assert!(report.info_types.contains(&"name".to_string()));
        assert!(report.info_types.contains(&"email".to_string()));
        assert_eq!(report.confidence, EMAIL_CONFIDENCE);
    }

    #[test]
    fn keyword_match() {
        let report = detector().scan("never share your password");
        assert_eq!(report.info_types, vec!["sensitive_keyword"]);
        assert_eq!(report.detected_info, vec!["password"]);
        assert_eq!(report.confidence, KEYWORD_CONFIDENCE);
    }

    #[test]
    fn keyword_only_is_medium_severity() {
        let report = detector().scan("what is your passport number");
        assert_eq!(report.severity(), Severity::Medium);
        assert_eq!(report.flags()[0].severity, Severity::Medium);
    }

    #[test]
    fn detected_info_is_deduplicated() {
        let report = detector().scan("a@b.co and again a@b.co");
        assert_eq!(report.detected_info, vec!["a@b.co"]);
        assert_eq!(report.info_types, vec!["email"]);
    }

    #[test]
    fn clean_text() {
        let report = detector().scan("great quarter for the team");
        assert!(!report.has_personal_info);
        assert_eq!(report.confidence, 0.0);
    }

    #[test]
    fn flag_shape() {
        let flags = detector().scan("email me at a@b.co").flags();
        assert_eq!(flags.len(), 1);
        assert_eq!(flags[0].flag_type, "personal_info");
        assert_eq!(flags[0].severity, Severity::High);
        assert_eq!(flags[0].confidence, EMAIL_CONFIDENCE);
        assert_eq!(flags[0].flagged_text.as_deref(), Some("a@b.co"));
    }
}
