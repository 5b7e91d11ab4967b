//! Operator-defined custom rules.
//!
//! A rule is a platform-scoped set of patterns with a severity. Patterns
//! wrapped in `/…/` are regular expressions; anything else is a literal
//! substring. Both match case-insensitively.
//!
//! Patterns are compiled once when a rule is installed. A malformed regex is
//! dropped from its rule and reported as a [`PatternError`]; the remaining
//! patterns of the rule stay active.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PatternError;
use crate::models::{Flag, ModerationRequest, Platform, Severity};

/// Confidence attached to every custom rule flag.
pub const RULE_CONFIDENCE: f32 = 0.8;

/// Prefix of the flag type emitted by custom rules.
pub const RULE_FLAG_PREFIX: &str = "custom_rule_";

/// A custom moderation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier for this rule.
    pub id: String,
    /// Human-readable name for this rule.
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Literal substrings or `/regex/` patterns.
    pub patterns: Vec<String>,
    pub severity: Severity,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Platforms this rule applies to. Matching is exact membership.
    pub platforms: BTreeSet<Platform>,
}

fn default_enabled() -> bool {
    true
}

impl Rule {
    /// Creates an enabled rule that applies to every platform.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        patterns: Vec<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            patterns,
            severity,
            enabled: true,
            platforms: Platform::all().iter().copied().collect(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Restricts the rule to the given platforms.
    pub fn with_platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    /// Sets whether this rule is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Returns true if this rule is enabled and scoped to the platform.
    pub fn applies_to(&self, platform: Platform) -> bool {
        self.enabled && self.platforms.contains(&platform)
    }

    /// Returns the flag type emitted for this rule.
    pub fn flag_type(&self) -> String {
        format!("{}{}", RULE_FLAG_PREFIX, self.id)
    }
}

/// A parsed rule pattern.
#[derive(Debug, Clone)]
pub enum RulePattern {
    /// Case-insensitive substring; stores the pattern and its lowercase form.
    Literal { text: String, lower: String },
    /// Case-insensitive regular expression.
    Regex(Regex),
}

impl RulePattern {
    /// Parses a pattern string, compiling `/…/` patterns as regexes.
    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        if pattern.len() > 2 && pattern.starts_with('/') && pattern.ends_with('/') {
            let inner = &pattern[1..pattern.len() - 1];
            let regex = RegexBuilder::new(inner).case_insensitive(true).build()?;
            Ok(RulePattern::Regex(regex))
        } else {
            Ok(RulePattern::Literal {
                text: pattern.to_string(),
                lower: pattern.to_lowercase(),
            })
        }
    }

    /// Returns the matched text if the pattern matches the content.
    ///
    /// `content_lower` must be the lowercase form of `content`.
    pub fn find(&self, content: &str, content_lower: &str) -> Option<String> {
        match self {
            RulePattern::Literal { text, lower } => {
                content_lower.contains(lower.as_str()).then(|| text.clone())
            }
            RulePattern::Regex(regex) => {
                if !regex.is_match(content) {
                    return None;
                }
                let matches: Vec<&str> = regex.find_iter(content).map(|m| m.as_str()).collect();
                Some(matches.join(", "))
            }
        }
    }
}

/// A rule together with its compiled patterns.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: Rule,
    patterns: Vec<RulePattern>,
    errors: Vec<PatternError>,
}

impl CompiledRule {
    fn compile(rule: Rule) -> Self {
        let mut patterns = Vec::with_capacity(rule.patterns.len());
        let mut errors = Vec::new();

        for raw in &rule.patterns {
            if raw.is_empty() {
                errors.push(PatternError {
                    rule_id: rule.id.clone(),
                    pattern: raw.clone(),
                    message: "empty pattern".to_string(),
                });
                continue;
            }
            match RulePattern::parse(raw) {
                Ok(pattern) => patterns.push(pattern),
                Err(e) => {
                    warn!(rule_id = %rule.id, pattern = %raw, "Skipping invalid rule pattern: {}", e);
                    errors.push(PatternError {
                        rule_id: rule.id.clone(),
                        pattern: raw.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        Self {
            rule,
            patterns,
            errors,
        }
    }

    fn evaluate(&self, content: &str, content_lower: &str) -> Vec<Flag> {
        let rule = &self.rule;
        self.patterns
            .iter()
            .filter_map(|pattern| pattern.find(content, content_lower))
            .map(|matched| {
                let description = if rule.description.is_empty() {
                    format!("Content matches custom rule: {}", rule.name)
                } else {
                    rule.description.clone()
                };
                Flag::new(rule.flag_type(), rule.severity, RULE_CONFIDENCE, description)
                    .with_flagged_text(matched)
                    .with_suggestion(format!(
                        "Review content for compliance with rule: {}",
                        rule.name
                    ))
            })
            .collect()
    }
}

/// Evaluates custom rules against content.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<CompiledRule>,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates a rule engine from a rule list, compiling every pattern.
    pub fn from_rules(rules: Vec<Rule>) -> Self {
        let mut engine = Self::new();
        engine.set_rules(rules);
        engine
    }

    /// Replaces the whole rule set. Returns patterns that failed to compile.
    pub fn set_rules(&mut self, rules: Vec<Rule>) -> Vec<PatternError> {
        self.rules = rules.into_iter().map(CompiledRule::compile).collect();
        self.pattern_errors()
    }

    /// Adds a rule, replacing any existing rule with the same ID in place.
    /// Returns patterns of this rule that failed to compile.
    pub fn add_rule(&mut self, rule: Rule) -> Vec<PatternError> {
        let compiled = CompiledRule::compile(rule);
        let errors = compiled.errors.clone();
        match self.rules.iter().position(|r| r.rule.id == compiled.rule.id) {
            Some(pos) => self.rules[pos] = compiled,
            None => self.rules.push(compiled),
        }
        errors
    }

    /// Removes a rule by ID.
    pub fn remove_rule(&mut self, id: &str) -> Option<Rule> {
        let pos = self.rules.iter().position(|r| r.rule.id == id)?;
        Some(self.rules.remove(pos).rule)
    }

    /// Gets a rule by ID.
    pub fn get_rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().map(|r| &r.rule).find(|r| r.id == id)
    }

    /// Enables or disables a rule by ID. Returns false if the rule is unknown.
    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.iter_mut().find(|r| r.rule.id == id) {
            Some(compiled) => {
                compiled.rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Enables a rule by ID.
    pub fn enable_rule(&mut self, id: &str) -> bool {
        self.set_rule_enabled(id, true)
    }

    /// Disables a rule by ID.
    pub fn disable_rule(&mut self, id: &str) -> bool {
        self.set_rule_enabled(id, false)
    }

    /// Returns all rules, in evaluation order.
    pub fn rules(&self) -> Vec<&Rule> {
        self.rules.iter().map(|r| &r.rule).collect()
    }

    /// Returns rules scoped to the platform, enabled or not.
    pub fn rules_for_platform(&self, platform: Platform) -> Vec<&Rule> {
        self.rules
            .iter()
            .map(|r| &r.rule)
            .filter(|r| r.platforms.contains(&platform))
            .collect()
    }

    /// Returns all enabled rules.
    pub fn enabled_rules(&self) -> Vec<&Rule> {
        self.rules
            .iter()
            .map(|r| &r.rule)
            .filter(|r| r.enabled)
            .collect()
    }

    /// Returns every pattern that failed to compile.
    pub fn pattern_errors(&self) -> Vec<PatternError> {
        self.rules
            .iter()
            .flat_map(|r| r.errors.iter().cloned())
            .collect()
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates applicable rules against content.
    ///
    /// Each matching pattern yields its own flag, in rule then pattern order.
    pub fn check_content(&self, content: &str, platform: Platform) -> Vec<Flag> {
        let content_lower = content.to_lowercase();
        let flags: Vec<Flag> = self
            .rules
            .iter()
            .filter(|r| r.rule.applies_to(platform))
            .flat_map(|r| r.evaluate(content, &content_lower))
            .collect();

        debug!(platform = %platform, flags = flags.len(), "Custom rules evaluated");
        flags
    }

    /// Evaluates applicable rules against a request.
    pub fn check(&self, request: &ModerationRequest) -> Vec<Flag> {
        self.check_content(&request.content, request.platform)
    }
}
