//! Moderation coordinator.
//!
//! Owns the active configuration and runs the full pipeline for each request:
//! validation, the enabled detectors, custom rules and platform policy, then
//! aggregation.
//!
//! Stages run in pipeline order on the calling thread. Concurrency comes
//! from serving many requests at once; `moderate` takes `&self`.
//!
//! The configuration and its compiled rule set live behind one
//! `RwLock<Arc<ActiveConfig>>`. A request clones the `Arc` once and runs
//! against that snapshot, so a concurrent update never exposes a
//! half-replaced rule set. Updates build a new snapshot and swap it in.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::aggregator;
use crate::config::ModerationConfig;
use crate::detector::{
    Detector, PersonalInfoDetector, ProfanityDetector, SentimentAnalyzer, SpamDetector,
    ToxicityDetector,
};
use crate::error::{PatternError, ValidationError};
use crate::models::{Flag, ModerationRequest, ModerationResponse, Platform, RawModerationRequest};
use crate::platform_policy;
use crate::rule_engine::{Rule, RuleEngine};
use crate::validation;

/// Configuration paired with its compiled rule engine.
#[derive(Debug, Clone)]
struct ActiveConfig {
    config: ModerationConfig,
    rules: RuleEngine,
}

impl ActiveConfig {
    fn compile(config: ModerationConfig) -> (Self, Vec<PatternError>) {
        let rules = RuleEngine::from_rules(config.rules.clone());
        let errors = rules.pattern_errors();
        (Self { config, rules }, errors)
    }

    /// Mirrors the engine's rule list back into the configuration.
    fn sync_rules(&mut self) {
        self.config.rules = self.rules.rules().into_iter().cloned().collect();
    }
}

/// Runs the moderation pipeline against a swappable configuration.
pub struct ModerationCoordinator {
    profanity: ProfanityDetector,
    sentiment: SentimentAnalyzer,
    toxicity: ToxicityDetector,
    spam: SpamDetector,
    personal_info: PersonalInfoDetector,
    active: RwLock<Arc<ActiveConfig>>,
}

impl ModerationCoordinator {
    /// Creates a coordinator with the given configuration.
    ///
    /// Malformed rule patterns are logged and skipped; see
    /// [`pattern_errors`](Self::pattern_errors).
    pub fn new(config: ModerationConfig) -> Self {
        let (active, errors) = ActiveConfig::compile(config);
        if !errors.is_empty() {
            warn!(count = errors.len(), "Initial config has invalid rule patterns");
        }
        info!(
            rules = active.rules.len(),
            "Moderation coordinator initialized"
        );

        Self {
            profanity: ProfanityDetector::new(),
            sentiment: SentimentAnalyzer::new(),
            toxicity: ToxicityDetector::new(),
            spam: SpamDetector::new(),
            personal_info: PersonalInfoDetector::new(),
            active: RwLock::new(Arc::new(active)),
        }
    }

    fn snapshot(&self) -> Arc<ActiveConfig> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies a change to a copy of the active config and swaps it in.
    fn modify<R>(&self, change: impl FnOnce(&mut ActiveConfig) -> R) -> R {
        let mut guard = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = (**guard).clone();
        let result = change(&mut next);
        next.sync_rules();
        *guard = Arc::new(next);
        result
    }

    /// Moderates a validated request.
    pub fn moderate(
        &self,
        request: &ModerationRequest,
    ) -> Result<ModerationResponse, ValidationError> {
        let start = Instant::now();
        validation::validate(request)?;

        let active = self.snapshot();
        let flags = self.collect_flags(&active, request);

        let mut response = aggregator::aggregate(flags, request.platform);
        response.processing_time_ms = start.elapsed().as_millis() as u64;

        info!(
            platform = %request.platform,
            severity = response.overall_severity.name(),
            flags = response.flags.len(),
            safe_to_post = response.safe_to_post,
            elapsed_ms = response.processing_time_ms,
            "Moderation complete"
        );

        Ok(response)
    }

    /// Validates a wire request and moderates it.
    pub fn moderate_raw(
        &self,
        raw: RawModerationRequest,
    ) -> Result<ModerationResponse, ValidationError> {
        let request = validation::parse_request(raw)?;
        self.moderate(&request)
    }

    /// Runs the enabled detectors, custom rules and platform policy, and
    /// concatenates their flags in pipeline order.
    fn collect_flags(&self, active: &ActiveConfig, request: &ModerationRequest) -> Vec<Flag> {
        let config = &active.config;
        let text = request.content.as_str();
        let mut flags = Vec::new();

        if config.is_enabled(self.profanity.kind()) {
            flags.extend(run_detector(&self.profanity, text));
        }
        if config.is_enabled(self.sentiment.kind()) {
            flags.extend(run_detector(&self.sentiment, text));
        }
        if config.is_enabled(self.toxicity.kind()) {
            flags.extend(run_detector(&self.toxicity, text));
        }
        if config.is_enabled(self.spam.kind()) {
            flags.extend(run_detector(&self.spam, text));
        }
        if config.is_enabled(self.personal_info.kind()) {
            flags.extend(run_detector(&self.personal_info, text));
        }

        flags.extend(active.rules.check(request));
        flags.extend(platform_policy::flags(text, request.platform));
        flags
    }

    /// Returns the current configuration.
    pub fn get_config(&self) -> ModerationConfig {
        self.snapshot().config.clone()
    }

    /// Replaces the configuration and rule set as one unit.
    ///
    /// The update always succeeds; returned errors name rule patterns that
    /// were skipped because they failed to compile.
    pub fn update_config(&self, config: ModerationConfig) -> Vec<PatternError> {
        let (next, errors) = ActiveConfig::compile(config);
        let rules = next.rules.len();
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(next);

        info!(rules, pattern_errors = errors.len(), "Moderation config updated");
        errors
    }

    /// Returns every rule pattern in the active config that failed to compile.
    pub fn pattern_errors(&self) -> Vec<PatternError> {
        self.snapshot().rules.pattern_errors()
    }

    /// Adds a rule, replacing any rule with the same ID.
    pub fn add_rule(&self, rule: Rule) -> Vec<PatternError> {
        let id = rule.id.clone();
        let errors = self.modify(|active| active.rules.add_rule(rule));
        info!(rule_id = %id, pattern_errors = errors.len(), "Rule saved");
        errors
    }

    /// Removes a rule by ID.
    pub fn remove_rule(&self, id: &str) -> Option<Rule> {
        let removed = self.modify(|active| active.rules.remove_rule(id));
        if removed.is_some() {
            info!(rule_id = %id, "Rule removed");
        }
        removed
    }

    /// Enables or disables a rule. Returns false if the rule is unknown.
    pub fn set_rule_enabled(&self, id: &str, enabled: bool) -> bool {
        let found = self.modify(|active| active.rules.set_rule_enabled(id, enabled));
        if found {
            info!(rule_id = %id, enabled, "Rule toggled");
        }
        found
    }

    /// Enables a rule by ID.
    pub fn enable_rule(&self, id: &str) -> bool {
        self.set_rule_enabled(id, true)
    }

    /// Disables a rule by ID.
    pub fn disable_rule(&self, id: &str) -> bool {
        self.set_rule_enabled(id, false)
    }

    /// Gets a rule by ID.
    pub fn get_rule(&self, id: &str) -> Option<Rule> {
        self.snapshot().rules.get_rule(id).cloned()
    }

    /// Returns all rules.
    pub fn rules(&self) -> Vec<Rule> {
        self.snapshot().config.rules.clone()
    }

    /// Returns rules scoped to the platform.
    pub fn rules_for_platform(&self, platform: Platform) -> Vec<Rule> {
        self.snapshot()
            .rules
            .rules_for_platform(platform)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Returns enabled rules.
    pub fn enabled_rules(&self) -> Vec<Rule> {
        self.snapshot()
            .rules
            .enabled_rules()
            .into_iter()
            .cloned()
            .collect()
    }
}

impl Default for ModerationCoordinator {
    fn default() -> Self {
        Self::new(ModerationConfig::default())
    }
}

fn run_detector<D: Detector>(detector: &D, text: &str) -> Vec<Flag> {
    let flags = detector.detect(text);
    debug!(
        detector = detector.kind().name(),
        flags = flags.len(),
        "Detector finished"
    );
    flags
}
