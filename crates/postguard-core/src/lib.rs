//! Postguard Core - content moderation pipeline.
//!
//! Classifies a piece of user-submitted text against independent risk
//! detectors, operator-defined rules and platform limits, then reduces the
//! findings into a single verdict.
//!
//! ## Pipeline
//!
//! 1. Request validation (fail fast, no partial results)
//! 2. Detectors: profanity, sentiment, toxicity, spam, personal info
//! 3. Custom rules scoped by platform
//! 4. Platform structural limits
//! 5. Aggregation into severity, confidence and a post/no-post verdict

pub mod aggregator;
pub mod config;
pub mod coordinator;
pub mod detector;
pub mod error;
pub mod models;
pub mod platform_policy;
pub mod rule_engine;
pub mod validation;

pub use config::ModerationConfig;
pub use coordinator::ModerationCoordinator;
pub use error::{ConfigError, PatternError, ValidationError};
pub use models::{
    ContentType, Flag, ModerationRequest, ModerationResponse, Platform, RawModerationRequest,
    Severity,
};
pub use rule_engine::{Rule, RuleEngine};
