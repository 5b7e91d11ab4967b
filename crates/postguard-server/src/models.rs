//! API request and response models.
//!
//! Moderation requests and responses use the core types directly; the
//! types here cover the management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use postguard_core::{PatternError, Rule};

/// Response body for PUT /api/config.
#[derive(Debug, Serialize)]
pub struct UpdateConfigResponse {
    pub success: bool,
    /// Rule patterns that were skipped because they failed to compile.
    pub pattern_errors: Vec<PatternError>,
}

/// Query parameters for GET /api/rules.
#[derive(Debug, Deserialize)]
pub struct RulesQuery {
    /// Only return rules scoped to this platform.
    pub platform: Option<String>,
}

/// Response body for GET /api/rules.
#[derive(Debug, Serialize)]
pub struct RulesResponse {
    pub rules: Vec<Rule>,
    pub total: usize,
}

/// Response body for POST /api/rules.
#[derive(Debug, Serialize)]
pub struct SaveRuleResponse {
    pub success: bool,
    pub rule: Rule,
    pub pattern_errors: Vec<PatternError>,
}

/// Request body for PUT /api/rules/{id}/enabled.
#[derive(Debug, Deserialize)]
pub struct SetRuleEnabledRequest {
    pub enabled: bool,
}

/// Response body for rule toggle and delete.
#[derive(Debug, Serialize)]
pub struct RuleStatusResponse {
    pub success: bool,
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
