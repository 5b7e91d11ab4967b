//! API route handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use tracing::{debug, info};

use postguard_core::{
    ModerationConfig, ModerationResponse, Platform, RawModerationRequest, Rule,
};

use crate::error::{ApiError, Result};
use crate::models::{
    HealthResponse, RuleStatusResponse, RulesQuery, RulesResponse, SaveRuleResponse,
    SetRuleEnabledRequest, UpdateConfigResponse,
};
use crate::state::AppState;

/// POST /api/moderate - Run the moderation pipeline on a post.
pub async fn moderate(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RawModerationRequest>, JsonRejection>,
) -> Result<Json<ModerationResponse>> {
    let Json(req) = payload?;
    debug!(
        platform = %req.platform,
        content_type = %req.content_type,
        content_len = req.content.len(),
        user_id = ?req.user_id,
        "Moderating content"
    );

    // Detectors are CPU-bound; keep them off the async workers.
    let coordinator = Arc::clone(&state.coordinator);
    let result = tokio::task::spawn_blocking(move || coordinator.moderate_raw(req))
        .await
        .map_err(|e| ApiError::Internal(format!("moderation task failed: {}", e)))?;

    let response = result.inspect_err(|e| debug!(code = e.code(), "Request rejected: {}", e))?;

    info!(
        flagged = response.is_flagged,
        severity = response.overall_severity.name(),
        safe_to_post = response.safe_to_post,
        "Moderation request served"
    );

    Ok(Json(response))
}

/// GET /api/config - Get the active moderation config.
pub async fn get_config(State(state): State<AppState>) -> Json<ModerationConfig> {
    Json(state.coordinator.get_config())
}

/// PUT /api/config - Replace the moderation config.
pub async fn update_config(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ModerationConfig>, JsonRejection>,
) -> Result<Json<UpdateConfigResponse>> {
    let Json(config) = payload?;
    config
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    debug!(rules = config.rules.len(), "Updating config");

    let pattern_errors = state.coordinator.update_config(config);

    Ok(Json(UpdateConfigResponse {
        success: true,
        pattern_errors,
    }))
}

/// GET /api/rules - List rules, optionally filtered by platform.
pub async fn get_rules(
    State(state): State<AppState>,
    Query(query): Query<RulesQuery>,
) -> Result<Json<RulesResponse>> {
    let rules = match query.platform.as_deref() {
        Some(platform) => {
            let platform: Platform = platform.parse()?;
            state.coordinator.rules_for_platform(platform)
        }
        None => state.coordinator.rules(),
    };

    Ok(Json(RulesResponse {
        total: rules.len(),
        rules,
    }))
}

/// POST /api/rules - Add or replace a rule.
pub async fn save_rule(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Rule>, JsonRejection>,
) -> Result<Json<SaveRuleResponse>> {
    let Json(rule) = payload?;
    if rule.id.trim().is_empty() {
        return Err(ApiError::BadRequest("rule id must not be empty".to_string()));
    }

    debug!(rule_id = %rule.id, patterns = rule.patterns.len(), "Saving rule");
    let pattern_errors = state.coordinator.add_rule(rule.clone());

    Ok(Json(SaveRuleResponse {
        success: true,
        rule,
        pattern_errors,
    }))
}

/// GET /api/rules/{id} - Get a single rule.
pub async fn get_rule(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Rule>> {
    state
        .coordinator
        .get_rule(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("rule {}", id)))
}

/// DELETE /api/rules/{id} - Remove a rule.
pub async fn delete_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RuleStatusResponse>> {
    state
        .coordinator
        .remove_rule(&id)
        .ok_or_else(|| ApiError::NotFound(format!("rule {}", id)))?;

    Ok(Json(RuleStatusResponse {
        success: true,
        id,
        enabled: None,
    }))
}

/// PUT /api/rules/{id}/enabled - Enable or disable a rule.
pub async fn set_rule_enabled(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<SetRuleEnabledRequest>, JsonRejection>,
) -> Result<Json<RuleStatusResponse>> {
    let Json(req) = payload?;
    if !state.coordinator.set_rule_enabled(&id, req.enabled) {
        return Err(ApiError::NotFound(format!("rule {}", id)));
    }

    Ok(Json(RuleStatusResponse {
        success: true,
        id,
        enabled: Some(req.enabled),
    }))
}

/// GET /api/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
