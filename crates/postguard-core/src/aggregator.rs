//! Reduces a flag sequence into a moderation verdict.

use crate::models::{Flag, ModerationResponse, Platform, Severity};

/// Recommendation returned when nothing was flagged.
pub const SAFE_MESSAGE: &str = "Content looks safe to post.";

const REPLACE_MESSAGE: &str =
    "Content contains high-risk issues. Rewrite or replace it before posting.";
const EDIT_MESSAGE: &str = "Content has moderate issues. Edit the flagged parts before posting.";
const REVIEW_MESSAGE: &str = "Content has minor issues. Review the flags before posting.";

/// Returns the fixed posting tip for platforms that have one.
pub fn platform_tip(platform: Platform) -> Option<String> {
    let tip = match platform {
        Platform::Twitter => "keep posts concise and under 280 characters.",
        Platform::Instagram => "use up to 30 relevant hashtags.",
        Platform::Linkedin => "keep a professional tone and limit mentions.",
        Platform::Facebook | Platform::Tiktok | Platform::Youtube => return None,
    };
    Some(format!("{} tip: {}", platform.name(), tip))
}

/// Returns the highest severity present, or `Low` when there are no flags.
pub fn overall_severity(flags: &[Flag]) -> Severity {
    flags
        .iter()
        .map(|f| f.severity)
        .max()
        .unwrap_or(Severity::Low)
}

/// Returns the mean flag confidence, or 1.0 when there are no flags.
pub fn confidence_score(flags: &[Flag]) -> f32 {
    if flags.is_empty() {
        return 1.0;
    }
    let total: f32 = flags.iter().map(|f| f.confidence).sum();
    (total / flags.len() as f32).clamp(0.0, 1.0)
}

/// Builds the recommendation list: one severity-tier message, then at most
/// one platform tip.
pub fn recommendations(flags: &[Flag], platform: Platform) -> Vec<String> {
    let tier = if flags.iter().any(|f| f.severity.is_blocking()) {
        REPLACE_MESSAGE
    } else if flags.iter().any(|f| f.severity == Severity::Medium) {
        EDIT_MESSAGE
    } else if !flags.is_empty() {
        REVIEW_MESSAGE
    } else {
        SAFE_MESSAGE
    };

    let mut recommendations = vec![tier.to_string()];
    recommendations.extend(platform_tip(platform));
    recommendations
}

/// Aggregates flags into a response. `processing_time_ms` is left at zero
/// for the caller to stamp.
pub fn aggregate(flags: Vec<Flag>, platform: Platform) -> ModerationResponse {
    let overall_severity = overall_severity(&flags);
    let confidence_score = confidence_score(&flags);
    let recommendations = recommendations(&flags, platform);

    ModerationResponse {
        is_flagged: !flags.is_empty(),
        safe_to_post: !overall_severity.is_blocking(),
        overall_severity,
        confidence_score,
        flags,
        recommendations,
        processing_time_ms: 0,
    }
}
