//! Error types for the moderation pipeline.

use thiserror::Error;

/// Reasons a moderation request is rejected before any detector runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Content is empty or whitespace-only.
    #[error("content must not be empty")]
    EmptyContent,

    /// Content exceeds the maximum character count.
    #[error("content is {length} characters, maximum is {max}")]
    ContentTooLong { length: usize, max: usize },

    /// Content type is not one of the supported values.
    #[error("invalid content type: {0}")]
    InvalidContentType(String),

    /// Platform is not one of the supported values.
    #[error("invalid platform: {0}")]
    InvalidPlatform(String),
}

impl ValidationError {
    /// Returns a stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::EmptyContent => "empty_content",
            ValidationError::ContentTooLong { .. } => "content_too_long",
            ValidationError::InvalidContentType(_) => "invalid_content_type",
            ValidationError::InvalidPlatform(_) => "invalid_platform",
        }
    }
}

/// A rule pattern that could not be compiled as a regular expression.
///
/// These are recovered locally: the pattern is skipped and the rest of the
/// rule stays active.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize)]
#[error("rule {rule_id}: invalid pattern {pattern}: {message}")]
pub struct PatternError {
    /// ID of the rule owning the pattern.
    pub rule_id: String,
    /// The pattern as written, including delimiters.
    pub pattern: String,
    /// Compiler diagnostic.
    pub message: String,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration document.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Sensitivity threshold outside `[0, 1]`.
    #[error("sensitivity_threshold must be between 0 and 1, got {0}")]
    InvalidThreshold(f32),
}
