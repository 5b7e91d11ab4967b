//! Request, finding and verdict types shared across the pipeline.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Ordinal risk tier attached to a flag and to the overall verdict.
///
/// Ordering follows declaration order: `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns a human-readable name for this severity.
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Returns true for the tiers that block posting.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

/// Kind of content being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Audio,
}

impl ContentType {
    /// Returns all content types.
    pub fn all() -> &'static [ContentType] {
        &[
            ContentType::Text,
            ContentType::Image,
            ContentType::Video,
            ContentType::Audio,
        ]
    }

    /// Returns the wire name of this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Image => "image",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
        }
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidContentType(s.to_string()))
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target social platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitter,
    Facebook,
    Instagram,
    Linkedin,
    Tiktok,
    Youtube,
}

impl Platform {
    /// Returns all platforms.
    pub fn all() -> &'static [Platform] {
        &[
            Platform::Twitter,
            Platform::Facebook,
            Platform::Instagram,
            Platform::Linkedin,
            Platform::Tiktok,
            Platform::Youtube,
        ]
    }

    /// Returns the wire name of this platform.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Twitter => "twitter",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Tiktok => "tiktok",
            Platform::Youtube => "youtube",
        }
    }

    /// Returns a human-readable name for this platform.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Twitter => "Twitter",
            Platform::Facebook => "Facebook",
            Platform::Instagram => "Instagram",
            Platform::Linkedin => "LinkedIn",
            Platform::Tiktok => "TikTok",
            Platform::Youtube => "YouTube",
        }
    }
}

impl FromStr for Platform {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::all()
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidPlatform(s.to_string()))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding produced by a detector, rule, or platform check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    /// Tag identifying the finding (e.g. `profanity`, `custom_rule_<id>`).
    #[serde(rename = "type")]
    pub flag_type: String,
    pub severity: Severity,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flagged_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Flag {
    /// Creates a new flag. Confidence is clamped into `[0, 1]`.
    pub fn new(
        flag_type: impl Into<String>,
        severity: Severity,
        confidence: f32,
        description: impl Into<String>,
    ) -> Self {
        Self {
            flag_type: flag_type.into(),
            severity,
            confidence: if confidence.is_nan() {
                0.0
            } else {
                confidence.clamp(0.0, 1.0)
            },
            description: description.into(),
            flagged_text: None,
            suggestion: None,
        }
    }

    /// Sets the text that triggered this flag.
    pub fn with_flagged_text(mut self, text: impl Into<String>) -> Self {
        self.flagged_text = Some(text.into());
        self
    }

    /// Sets the remediation hint.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Inbound request as it arrives on the wire, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawModerationRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

fn default_content_type() -> String {
    ContentType::Text.as_str().to_string()
}

/// A validated moderation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub content: String,
    pub content_type: ContentType,
    pub platform: Platform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
}

impl ModerationRequest {
    /// Creates a text request for the given platform.
    pub fn new(content: impl Into<String>, platform: Platform) -> Self {
        Self {
            content: content.into(),
            content_type: ContentType::Text,
            platform,
            user_id: None,
            metadata: None,
        }
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }
}

/// The reduced verdict for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub is_flagged: bool,
    pub flags: Vec<Flag>,
    pub overall_severity: Severity,
    pub confidence_score: f32,
    pub safe_to_post: bool,
    pub recommendations: Vec<String>,
    pub processing_time_ms: u64,
}
