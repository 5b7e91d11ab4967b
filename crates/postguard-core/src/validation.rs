//! Request validation.
//!
//! Checks run in a fixed order and the first failure aborts the request:
//! empty content, content length, content type, platform.

use crate::error::ValidationError;
use crate::models::{ContentType, ModerationRequest, Platform, RawModerationRequest};

/// Maximum content length in characters.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Validates the content body of a request.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }

    let length = content.chars().count();
    if length > MAX_CONTENT_LENGTH {
        return Err(ValidationError::ContentTooLong {
            length,
            max: MAX_CONTENT_LENGTH,
        });
    }

    Ok(())
}

/// Validates an already-typed request.
pub fn validate(request: &ModerationRequest) -> Result<(), ValidationError> {
    validate_content(&request.content)
}

/// Validates a raw wire request and converts it into a typed request.
pub fn parse_request(raw: RawModerationRequest) -> Result<ModerationRequest, ValidationError> {
    validate_content(&raw.content)?;
    let content_type: ContentType = raw.content_type.parse()?;
    let platform: Platform = raw.platform.parse()?;

    let mut request =
        ModerationRequest::new(raw.content, platform).with_content_type(content_type);
    request.user_id = raw.user_id;
    request.metadata = raw.metadata;
    Ok(request)
}
