//! Shared wire types for the Velina rendering API.
//!
//! The request type keeps its fields as raw JSON values so the service can
//! distinguish a missing `markdown` field from one of the wrong type and
//! answer with a precise error instead of a generic deserialization failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /render` as it arrives on the wire.
///
/// Field classification (missing vs. wrong type vs. too large) happens in the
/// service's validator, not here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RenderRequest {
    /// Markdown source. Must be a JSON string; validated server-side.
    #[serde(default)]
    pub markdown: Option<Value>,
    /// When true, the response also carries a plain-text projection.
    #[serde(default)]
    pub strip_html: Option<Value>,
}

/// Character-count statistics for a successful render.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderStats {
    /// Characters (not bytes) in the submitted markdown.
    pub chars_in: u64,
    /// Characters (not bytes) in the sanitized HTML.
    pub chars_out: u64,
}

/// Body of a successful `POST /render` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RenderResponse {
    /// Sanitized HTML; the only HTML the service ever returns.
    pub html: String,
    pub stats: RenderStats,
    /// Always true on success; present so consumers can assert the boundary.
    pub sanitized: bool,
    /// Plain-text projection, present only when `strip_html` was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Error envelope shared by all client-error responses.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
}
