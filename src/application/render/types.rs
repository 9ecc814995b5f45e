use thiserror::Error;

/// Hard cap on the UTF-8 byte length of submitted markdown. Enforced before
/// any parsing so an oversized payload is rejected at constant cost.
pub const MAX_MARKDOWN_BYTES: usize = 50 * 1024;

/// Markdown input that has passed validation, together with request options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    /// The markdown exactly as submitted; no trimming or normalization.
    pub markdown: String,
    /// Whether the caller asked for a plain-text projection.
    pub strip_html: bool,
}

impl ValidatedRequest {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            strip_html: false,
        }
    }

    pub fn with_strip_html(mut self, strip_html: bool) -> Self {
        self.strip_html = strip_html;
        self
    }
}

/// Successful pipeline output, ready for response assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    /// Sanitized HTML. Renderer output is never exposed directly.
    pub html: String,
    /// Character count of the submitted markdown.
    pub chars_in: u64,
    /// Character count of the sanitized HTML.
    pub chars_out: u64,
    /// Plain-text projection, present only when requested.
    pub text: Option<String>,
}

/// Input-dependent failures of the render pipeline.
///
/// Every variant is a deterministic function of the input and surfaces as a
/// client error; retrying would fail identically. Anything else that goes
/// wrong inside the pipeline is a defect and must propagate, not be folded
/// into this enum.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("missing 'markdown' field")]
    MissingField,
    #[error("'markdown' must be a string")]
    WrongType,
    #[error("'strip_html' must be a boolean")]
    StripHtmlWrongType,
    #[error("markdown too large (max 51200 bytes)")]
    TooLarge,
    #[error("markdown parse error")]
    Parse,
}

impl RenderError {
    /// Stable machine-readable code for the API error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            RenderError::MissingField => "missing_field",
            RenderError::WrongType | RenderError::StripHtmlWrongType => "wrong_type",
            RenderError::TooLarge => "too_large",
            RenderError::Parse => "parse_error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            RenderError::MissingField => "missing 'markdown' field",
            RenderError::WrongType => "'markdown' must be a string",
            RenderError::StripHtmlWrongType => "'strip_html' must be a boolean",
            RenderError::TooLarge => "markdown too large (max 51200 bytes)",
            RenderError::Parse => "markdown parse error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_message_names_the_byte_cap() {
        assert_eq!(
            RenderError::TooLarge.message(),
            format!("markdown too large (max {MAX_MARKDOWN_BYTES} bytes)")
        );
    }

    #[test]
    fn display_matches_message() {
        for error in [
            RenderError::MissingField,
            RenderError::WrongType,
            RenderError::StripHtmlWrongType,
            RenderError::TooLarge,
            RenderError::Parse,
        ] {
            assert_eq!(error.to_string(), error.message());
        }
    }
}
