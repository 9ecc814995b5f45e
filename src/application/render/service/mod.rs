mod config;
mod linkify;

use comrak::{Arena, format_html, parse_document};

use crate::application::render::types::{RenderError, RenderOutcome, ValidatedRequest};

use config::{build_sanitizer, build_text_extractor, default_options};

/// Comrak-based rendering pipeline with Ammonia sanitisation and bare-URL
/// linkification.
///
/// Built once at startup and shared read-only across requests; every field is
/// immutable configuration, so rendering is a pure function of the input.
pub struct RenderPipeline {
    options: comrak::Options<'static>,
    sanitizer: ammonia::Builder<'static>,
    text_extractor: ammonia::Builder<'static>,
}

impl RenderPipeline {
    /// Construct the pipeline with table and strikethrough extensions enabled
    /// and raw HTML passthrough disabled.
    pub fn new() -> Self {
        Self {
            options: default_options(),
            sanitizer: build_sanitizer(),
            text_extractor: build_text_extractor(),
        }
    }

    /// Run the full pipeline: markdown → HTML → sanitized HTML → optional
    /// plain text, plus character statistics.
    ///
    /// There is no path that returns renderer output without it passing
    /// through the sanitize stage.
    pub fn render(&self, request: &ValidatedRequest) -> Result<RenderOutcome, RenderError> {
        let chars_in = request.markdown.chars().count() as u64;

        let rendered = self.render_html_stage(&request.markdown)?;
        let sanitized = self.sanitize_stage(&rendered)?;
        let text = if request.strip_html {
            Some(self.extract_text_stage(&sanitized))
        } else {
            None
        };

        let chars_out = sanitized.chars().count() as u64;

        Ok(RenderOutcome {
            html: sanitized,
            chars_in,
            chars_out,
            text,
        })
    }

    fn render_html_stage(&self, markdown: &str) -> Result<String, RenderError> {
        let arena = Arena::new();
        let root = parse_document(&arena, markdown, &self.options);

        let mut html = String::new();
        format_html(root, &self.options, &mut html).map_err(|_| RenderError::Parse)?;
        Ok(html)
    }

    /// Filter against the allow-list, then linkify bare URLs. Applying this
    /// stage to its own output is byte-identical.
    pub fn sanitize_stage(&self, html: &str) -> Result<String, RenderError> {
        let filtered = self.sanitizer.clean(html).to_string();
        linkify::linkify(&filtered)
    }

    fn extract_text_stage(&self, sanitized: &str) -> String {
        self.text_extractor.clean(sanitized).to_string()
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new()
    }
}
