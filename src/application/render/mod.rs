//! The conversion-and-sanitization pipeline: validated markdown in, sanitized
//! HTML (and optionally plain text) out. Data flows strictly forward and no
//! stage holds state across requests.

mod service;
mod types;
mod validate;

pub use service::RenderPipeline;
pub use types::{MAX_MARKDOWN_BYTES, RenderError, RenderOutcome, ValidatedRequest};
pub use validate::validate;
