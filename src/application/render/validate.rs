use serde_json::Value;
use velina_api_types::RenderRequest;

use super::types::{MAX_MARKDOWN_BYTES, RenderError, ValidatedRequest};

/// Classify the decoded request body into a validated markdown string or a
/// precise input error. The size check measures encoded bytes, not characters;
/// response statistics later report characters. Both units are intentional.
pub fn validate(request: RenderRequest) -> Result<ValidatedRequest, RenderError> {
    let markdown = match request.markdown {
        None | Some(Value::Null) => return Err(RenderError::MissingField),
        Some(Value::String(markdown)) => markdown,
        Some(_) => return Err(RenderError::WrongType),
    };

    if markdown.len() > MAX_MARKDOWN_BYTES {
        return Err(RenderError::TooLarge);
    }

    let strip_html = match request.strip_html {
        None | Some(Value::Null) => false,
        Some(Value::Bool(strip_html)) => strip_html,
        Some(_) => return Err(RenderError::StripHtmlWrongType),
    };

    Ok(ValidatedRequest {
        markdown,
        strip_html,
    })
}
