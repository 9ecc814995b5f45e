use std::cell::Cell;
use std::rc::Rc;

use lol_html::html_content::ContentType;
use lol_html::{RewriteStrSettings, doc_text, element, rewrite_str};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::application::render::types::RenderError;

/// Candidate URLs inside serialized text nodes. The input is already
/// HTML-escaped, so `<` and `>` cannot occur raw; quotes can.
static URL_CANDIDATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s"'<>]+"#).expect("URL pattern must compile")
});

/// Entity boundaries that end a candidate early. `&amp;` is deliberately not
/// among them: an ampersand is a legitimate URL character.
const STOP_ENTITIES: [&str; 4] = ["&lt;", "&gt;", "&quot;", "&#39;"];

const TRAILING_PUNCTUATION: [char; 6] = ['.', ',', ';', ':', '!', '?'];

/// Rewrite bare URLs in text nodes into nofollow, new-tab anchors.
///
/// Runs on sanitized HTML only. Text inside existing anchors and inside
/// code/pre blocks is left alone, which also makes the pass idempotent:
/// a URL that was linkified once is inside an `<a>` on the next pass.
pub(crate) fn linkify(html: &str) -> Result<String, RenderError> {
    let suppressed = Rc::new(Cell::new(0usize));
    let suppressed_for_elements = Rc::clone(&suppressed);
    let suppressed_for_text = Rc::clone(&suppressed);
    let mut pending = String::new();

    rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![element!("a, code, pre", move |el| {
                suppressed_for_elements.set(suppressed_for_elements.get() + 1);
                let on_close = Rc::clone(&suppressed_for_elements);
                if let Some(handlers) = el.end_tag_handlers() {
                    let handler: lol_html::EndTagHandler<'static> = Box::new(move |_end| {
                        on_close.set(on_close.get().saturating_sub(1));
                        Ok(())
                    });
                    handlers.push(handler);
                }
                Ok(())
            })],
            document_content_handlers: vec![doc_text!(move |chunk| {
                if suppressed_for_text.get() > 0 {
                    return Ok(());
                }

                // lol_html may split one text node across chunks; buffer until
                // the final chunk so a URL cannot be cut in half.
                if !chunk.last_in_text_node() {
                    pending.push_str(chunk.as_str());
                    chunk.remove();
                    return Ok(());
                }

                if pending.is_empty() {
                    if let Some(rewritten) = linkify_text(chunk.as_str()) {
                        chunk.replace(&rewritten, ContentType::Html);
                    }
                    return Ok(());
                }

                let mut text = std::mem::take(&mut pending);
                text.push_str(chunk.as_str());
                let rewritten = linkify_text(&text).unwrap_or(text);
                chunk.replace(&rewritten, ContentType::Html);
                Ok(())
            })],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|_| RenderError::Parse)
}

/// Returns the rewritten text when at least one URL was linkified.
fn linkify_text(text: &str) -> Option<String> {
    let mut output = String::with_capacity(text.len());
    let mut cursor = 0usize;
    let mut changed = false;

    for found in URL_CANDIDATE.find_iter(text) {
        let candidate = trim_candidate(&text[found.start()..found.end()]);
        if candidate.is_empty() {
            continue;
        }

        let Some(href) = resolve_href(candidate) else {
            continue;
        };

        output.push_str(&text[cursor..found.start()]);
        // Attribute order matches what the sanitizer itself produces for
        // anchors, keeping re-sanitization byte-identical.
        output.push_str("<a href=\"");
        output.push_str(&href);
        output.push_str("\" target=\"_blank\" rel=\"nofollow\">");
        output.push_str(candidate);
        output.push_str("</a>");
        cursor = found.start() + candidate.len();
        changed = true;
    }

    if !changed {
        return None;
    }

    output.push_str(&text[cursor..]);
    Some(output)
}

/// Cut the candidate at the first stop entity and drop trailing punctuation
/// that is far more likely to belong to the sentence than to the URL.
fn trim_candidate(candidate: &str) -> &str {
    let mut end = candidate.len();

    for entity in STOP_ENTITIES {
        if let Some(position) = candidate.find(entity) {
            end = end.min(position);
        }
    }

    let mut trimmed = &candidate[..end];
    loop {
        let Some(last) = trimmed.chars().last() else {
            break;
        };
        if TRAILING_PUNCTUATION.contains(&last) {
            trimmed = &trimmed[..trimmed.len() - last.len_utf8()];
            continue;
        }
        // A closing paren stays only when the URL itself opened one.
        if last == ')' && !trimmed.contains('(') {
            trimmed = &trimmed[..trimmed.len() - 1];
            continue;
        }
        break;
    }

    trimmed
}

/// Validate the candidate and produce the href, prefixing scheme-less
/// `www.` hosts. Returns None when the candidate is not a parseable URL.
fn resolve_href(candidate: &str) -> Option<String> {
    let href = if candidate[..4.min(candidate.len())].eq_ignore_ascii_case("www.") {
        format!("http://{candidate}")
    } else {
        candidate.to_string()
    };

    // The text is entity-escaped; parse the decoded form but keep the
    // escaped form in the attribute, which is how it serializes anyway.
    let decoded = href.replace("&amp;", "&");
    let parsed = Url::parse(&decoded).ok()?;
    if parsed.host_str().is_none() {
        return None;
    }

    Some(href)
}
