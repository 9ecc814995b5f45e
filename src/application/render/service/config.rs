use std::collections::{HashMap, HashSet};

use ammonia::Builder as AmmoniaBuilder;
use comrak::options::Options;

pub(crate) fn default_options() -> Options<'static> {
    let mut options = Options::default();

    let ext = &mut options.extension;
    ext.table = true;
    ext.strikethrough = true;

    // Raw HTML in the source is escaped to inert text. The sanitizer is the
    // only authority over which HTML reaches the output; this setting and the
    // allow-list below must change together or not at all.
    let render = &mut options.render;
    render.r#unsafe = false;
    render.escape = true;

    options
}

pub(crate) fn build_sanitizer() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    let tags: HashSet<&'static str> = HashSet::from([
        "a",
        "abbr",
        "acronym",
        "b",
        "blockquote",
        "br",
        "code",
        "em",
        "i",
        "li",
        "ol",
        "p",
        "pre",
        "strong",
        "ul",
        "h1",
        "h2",
        "h3",
        "h4",
        "h5",
        "h6",
        "hr",
        "table",
        "thead",
        "tbody",
        "tr",
        "th",
        "td",
    ]);
    builder.tags(tags);

    builder.generic_attributes(HashSet::new());

    let mut tag_attributes: HashMap<&'static str, HashSet<&'static str>> = HashMap::new();
    tag_attributes.insert("a", HashSet::from(["href", "title"]));
    tag_attributes.insert("abbr", HashSet::from(["title"]));
    tag_attributes.insert("acronym", HashSet::from(["title"]));
    tag_attributes.insert("th", HashSet::from(["colspan", "rowspan"]));
    tag_attributes.insert("td", HashSet::from(["colspan", "rowspan"]));
    builder.tag_attributes(tag_attributes);

    builder.url_schemes(HashSet::from(["http", "https", "mailto"]));

    // Every surviving anchor is pinned to nofollow + new-tab, whatever the
    // author wrote. Caller-authored rel/target values never pass through.
    builder.link_rel(Some("nofollow"));
    builder.set_tag_attribute_value("a", "target", "_blank");

    builder
}

pub(crate) fn build_text_extractor() -> AmmoniaBuilder<'static> {
    let mut builder = AmmoniaBuilder::default();

    builder.tags(HashSet::new());
    builder.generic_attributes(HashSet::new());
    builder.tag_attributes(HashMap::new());
    builder.link_rel(None);

    builder
}

#[cfg(test)]
mod tests {
    use super::{build_sanitizer, build_text_extractor};

    #[test]
    fn sanitizer_scrubs_script_content_entirely() {
        let sanitizer = build_sanitizer();
        let html = sanitizer
            .clean("<p>before</p><script>alert(1)</script><p>after</p>")
            .to_string();

        assert!(!html.contains("script"));
        assert!(!html.contains("alert"));
        assert!(html.contains("<p>before</p>"));
        assert!(html.contains("<p>after</p>"));
    }

    #[test]
    fn sanitizer_strips_unknown_tags_but_keeps_their_text() {
        let sanitizer = build_sanitizer();
        let html = sanitizer
            .clean("<p><del>gone</del> <span>kept</span></p>")
            .to_string();

        assert_eq!(html, "<p>gone kept</p>");
    }

    #[test]
    fn sanitizer_drops_event_handler_attributes() {
        let sanitizer = build_sanitizer();
        let html = sanitizer
            .clean("<p onclick=\"alert(1)\" onmouseover=\"x()\">hi</p>")
            .to_string();

        assert_eq!(html, "<p>hi</p>");
    }

    #[test]
    fn anchors_are_pinned_to_nofollow_and_new_tab() {
        let sanitizer = build_sanitizer();
        let html = sanitizer
            .clean("<a href=\"https://example.com\" rel=\"sponsored\" target=\"_self\">x</a>")
            .to_string();

        assert!(html.contains("rel=\"nofollow\""));
        assert!(html.contains("target=\"_blank\""));
        assert!(!html.contains("sponsored"));
        assert!(!html.contains("_self"));
    }

    #[test]
    fn anchor_href_schemes_are_restricted() {
        let sanitizer = build_sanitizer();
        let html = sanitizer
            .clean("<a href=\"javascript:alert(1)\">x</a>")
            .to_string();

        assert!(!html.contains("javascript"));
    }

    #[test]
    fn table_cell_span_attributes_survive() {
        let sanitizer = build_sanitizer();
        let html = sanitizer
            .clean("<table><thead><tr><th colspan=\"2\" align=\"left\">h</th></tr></thead></table>")
            .to_string();

        assert!(html.contains("colspan=\"2\""));
        assert!(!html.contains("align"));
    }

    #[test]
    fn text_extractor_removes_every_tag() {
        let extractor = build_text_extractor();
        let text = extractor
            .clean("<h1>Hi</h1><p>Visit <a href=\"http://example.com\">there</a></p>")
            .to_string();

        assert!(!text.contains('<'));
        assert!(!text.contains('>'));
        assert!(text.contains("Hi"));
        assert!(text.contains("there"));
    }
}
