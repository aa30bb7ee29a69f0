//! Markup-to-text helpers shared by the URL and DOCX paths

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));
static STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").expect("valid regex"));

/// Convert HTML to plain text by stripping tags and decoding entities
pub(crate) fn html_to_text(html: &str) -> String {
    let text = SCRIPT.replace_all(html, "");
    let text = STYLE.replace_all(&text, "");
    let text = TAG.replace_all(&text, " ");
    let text = decode_entities(&text);
    let text = WHITESPACE.replace_all(&text, " ");

    text.trim().to_string()
}

/// Extract title from HTML
pub(crate) fn extract_title(html: &str) -> Option<String> {
    TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
}

/// Decode the named entities HTML and WordprocessingML bodies use.
/// `&amp;` goes last so `&amp;lt;` decodes to `&lt;`, not `<`.
pub(crate) fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text() {
        let html = r#"<html><head><title>Terms</title><style>p { color: red; }</style>
            <script>var x = "<b>";</script></head>
            <body><h1>Terms &amp; Conditions</h1><p>You   agree.</p></body></html>"#;

        assert_eq!(html_to_text(html), "Terms Terms & Conditions You agree.");
        assert_eq!(extract_title(html).as_deref(), Some("Terms"));
    }

    #[test]
    fn test_entities_decode_once() {
        assert_eq!(decode_entities("&amp;lt;b&amp;gt;"), "&lt;b&gt;");
        assert_eq!(decode_entities("a &lt; b"), "a < b");
    }
}
