//! Text extraction: HTML in, flattened readable text out.
//!
//! Extraction is an ordered list of pure strategies tried until one
//! yields non-empty output: body paragraphs, then a meta description,
//! then an Open Graph description, then the page title. A page where
//! every strategy comes up empty returns an empty string and is simply
//! dropped upstream.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose text is never content: scripts, styles, and
/// decorative/structural chrome.
const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "header", "footer", "svg", "iframe", "nav", "aside",
];

type Strategy = fn(&Html) -> Option<String>;

/// Fallback chain, in priority order.
const STRATEGIES: &[Strategy] = &[
    paragraph_text,
    meta_description,
    og_description,
    title_text,
];

/// Extract readable text from an HTML document.
///
/// Returns an empty string when no strategy yields text.
pub fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);

    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(&document))
        .unwrap_or_default()
}

/// Visible text of all paragraph elements, space-joined and
/// whitespace-collapsed. Paragraphs inside chrome elements are skipped.
fn paragraph_text(document: &Html) -> Option<String> {
    let paragraphs = Selector::parse("p").unwrap();

    let mut buf = String::new();
    for p in document.select(&paragraphs) {
        if inside_chrome(p) {
            continue;
        }
        visible_text(p, &mut buf);
        buf.push(' ');
    }

    non_empty(collapse_whitespace(&buf))
}

fn meta_description(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[name="description"]"#)
}

fn og_description(document: &Html) -> Option<String> {
    meta_content(document, r#"meta[property="og:description"]"#)
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let meta = Selector::parse(selector).unwrap();
    document
        .select(&meta)
        .next()
        .and_then(|el| el.value().attr("content"))
        .and_then(|content| non_empty(content.trim().to_string()))
}

fn title_text(document: &Html) -> Option<String> {
    let title = Selector::parse("title").unwrap();
    document
        .select(&title)
        .next()
        .map(|el| el.text().collect::<String>())
        .and_then(|text| non_empty(text.trim().to_string()))
}

/// Collect text under `el`, skipping any subtree rooted at a
/// non-content element.
fn visible_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(text);
                out.push(' ');
            }
            Node::Element(element) => {
                if NON_CONTENT_TAGS.contains(&element.name()) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    visible_text(child_el, out);
                }
            }
            _ => {}
        }
    }
}

/// True if any ancestor of `el` is a non-content element.
fn inside_chrome(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| NON_CONTENT_TAGS.contains(&ancestor.value().name()))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_extraction() {
        let html = r#"
            <html><body>
                <p>First  paragraph.</p>
                <p>Second
                paragraph.</p>
            </body></html>
        "#;
        assert_eq!(extract_text(html), "First paragraph. Second paragraph.");
    }

    #[test]
    fn test_chrome_is_stripped() {
        let html = r#"
            <html><body>
                <nav><p>Menu item</p></nav>
                <header><p>Masthead</p></header>
                <p>Real content.</p>
                <footer><p>Copyright</p></footer>
            </body></html>
        "#;
        assert_eq!(extract_text(html), "Real content.");
    }

    #[test]
    fn test_script_inside_paragraph_skipped() {
        let html = "<p>Visible <script>var hidden = 1;</script>text</p>";
        assert_eq!(extract_text(html), "Visible text");
    }

    #[test]
    fn test_nested_markup_in_paragraph() {
        let html = "<p>Some <b>bold</b> and <a href='#'>linked</a> words</p>";
        assert_eq!(extract_text(html), "Some bold and linked words");
    }

    #[test]
    fn test_meta_description_fallback() {
        let html = r#"
            <html><head>
                <meta name="description" content="  A meta description.  ">
                <title>Page Title</title>
            </head><body><div>no paragraphs here</div></body></html>
        "#;
        assert_eq!(extract_text(html), "A meta description.");
    }

    #[test]
    fn test_og_description_fallback() {
        let html = r#"
            <html><head>
                <meta property="og:description" content="OG description.">
                <title>Page Title</title>
            </head><body></body></html>
        "#;
        assert_eq!(extract_text(html), "OG description.");
    }

    #[test]
    fn test_title_fallback() {
        let html = "<html><head><title> Just a Title </title></head><body></body></html>";
        assert_eq!(extract_text(html), "Just a Title");
    }

    #[test]
    fn test_nothing_extractable() {
        assert_eq!(extract_text("<html><body><div>bare div</div></body></html>"), "");
        assert_eq!(extract_text(""), "");
    }
}
