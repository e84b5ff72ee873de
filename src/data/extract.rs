//! Visible-text extraction from review pages.

use scraper::{ElementRef, Html, Node};

/// Default number of characters kept from a single page.
pub const DEFAULT_CHAR_CAP: usize = 3000;

/// Elements whose text (and that of their descendants) is never kept.
pub const EXCLUDED_TAGS: &[&str] = &["script", "style", "nav", "header", "footer"];

/// Extract visible text from `markup`, joined by single spaces and cut to `cap` characters.
///
/// Parsing is best-effort; malformed markup yields whatever text html5ever recovers.
pub fn extract_text(markup: &str, cap: usize) -> String {
    let document = Html::parse_document(markup);
    let mut runs = Vec::new();
    collect_runs(document.root_element(), &mut runs);
    truncate_chars(runs.join(" "), cap)
}

/// Same as [`extract_text`] with [`DEFAULT_CHAR_CAP`].
pub fn extract_text_default(markup: &str) -> String {
    extract_text(markup, DEFAULT_CHAR_CAP)
}

fn is_excluded(name: &str) -> bool {
    EXCLUDED_TAGS.iter().any(|tag| tag.eq_ignore_ascii_case(name))
}

fn collect_runs(element: ElementRef<'_>, runs: &mut Vec<String>) {
    if is_excluded(element.value().name()) {
        return;
    }
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    runs.push(trimmed.to_string());
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    collect_runs(child_element, runs);
                }
            }
            _ => {}
        }
    }
}

fn truncate_chars(mut text: String, cap: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(cap) {
        text.truncate(idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_boilerplate_sections() {
        let html = r#"<html><head><style>body { color: red }</style>
            <script>var tracking = 1;</script></head>
            <body><header>Site menu</header><nav><a>Home</a></nav>
            <p>  Ripe cherry and   </p><p>leather.</p>
            <footer>Copyright</footer></body></html>"#;
        assert_eq!(extract_text_default(html), "Ripe cherry and leather.");
    }

    #[test]
    fn nested_exclusions_do_not_leak() {
        let html = "<body><nav><div><script>x()</script>inside</div>still nav</nav>after</body>";
        assert_eq!(extract_text_default(html), "after");
    }

    #[test]
    fn truncates_on_char_boundaries() {
        let html = "<p>dégustation</p>";
        assert_eq!(extract_text(html, 3), "dég");
        assert_eq!(extract_text(html, 0), "");
    }

    #[test]
    fn tolerates_broken_markup() {
        let html = "<div><p>Silky tannins<p>long finish</span></div";
        assert_eq!(extract_text_default(html), "Silky tannins long finish");
    }
}
