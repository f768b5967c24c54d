//! Link and word extraction from fetched html.

use crate::tokenizer::Words;
use lazy_static::lazy_static;
use scraper::{Html, Node, Selector};
use url::Url;

lazy_static! {
    static ref ANCHORS: Selector = Selector::parse("a[href]").expect("valid selector");
}

/// Absolute targets of every `<a href>` in `html`, resolved against `base_url`.
///
/// The result may contain duplicates and links to other hosts; filtering is the caller's job.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let Ok(base) = Url::parse(base_url) else { return Vec::new() };
    let doc = Html::parse_document(html);
    doc.select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !skip_href(href))
        .filter_map(|href| base.join(href).ok())
        .map(|u| u.to_string())
        .collect()
}

fn skip_href(href: &str) -> bool {
    href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
}

/// Text content of the document, skipping script and style bodies.
pub fn visible_text(html: &str) -> String {
    let doc = Html::parse_document(html);
    let mut out = String::new();
    for node in doc.tree.root().descendants() {
        let Node::Text(text) = node.value() else { continue };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| matches!(e.name(), "script" | "style" | "noscript")))
            .unwrap_or(false);
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    out
}

/// Raw words of the page in document order, not yet normalized.
pub fn extract_words(html: &str) -> Words {
    Words::new(visible_text(html))
}
