//! Content container location.
//!
//! The reader pages have shipped the chapter body under several different
//! containers over time. Strategies are tried in a fixed priority order;
//! the order is load-bearing for ambiguous documents and must not change.

use scraper::{ElementRef, Html, Selector};

use crate::types::Strategy;

/// What a locator strategy found inside its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatedContent {
    /// Ordered `<sent>` fragments, to be regrouped into paragraphs.
    Fragments(Vec<String>),
    /// Raw text of the container, used as-is by the fallback strategies.
    RawText(String),
}

/// A located container plus the strategy label that found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub content: LocatedContent,
    pub strategy: Strategy,
}

/// Find the best-matching content container.
///
/// Priority order:
/// 1. `div#showReading` with `<sent>` fragments,
/// 2. `div.readBox` with `<sent>` fragments,
/// 3. `div#readcontent` with `<sent>` fragments, falling back to the div's
///    raw text when it carries none,
/// 4. `div.textbox`, raw text directly.
///
/// Returns `None` when no strategy yields any content.
pub fn locate(doc: &Html) -> Option<Located> {
    if let Some(container) = select_first(doc, "div#showReading") {
        let fragments = sent_fragments(container);
        if !fragments.is_empty() {
            return Some(Located {
                content: LocatedContent::Fragments(fragments),
                strategy: Strategy::ShowReading,
            });
        }
    }

    if let Some(container) = select_first(doc, "div.readBox") {
        let fragments = sent_fragments(container);
        if !fragments.is_empty() {
            return Some(Located {
                content: LocatedContent::Fragments(fragments),
                strategy: Strategy::ReadBox,
            });
        }
    }

    if let Some(container) = select_first(doc, "div#readcontent") {
        let fragments = sent_fragments(container);
        let content = if fragments.is_empty() {
            LocatedContent::RawText(raw_text(container))
        } else {
            LocatedContent::Fragments(fragments)
        };
        if !is_empty_content(&content) {
            return Some(Located {
                content,
                strategy: Strategy::ReadContent,
            });
        }
    }

    if let Some(container) = select_first(doc, "div.textbox") {
        let text = raw_text(container);
        if !text.is_empty() {
            return Some(Located {
                content: LocatedContent::RawText(text),
                strategy: Strategy::TextBox,
            });
        }
    }

    None
}

fn select_first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    doc.select(&selector).next()
}

/// Collect the text of every `<sent>` element under `container`, in document
/// order, trimmed, with empties discarded.
fn sent_fragments(container: ElementRef<'_>) -> Vec<String> {
    let Ok(selector) = Selector::parse("sent") else {
        return Vec::new();
    };
    container
        .select(&selector)
        .map(|sent| sent.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

fn raw_text(container: ElementRef<'_>) -> String {
    container.text().collect::<String>().trim().to_string()
}

fn is_empty_content(content: &LocatedContent) -> bool {
    match content {
        LocatedContent::Fragments(fragments) => fragments.is_empty(),
        LocatedContent::RawText(text) => text.is_empty(),
    }
}
