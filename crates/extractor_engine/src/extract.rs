//! Pure per-chapter extraction: parsed document to [`ChapterText`].

use scraper::{Html, Selector};

use crate::locate::{locate, LocatedContent};
use crate::reconstruct::{join_paragraphs, reconstruct};
use crate::sanitize::sanitize;
use crate::types::{ChapterId, ChapterText, FailureReason};

/// Sanitized content under this many characters is treated as a failed
/// extraction; placeholder and error pages tend to fall well below it.
pub const MIN_CONTENT_CHARS: usize = 100;

/// Extract one chapter from raw HTML. No I/O.
///
/// Title comes from the first `<h1>`, defaulting to `Chapter {id}`. Content
/// comes from the locator; fragment-bearing containers go through paragraph
/// reconstruction, raw-text fallbacks are used directly. Both paths are
/// sanitized before the minimum-length check.
pub fn extract_chapter(html: &str, chapter: ChapterId) -> Result<ChapterText, FailureReason> {
    let doc = Html::parse_document(html);

    let title = page_title(&doc).unwrap_or_else(|| format!("Chapter {chapter}"));

    let located = locate(&doc).ok_or(FailureReason::ContainerNotFound)?;
    let body = match &located.content {
        LocatedContent::Fragments(fragments) => join_paragraphs(&reconstruct(fragments)),
        LocatedContent::RawText(text) => text.clone(),
    };

    let body = sanitize(&body);
    let char_count = body.chars().count();
    if char_count < MIN_CONTENT_CHARS {
        return Err(FailureReason::ContentTooShort(char_count));
    }

    Ok(ChapterText {
        title,
        body,
        strategy: located.strategy,
        char_count,
    })
}

fn page_title(doc: &Html) -> Option<String> {
    let selector = Selector::parse("h1").ok()?;
    doc.select(&selector)
        .next()
        .map(|h1| h1.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}
