//! Paragraph reconstruction from sentence fragments.
//!
//! The source markup serves narrative text as one `<sent>` element per
//! sentence, with no paragraph structure left. Paragraph boundaries are
//! re-derived from textual heuristics tuned for dialogue-heavy prose.

/// A fragment longer than this usually opens a new descriptive paragraph.
pub const LONG_FRAGMENT_CHARS: usize = 120;

/// Minimum length for the "period, then capitalized sentence" rule to fire.
pub const CAPITAL_SENTENCE_CHARS: usize = 80;

/// Regroup ordered sentence fragments into paragraphs.
///
/// Empty or whitespace-only fragments are dropped. The remaining fragments
/// are accumulated into a current paragraph (joined by single spaces); a
/// fragment starts a new paragraph when the first of these rules matches:
///
/// 1. it opens with a quotation mark and the previous fragment does not end
///    with one (a new utterance, typically by a different speaker),
/// 2. it is longer than [`LONG_FRAGMENT_CHARS`],
/// 3. the previous fragment ends with a period, this one starts with an
///    uppercase letter and is longer than [`CAPITAL_SENTENCE_CHARS`].
///
/// Rules 1-3 only apply once the current paragraph is non-empty, so a run
/// never begins with an empty paragraph. Fragment order is preserved within
/// and across paragraphs.
pub fn reconstruct<I, S>(fragments: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for fragment in fragments {
        let text = fragment.as_ref().trim();
        if text.is_empty() {
            continue;
        }

        if starts_new_paragraph(text, &current) {
            paragraphs.push(current.join(" "));
            current = vec![text.to_string()];
        } else {
            current.push(text.to_string());
        }
    }

    if !current.is_empty() {
        paragraphs.push(current.join(" "));
    }

    paragraphs
}

/// Join reconstructed paragraphs with one blank line.
pub fn join_paragraphs(paragraphs: &[String]) -> String {
    paragraphs.join("\n\n")
}

fn starts_new_paragraph(text: &str, current: &[String]) -> bool {
    let last = match current.last() {
        Some(last) => last.as_str(),
        // An empty paragraph accepts anything.
        None => return false,
    };

    if text.starts_with('"') && !last.ends_with('"') {
        return true;
    }

    let chars = text.chars().count();
    if chars > LONG_FRAGMENT_CHARS {
        return true;
    }

    last.ends_with('.')
        && text.chars().next().is_some_and(|c| c.is_uppercase())
        && chars > CAPITAL_SENTENCE_CHARS
}
