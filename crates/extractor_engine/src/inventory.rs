//! The local inventory: per-chapter output files used both as the write
//! target and as the "already extracted" ledger. File existence is the sole
//! completion signal; there is no separate index.

use std::path::Path;

use crate::types::ChapterId;

/// Deterministic inventory filename, zero-padded to three digits.
pub fn chapter_filename(chapter: ChapterId) -> String {
    format!("Chapter_{chapter:03}.txt")
}

/// Render the persisted file body: title line, an `=` underline of matching
/// length, one blank line, then the content.
pub fn render_entry(title: &str, body: &str) -> String {
    let underline = "=".repeat(title.chars().count());
    format!("{title}\n{underline}\n\n{body}")
}

/// Chapters in `[start, end]` inclusive with no inventory file, ascending.
pub fn find_missing(dir: &Path, start: ChapterId, end: ChapterId) -> Vec<ChapterId> {
    (start..=end)
        .filter(|chapter| !dir.join(chapter_filename(*chapter)).exists())
        .collect()
}

/// Collapse an ascending id list into inclusive consecutive runs, for
/// compact display of gaps.
pub fn group_runs(ids: &[ChapterId]) -> Vec<(ChapterId, ChapterId)> {
    let mut runs = Vec::new();
    let mut ids = ids.iter().copied();
    let Some(first) = ids.next() else {
        return runs;
    };

    let mut start = first;
    let mut prev = first;
    for id in ids {
        if id != prev + 1 {
            runs.push((start, prev));
            start = id;
        }
        prev = id;
    }
    runs.push((start, prev));
    runs
}
