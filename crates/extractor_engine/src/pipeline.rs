//! Per-chapter pipeline: address, fetch, decode, extract.

use url::Url;

use crate::decode::decode_page;
use crate::extract::extract_chapter;
use crate::fetch::PageFetcher;
use crate::types::{ChapterId, ChapterOutcome, ChapterText, FailureReason};

/// Build the remote address for one chapter: `{base}/{id}`.
pub fn chapter_url(base_url: &str, chapter: ChapterId) -> Result<Url, FailureReason> {
    let joined = format!("{}/{chapter}", base_url.trim_end_matches('/'));
    Url::parse(&joined).map_err(|err| FailureReason::InvalidUrl(err.to_string()))
}

/// Fetch and extract one chapter. Pure with respect to the filesystem;
/// persistence is the orchestrator's job so retries and dry runs never need
/// changes here. Transport failures are returned immediately, never retried.
pub async fn fetch_chapter(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    chapter: ChapterId,
) -> ChapterOutcome {
    let result = fetch_and_extract(fetcher, base_url, chapter).await;
    ChapterOutcome { chapter, result }
}

async fn fetch_and_extract(
    fetcher: &dyn PageFetcher,
    base_url: &str,
    chapter: ChapterId,
) -> Result<ChapterText, FailureReason> {
    let url = chapter_url(base_url, chapter)?;
    let page = fetcher.fetch(url.as_str()).await?;
    let decoded = decode_page(&page.bytes, page.content_type.as_deref());
    extract_chapter(&decoded.text, chapter)
}
