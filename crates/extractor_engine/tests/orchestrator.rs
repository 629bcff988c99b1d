use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use extractor_engine::{
    chapter_filename, find_missing, run_pool, run_sequential, FailureReason, FetchedPage,
    InventoryWriter, PageFetcher,
};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

fn chapter_html(id: &str) -> String {
    format!(
        r#"<html><body><h1>Chapter {id}</h1><div id="showReading">
        <sent>A quiet road ran north from the village, past the mill and the long
        stone wall that marked the edge of the old estate grounds.</sent>
        </div></body></html>"#
    )
}

/// Serves a deterministic page per chapter, tracking how many fetches are in
/// flight at once. Chapters listed in `failing` get a transport error.
struct MockFetcher {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    failing: Vec<String>,
    delay: Duration,
}

impl MockFetcher {
    fn new(delay: Duration, failing: &[u32]) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            failing: failing.iter().map(|id| format!("/{id}")).collect(),
            delay,
        }
    }

    fn max_seen(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FailureReason> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.iter().any(|suffix| url.ends_with(suffix)) {
            return Err(FailureReason::Network("connection reset".into()));
        }
        let id = url.rsplit('/').next().unwrap_or_default();
        Ok(FetchedPage {
            bytes: chapter_html(id).into_bytes(),
            content_type: Some("text/html; charset=utf-8".to_string()),
        })
    }
}

#[tokio::test]
async fn pool_never_exceeds_worker_bound() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let fetcher = Arc::new(MockFetcher::new(Duration::from_millis(25), &[]));
    let ids: Vec<u32> = (1..=40).collect();

    let report = run_pool(
        ids,
        fetcher.clone(),
        "https://example.com/book",
        8,
        &writer,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 40);
    assert_eq!(report.failure_count, 0);
    assert!(fetcher.max_seen() <= 8, "saw {} in flight", fetcher.max_seen());
    // With 40 jobs and brief fetches, the pool should actually fan out.
    assert!(fetcher.max_seen() > 1);
}

#[tokio::test]
async fn oversized_worker_request_is_clamped() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let fetcher = Arc::new(MockFetcher::new(Duration::from_millis(25), &[]));
    let ids: Vec<u32> = (1..=30).collect();

    let report = run_pool(
        ids,
        fetcher.clone(),
        "https://example.com/book",
        64,
        &writer,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 30);
    assert!(fetcher.max_seen() <= 12, "saw {} in flight", fetcher.max_seen());
}

#[tokio::test]
async fn one_transport_error_does_not_touch_other_chapters() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let fetcher = Arc::new(MockFetcher::new(Duration::from_millis(5), &[3]));
    let ids: Vec<u32> = (1..=6).collect();

    let report = run_pool(
        ids,
        fetcher,
        "https://example.com/book",
        4,
        &writer,
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 5);
    assert_eq!(report.failure_count, 1);
    assert!(report.failures[&3].contains("network error"));
    assert!(!temp.path().join(chapter_filename(3)).exists());
    for id in [1u32, 2, 4, 5, 6] {
        let content = fs::read_to_string(temp.path().join(chapter_filename(id))).unwrap();
        assert!(content.starts_with(&format!("Chapter {id}\n")));
    }
}

#[tokio::test]
async fn rerun_is_idempotent_and_closes_the_gap_report() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let fetcher = Arc::new(MockFetcher::new(Duration::from_millis(1), &[]));
    let ids: Vec<u32> = (1..=9).collect();

    run_pool(
        ids.clone(),
        fetcher.clone(),
        "https://example.com/book",
        4,
        &writer,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    let first: Vec<Vec<u8>> = ids
        .iter()
        .map(|id| fs::read(temp.path().join(chapter_filename(*id))).unwrap())
        .collect();

    assert!(find_missing(temp.path(), 1, 9).is_empty());

    run_pool(
        ids.clone(),
        fetcher,
        "https://example.com/book",
        4,
        &writer,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    let second: Vec<Vec<u8>> = ids
        .iter()
        .map(|id| fs::read(temp.path().join(chapter_filename(*id))).unwrap())
        .collect();

    assert_eq!(first, second);
}

#[tokio::test]
async fn cancelled_run_still_produces_a_partial_report() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let fetcher = Arc::new(MockFetcher::new(Duration::from_millis(5), &[]));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run_pool(
        (1..=10).collect(),
        fetcher,
        "https://example.com/book",
        4,
        &writer,
        &cancel,
    )
    .await
    .unwrap();

    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 10);
    assert!(report.failures.values().all(|reason| reason == "cancelled"));
}

#[tokio::test]
async fn sequential_run_extracts_and_respects_cancellation() {
    let temp = TempDir::new().unwrap();
    let writer = InventoryWriter::new(temp.path().to_path_buf());
    let fetcher = MockFetcher::new(Duration::from_millis(1), &[]);

    let report = run_sequential(
        &[2],
        &fetcher,
        "https://example.com/book",
        &writer,
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(report.success_count, 1);
    assert!(temp.path().join(chapter_filename(2)).exists());

    let cancel = CancellationToken::new();
    cancel.cancel();
    let report = run_sequential(&[3, 4], &fetcher, "https://example.com/book", &writer, &cancel)
        .await
        .unwrap();
    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 2);
}
