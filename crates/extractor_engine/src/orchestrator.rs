//! Bounded-concurrency extraction runs.
//!
//! Workers only fetch; every outcome flows over a channel to a single
//! aggregator loop that owns the report and the inventory writer. No
//! counters are shared across tasks.

use std::sync::Arc;
use std::time::{Duration, Instant};

use extractor_logging::{extract_info, extract_warn};
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use crate::fetch::PageFetcher;
use crate::persist::{ensure_output_dir, InventoryWriter, PersistError};
use crate::pipeline::fetch_chapter;
use crate::types::{ChapterId, ChapterOutcome, FailureReason, RunReport};

/// Worker pool size when the caller does not pick one.
pub const DEFAULT_WORKERS: usize = 8;

/// Hard cap on the pool; higher requests are clamped, not rejected.
pub const MAX_WORKERS: usize = 12;

/// A progress line is emitted every this many completions, and on the last.
pub const PROGRESS_INTERVAL: usize = 50;

/// Pause between fetches in sequential mode. The pool relies on its size as
/// the sole rate limiter and never applies this delay.
pub const SEQUENTIAL_DELAY: Duration = Duration::from_secs(1);

pub fn clamp_workers(requested: usize) -> usize {
    requested.clamp(1, MAX_WORKERS)
}

/// Run the pipeline over `ids` with a bounded worker pool.
///
/// Every id is dispatched exactly once; completion order is unspecified.
/// On success the aggregator writes the inventory entry (overwriting any
/// previous file); on failure it records the reason keyed by id. Cancelling
/// the token lets in-flight fetches finish, marks the rest as cancelled and
/// still yields the partial report.
pub async fn run_pool(
    ids: Vec<ChapterId>,
    fetcher: Arc<dyn PageFetcher>,
    base_url: &str,
    workers: usize,
    writer: &InventoryWriter,
    cancel: &CancellationToken,
) -> Result<RunReport, PersistError> {
    ensure_output_dir(writer.dir())?;
    let workers = clamp_workers(workers);
    let total = ids.len();
    let started = Instant::now();
    extract_info!("extracting {total} chapters with {workers} workers");

    let semaphore = Arc::new(Semaphore::new(workers));
    let (tx, mut rx) = mpsc::channel::<ChapterOutcome>(workers * 2);

    for chapter in ids {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        let tx = tx.clone();
        let cancel = cancel.clone();
        let base_url = base_url.to_string();
        tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return;
            };
            let outcome = if cancel.is_cancelled() {
                ChapterOutcome {
                    chapter,
                    result: Err(FailureReason::Cancelled),
                }
            } else {
                fetch_chapter(fetcher.as_ref(), &base_url, chapter).await
            };
            let _ = tx.send(outcome).await;
        });
    }
    // Close our sender so the aggregator loop ends when all tasks finish.
    drop(tx);

    let mut report = RunReport::new(total);
    while let Some(outcome) = rx.recv().await {
        apply_outcome(&mut report, writer, outcome);
        let completed = report.completed();
        if completed % PROGRESS_INTERVAL == 0 || completed == total {
            log_progress(&report, started);
        }
    }

    report.elapsed = started.elapsed();
    log_summary(&report);
    Ok(report)
}

/// Run the pipeline one chapter at a time with a politeness delay between
/// fetches. Used for explicit small id lists outside the pool.
pub async fn run_sequential(
    ids: &[ChapterId],
    fetcher: &dyn PageFetcher,
    base_url: &str,
    writer: &InventoryWriter,
    cancel: &CancellationToken,
) -> Result<RunReport, PersistError> {
    ensure_output_dir(writer.dir())?;
    let total = ids.len();
    let started = Instant::now();
    let mut report = RunReport::new(total);

    for (index, &chapter) in ids.iter().enumerate() {
        if cancel.is_cancelled() {
            for &rest in &ids[index..] {
                report.record_failure(rest, FailureReason::Cancelled.to_string());
            }
            break;
        }
        if index > 0 {
            tokio::time::sleep(SEQUENTIAL_DELAY).await;
        }
        extract_info!("extracting chapter {chapter} ({}/{total})", index + 1);
        let outcome = fetch_chapter(fetcher, base_url, chapter).await;
        apply_outcome(&mut report, writer, outcome);
    }

    report.elapsed = started.elapsed();
    log_summary(&report);
    Ok(report)
}

fn apply_outcome(report: &mut RunReport, writer: &InventoryWriter, outcome: ChapterOutcome) {
    match outcome.result {
        Ok(text) => match writer.write_chapter(outcome.chapter, &text) {
            Ok(path) => {
                report.record_success();
                extract_info!(
                    "chapter {} saved to {:?} ({} chars via {})",
                    outcome.chapter,
                    path,
                    text.char_count,
                    text.strategy
                );
            }
            Err(err) => {
                report.record_failure(outcome.chapter, format!("write failed: {err}"));
            }
        },
        Err(reason) => {
            report.record_failure(outcome.chapter, reason.to_string());
        }
    }
}

fn log_progress(report: &RunReport, started: Instant) {
    let elapsed = started.elapsed();
    let completed = report.completed();
    let percent = if report.total > 0 {
        completed as f64 / report.total as f64 * 100.0
    } else {
        100.0
    };
    extract_info!(
        "progress: {completed}/{} ({percent:.1}%) | rate: {:.1} ch/sec | eta: {:.1} min",
        report.total,
        report.rate(elapsed),
        report.eta_secs(elapsed) / 60.0
    );
}

fn log_summary(report: &RunReport) {
    extract_info!(
        "extraction complete: {} succeeded, {} failed in {:.1}s",
        report.success_count,
        report.failure_count,
        report.elapsed.as_secs_f64()
    );
    for (chapter, reason) in &report.failures {
        extract_warn!("chapter {chapter}: {reason}");
    }
}
