use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Positive integer identifying one chapter, used both in the remote
/// address and the local filename.
pub type ChapterId = u32;

/// Which locator strategy produced the content. Diagnostic only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    ShowReading,
    ReadBox,
    ReadContent,
    TextBox,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ShowReading => write!(f, "showReading div with <sent> tags"),
            Strategy::ReadBox => write!(f, "readBox div with <sent> tags"),
            Strategy::ReadContent => write!(f, "readcontent div"),
            Strategy::TextBox => write!(f, "textbox div"),
        }
    }
}

/// Successfully extracted chapter text, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterText {
    pub title: String,
    /// Paragraphs joined with one blank line, already sanitized.
    pub body: String,
    pub strategy: Strategy,
    pub char_count: usize,
}

/// Per-chapter failure. All variants are local and non-fatal: one chapter's
/// failure never aborts the run or affects other chapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    InvalidUrl(String),
    HttpStatus(u16),
    Timeout,
    Network(String),
    TooLarge { max_bytes: u64 },
    ContainerNotFound,
    ContentTooShort(usize),
    Cancelled,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::InvalidUrl(msg) => write!(f, "invalid url: {msg}"),
            FailureReason::HttpStatus(code) => write!(f, "http status {code}"),
            FailureReason::Timeout => write!(f, "request timed out"),
            FailureReason::Network(msg) => write!(f, "network error: {msg}"),
            FailureReason::TooLarge { max_bytes } => {
                write!(f, "response larger than {max_bytes} bytes")
            }
            FailureReason::ContainerNotFound => write!(f, "no content container found"),
            FailureReason::ContentTooShort(chars) => {
                write!(f, "content too short: {chars} chars")
            }
            FailureReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The typed result for one chapter, produced once by the fetch pipeline
/// and consumed once by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterOutcome {
    pub chapter: ChapterId,
    pub result: Result<ChapterText, FailureReason>,
}

/// Aggregate of all outcomes for one invocation. Owned by the orchestrator's
/// aggregator loop; workers never touch it.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total: usize,
    pub success_count: usize,
    pub failure_count: usize,
    /// Human-readable reason per failed chapter, sorted by id so a caller
    /// can target a narrow retry with exactly these ids.
    pub failures: BTreeMap<ChapterId, String>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            success_count: 0,
            failure_count: 0,
            failures: BTreeMap::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, chapter: ChapterId, reason: String) {
        self.failure_count += 1;
        self.failures.insert(chapter, reason);
    }

    pub fn completed(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// Completions per second over the given elapsed time.
    pub fn rate(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.completed() as f64 / secs
        } else {
            0.0
        }
    }

    /// Estimated seconds remaining at the current rate.
    pub fn eta_secs(&self, elapsed: Duration) -> f64 {
        let rate = self.rate(elapsed);
        if rate > 0.0 {
            (self.total - self.completed()) as f64 / rate
        } else {
            0.0
        }
    }
}
