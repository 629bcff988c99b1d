//! Extractor engine: concurrent chapter fetch, reconstruction and persistence.
mod decode;
mod extract;
mod fetch;
mod inventory;
mod locate;
mod orchestrator;
mod persist;
mod pipeline;
mod reconstruct;
mod sanitize;
mod types;

pub use decode::{decode_page, DecodedPage};
pub use extract::{extract_chapter, MIN_CONTENT_CHARS};
pub use fetch::{FetchSettings, FetchedPage, PageFetcher, ReqwestFetcher, BROWSER_USER_AGENT};
pub use inventory::{chapter_filename, find_missing, group_runs, render_entry};
pub use locate::{locate, Located, LocatedContent};
pub use orchestrator::{
    clamp_workers, run_pool, run_sequential, DEFAULT_WORKERS, MAX_WORKERS, PROGRESS_INTERVAL,
    SEQUENTIAL_DELAY,
};
pub use persist::{ensure_output_dir, InventoryWriter, PersistError};
pub use pipeline::{chapter_url, fetch_chapter};
pub use reconstruct::{
    join_paragraphs, reconstruct, CAPITAL_SENTENCE_CHARS, LONG_FRAGMENT_CHARS,
};
pub use sanitize::sanitize;
pub use types::{
    ChapterId, ChapterOutcome, ChapterText, FailureReason, RunReport, Strategy,
};
