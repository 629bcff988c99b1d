mod config;
mod logging;
mod report;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use extractor_engine::{
    clamp_workers, find_missing, run_pool, run_sequential, ChapterId, FetchSettings,
    InventoryWriter, ReqwestFetcher, RunReport,
};
use extractor_logging::extract_warn;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(
    name = "chapter_extractor",
    about = "Bulk chapter extraction: fetch, reconstruct and persist numbered chapters"
)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CommonArgs {
    /// Base URL of the remote source; chapters live at {base}/{id}
    #[arg(long)]
    base_url: Option<String>,
    /// Directory holding the extracted chapter files
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Parallel workers (default 8, clamped to 12)
    #[arg(short, long)]
    workers: Option<usize>,
    /// Disable TLS certificate verification for the remote source
    #[arg(long)]
    insecure: bool,
    /// Also write the final run report as JSON to this path
    #[arg(long)]
    report_json: Option<PathBuf>,
    /// Also log to ./extractor.log
    #[arg(long)]
    log_file: bool,
    /// Optional RON settings file
    #[arg(long, default_value = "extractor.ron")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a chapter range for gaps and extract the missing chapters
    Missing {
        /// First chapter of the range (prompted if omitted, default 1)
        #[arg(long)]
        start: Option<ChapterId>,
        /// Last chapter of the range (prompted if omitted, default 1200)
        #[arg(long)]
        end: Option<ChapterId>,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Extract an explicit list of chapter ids
    Fetch {
        /// Chapter ids to extract
        #[arg(required = true)]
        chapters: Vec<ChapterId>,
        /// Fetch one chapter at a time with a politeness delay
        #[arg(long)]
        sequential: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::initialize(if cli.common.log_file {
        logging::LogDestination::Both
    } else {
        logging::LogDestination::Terminal
    });

    let settings = config::Settings::load(&cli.common.config);
    let base_url = cli
        .common
        .base_url
        .clone()
        .unwrap_or_else(|| settings.base_url.clone());
    let output_dir = cli
        .common
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir.clone());
    let workers = clamp_workers(cli.common.workers.unwrap_or(settings.workers));

    let insecure = cli.common.insecure || !settings.verify_certs;
    if insecure {
        extract_warn!("TLS certificate verification is DISABLED for {base_url}");
    }
    let fetcher = Arc::new(
        ReqwestFetcher::new(FetchSettings {
            accept_invalid_certs: insecure,
            ..FetchSettings::default()
        })
        .map_err(|err| anyhow!("building http client: {err}"))?,
    );
    let writer = InventoryWriter::new(output_dir.clone());

    // A single Ctrl-C finishes in-flight chapters and still prints the
    // partial report; the process exits cleanly.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                extract_warn!("interrupt received, finishing in-flight chapters");
                cancel.cancel();
            }
        });
    }

    let run: RunReport = match cli.command {
        Commands::Missing { start, end, yes } => {
            let confirmed = yes || (start.is_some() && end.is_some());
            let start = resolve_or_prompt(start, "Enter start chapter number", 1)?;
            let end = resolve_or_prompt(end, "Enter end chapter number", 1200)?;
            if end < start {
                bail!("end chapter ({end}) must not be before start chapter ({start})");
            }

            let missing = find_missing(&output_dir, start, end);
            if missing.is_empty() {
                println!("No missing chapters in range {start}-{end}.");
                return Ok(());
            }
            report::print_gaps(&missing);

            if !confirmed {
                let question = format!("Extract all {} missing chapters?", missing.len());
                if !confirm(&question)? {
                    println!("Extraction cancelled.");
                    return Ok(());
                }
            }

            run_pool(missing, fetcher, &base_url, workers, &writer, &cancel)
                .await
                .context("extraction run failed")?
        }
        Commands::Fetch {
            chapters,
            sequential,
        } => {
            if sequential || chapters.len() == 1 {
                run_sequential(&chapters, fetcher.as_ref(), &base_url, &writer, &cancel)
                    .await
                    .context("extraction run failed")?
            } else {
                run_pool(chapters, fetcher, &base_url, workers, &writer, &cancel)
                    .await
                    .context("extraction run failed")?
            }
        }
    };

    report::print_summary(&run, &output_dir);
    if let Some(path) = cli.common.report_json.as_deref() {
        report::write_json(&run, path)?;
    }
    Ok(())
}

/// Use the flag value when given, otherwise prompt with a default. An empty
/// line takes the default; anything unparseable is a setup error.
fn resolve_or_prompt(value: Option<ChapterId>, prompt: &str, default: ChapterId) -> Result<ChapterId> {
    if let Some(value) = value {
        return Ok(value);
    }
    print!("{prompt} (default: {default}): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        return Ok(default);
    }
    line.parse()
        .with_context(|| format!("invalid chapter number: {line:?}"))
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} (y/n): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().eq_ignore_ascii_case("y"))
}
