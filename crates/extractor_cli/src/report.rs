//! Console and JSON rendering of scan results and run reports.

use std::fs;
use std::path::Path;

use anyhow::Context;
use extractor_engine::{group_runs, ChapterId, RunReport};
use serde::Serialize;

pub fn print_gaps(missing: &[ChapterId]) {
    println!("Found {} missing chapters:", missing.len());
    for (start, end) in group_runs(missing) {
        if start == end {
            println!("  chapter {start}");
        } else {
            println!("  chapters {start}-{end} ({} chapters)", end - start + 1);
        }
    }
}

pub fn print_summary(report: &RunReport, output_dir: &Path) {
    println!();
    println!("{}", "=".repeat(60));
    println!("Extraction complete.");
    println!("  succeeded: {}", report.success_count);
    println!("  failed:    {}", report.failure_count);
    println!(
        "  elapsed:   {:.1}s ({:.2} chapters/sec)",
        report.elapsed.as_secs_f64(),
        report.rate(report.elapsed)
    );
    println!("  saved in:  {}", output_dir.display());

    if !report.failures.is_empty() {
        println!();
        println!("Failed chapters (retry with `fetch` and exactly these ids):");
        for (chapter, reason) in &report.failures {
            println!("  chapter {chapter}: {reason}");
        }
    }
}

pub fn write_json(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    #[derive(Serialize)]
    struct TimestampedReport<'a> {
        finished_utc: String,
        #[serde(flatten)]
        report: &'a RunReport,
    }

    let doc = TimestampedReport {
        finished_utc: chrono::Utc::now().to_rfc3339(),
        report,
    };
    let json = serde_json::to_string_pretty(&doc)?;
    fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
    println!("Report written to {}", path.display());
    Ok(())
}
