//! `extract` command handler.
//!
//! Every input file is processed independently. Per-file failures are
//! logged and counted rather than propagated so one unreadable page does
//! not abort the run; the command only fails when no input succeeded.

use std::path::{Path, PathBuf};

use chrono::Utc;
use prodx_core::ExtractedRecord;
use prodx_extract::{assemble_at, persist, Document};

use crate::summary::ProductSummary;

/// Resolved settings for one `extract` run (CLI flags over config).
#[derive(Debug, Clone)]
pub(crate) struct ExtractOptions {
    pub url: Option<String>,
    pub output_dir: PathBuf,
    pub summary: bool,
    pub stdout: bool,
    pub max_input_bytes: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RunTally {
    pub succeeded: usize,
    pub failed: usize,
}

/// Extract each of `inputs` and emit its record.
///
/// Records go to `options.output_dir` as one JSON file each, or to stdout
/// when `options.stdout` is set. With `options.summary` a short report is
/// printed per product (to stderr in stdout mode, so the JSON stays clean).
///
/// # Errors
///
/// Returns an error if `--url` is combined with several inputs, or if every
/// input failed.
pub(crate) fn run_extract(inputs: &[PathBuf], options: &ExtractOptions) -> anyhow::Result<RunTally> {
    if options.url.is_some() && inputs.len() > 1 {
        anyhow::bail!(
            "--url applies to a single input file; got {} files",
            inputs.len()
        );
    }

    let mut tally = RunTally::default();
    for path in inputs {
        match extract_file(path, options) {
            Ok(()) => tally.succeeded += 1,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "extraction failed; skipping input");
                tally.failed += 1;
            }
        }
    }

    tracing::info!(
        succeeded = tally.succeeded,
        failed = tally.failed,
        "extract run complete"
    );

    if tally.succeeded == 0 {
        anyhow::bail!("all {} input file(s) failed", tally.failed);
    }
    Ok(tally)
}

fn extract_file(path: &Path, options: &ExtractOptions) -> anyhow::Result<()> {
    let markup = read_markup(path, options.max_input_bytes)?;
    let url = options.url.clone().unwrap_or_else(|| file_url(path));

    let doc = Document::parse(&markup);
    let assembly = assemble_at(&doc, &url, Utc::now());
    if assembly.fault_count() > 0 {
        tracing::warn!(
            path = %path.display(),
            faults = assembly.fault_count(),
            "record assembled with extractor faults"
        );
    }

    emit(&assembly.record, options)
}

fn emit(record: &ExtractedRecord, options: &ExtractOptions) -> anyhow::Result<()> {
    if options.stdout {
        println!("{}", persist::to_json_pretty(record)?);
        if options.summary {
            eprintln!("{}", ProductSummary::from_record(record));
        }
        return Ok(());
    }

    let written = persist::write_record(record, &options.output_dir)?;
    println!("wrote {}", written.display());
    if options.summary {
        println!("{}", ProductSummary::from_record(record));
    }
    Ok(())
}

/// Reads `path` as text, rejecting files over `max_bytes`.
///
/// Invalid UTF-8 is replaced rather than rejected; saved pages are not
/// always cleanly encoded.
fn read_markup(path: &Path, max_bytes: u64) -> anyhow::Result<String> {
    let len = std::fs::metadata(path)
        .map_err(|e| anyhow::anyhow!("failed to stat {}: {e}", path.display()))?
        .len();
    if len > max_bytes {
        anyhow::bail!(
            "{} is {len} bytes, over the {max_bytes} byte input limit",
            path.display()
        );
    }

    let bytes = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// `file://` URL for a local input, absolute when the path can be resolved.
fn file_url(path: &Path) -> String {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    format!("file://{}", absolute.display())
}
