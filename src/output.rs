//! CLI output formatting.
//!
//! # Output Format
//!
//! ## thumb
//!
//! One line per requested file, in request order, followed by a cache
//! summary when more than one file was given:
//!
//! ```text
//! generated img/beach.jpg → img/thumbs/beach-0x0px-200x150size.jpg
//! cached    img/dune.jpg → img/thumbs/dune-0x0px-200x133size.jpg
//! failed    img/notes.txt: Not a supported image file: img/notes.txt
//!
//! Cache: 1 cached, 1 generated (2 total)
//! ```
//!
//! ## prosize
//!
//! ```text
//! img/beach.jpg: 200x150
//! ```
//!
//! With `--json` each command prints a single JSON document instead.
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>` or `String`)
//! for testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::imaging::Dimensions;
use crate::render::{BatchOutcome, RenderError, Thumb};
use serde::Serialize;

/// Status column width: the longest label is `generated`.
const STATUS_WIDTH: usize = 9;

fn status_label(label: &str) -> String {
    format!("{:<width$}", label, width = STATUS_WIDTH)
}

/// Format one request's outcome.
///
/// ```text
/// generated img/a.jpg → img/thumbs/a-0x0px-10x10size.jpg
/// failed    img/b.jpg: Image not found: img/b.jpg
/// ```
pub fn format_thumb_line(file: &str, result: &Result<Thumb, RenderError>) -> String {
    match result {
        Ok(thumb) => format!(
            "{} {} → {}",
            status_label(&thumb.status.to_string()),
            file,
            thumb.url
        ),
        Err(e) => format!("{} {}: {}", status_label("failed"), file, e),
    }
}

/// Format a whole batch: one line per file, then the cache summary.
pub fn format_batch_output(outcome: &BatchOutcome) -> Vec<String> {
    let mut lines: Vec<String> = outcome
        .results
        .iter()
        .map(|(file, result)| format_thumb_line(file, result))
        .collect();

    if outcome.results.len() > 1 {
        lines.push(String::new());
        lines.push(format!("Cache: {}", outcome.stats));
    }
    lines
}

pub fn print_batch_output(outcome: &BatchOutcome) {
    for line in format_batch_output(outcome) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    file: &'a str,
    #[serde(flatten)]
    thumb: Option<&'a Thumb>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonBatch<'a> {
    results: Vec<JsonEntry<'a>>,
    hits: u32,
    misses: u32,
}

/// Format a batch as a JSON document.
pub fn format_batch_json(outcome: &BatchOutcome) -> Result<String, serde_json::Error> {
    let results = outcome
        .results
        .iter()
        .map(|(file, result)| JsonEntry {
            file,
            thumb: result.as_ref().ok(),
            error: result.as_ref().err().map(|e| e.to_string()),
        })
        .collect();
    serde_json::to_string_pretty(&JsonBatch {
        results,
        hits: outcome.stats.hits,
        misses: outcome.stats.misses,
    })
}

pub fn format_prosize(file: &str, dims: &Dimensions) -> String {
    format!("{}: {}x{}", file, dims.width, dims.height)
}

pub fn format_prosize_json(dims: &Dimensions) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(dims)
}

pub fn print_prosize(file: &str, dims: &Dimensions) {
    println!("{}", format_prosize(file, dims));
}
