//! Table parsing: raw pipe-delimited text → [`WorksheetRow`]s.
//!
//! The generated text is semi-structured: two header lines (column names and
//! a `---` separator), then one `exercise|translation|answer` row per line.
//! Parsing is lenient about the payload and strict about the shape: a line
//! with fewer than three fields is dropped, never padded; extra fields past
//! the third are ignored. Parsing cannot fail.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of leading lines treated as header.
const HEADER_LINES: usize = 2;

/// One worksheet entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorksheetRow {
    /// The sentence with one word or phrase replaced by the blank marker.
    pub exercise: String,
    /// Korean translation of the full sentence.
    pub translation: String,
    /// The blanked-out word or phrase.
    pub answer: String,
}

impl WorksheetRow {
    /// The three cells in column order.
    pub fn cells(&self) -> [&str; 3] {
        [
            self.exercise.as_str(),
            self.translation.as_str(),
            self.answer.as_str(),
        ]
    }
}

/// Parse generated table text into rows, preserving input order.
pub fn parse_table(raw: &str) -> Vec<WorksheetRow> {
    let mut dropped = 0usize;
    let rows: Vec<WorksheetRow> = raw
        .trim()
        .lines()
        .skip(HEADER_LINES)
        .filter_map(|line| {
            let row = parse_row(line);
            if row.is_none() {
                dropped += 1;
            }
            row
        })
        .collect();

    debug!("Parsed {} rows ({} malformed lines dropped)", rows.len(), dropped);
    rows
}

fn parse_row(line: &str) -> Option<WorksheetRow> {
    let mut fields = line.split('|').map(str::trim);
    let exercise = fields.next()?;
    let translation = fields.next()?;
    let answer = fields.next()?;
    Some(WorksheetRow {
        exercise: exercise.to_string(),
        translation: translation.to_string(),
        answer: answer.to_string(),
    })
}
