//! Document rendering: [`WorksheetDocument`] → `.docx` on disk.
//!
//! ## Why spawn_blocking?
//!
//! `docx-rs` builds the whole document in memory and zips it with blocking
//! `std::io` writes. [`render_artifact`] moves that onto Tokio's blocking
//! pool so the orchestrator's worker thread never stalls on disk I/O.
//!
//! ## Artifact naming
//!
//! Every worksheet lands in the shared artifact directory under a random
//! `worksheet_<random>.docx` name created atomically by `tempfile`, so
//! concurrent requests never collide and the janitor can recognise its files.

use crate::error::WorksheetError;
use crate::pipeline::table::WorksheetRow;
use docx_rs::{Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableRow};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column headers of the worksheet table (exercise, translation, answer).
pub const WORKSHEET_HEADERS: [&str; 3] = ["Exercise", "Korean Translation", "Answer"];

/// File-name prefix of every rendered artifact.
pub const ARTIFACT_PREFIX: &str = "worksheet_";

/// File-name suffix of every rendered artifact.
pub const ARTIFACT_SUFFIX: &str = ".docx";

/// Paragraph style id of the worksheet heading.
const TITLE_STYLE: &str = "Title";

/// Column widths in twentieths of a point (≈ 7.5 / 6 / 2.5 cm on A4).
const COLUMN_WIDTHS: [usize; 3] = [4200, 3400, 1400];

/// The in-memory worksheet: a title and the parsed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorksheetDocument {
    pub title: String,
    pub rows: Vec<WorksheetRow>,
}

impl WorksheetDocument {
    pub fn new(title: impl Into<String>, rows: Vec<WorksheetRow>) -> Self {
        Self {
            title: title.into(),
            rows,
        }
    }

    /// The table as plain cells: header row first, then one row per entry.
    pub fn table_cells(&self) -> Vec<[&str; 3]> {
        std::iter::once(WORKSHEET_HEADERS)
            .chain(self.rows.iter().map(WorksheetRow::cells))
            .collect()
    }
}

/// Create a fresh, uniquely named artifact file in `dir`.
///
/// The directory is created if missing. The returned file exists (empty) and
/// is not deleted on drop; the janitor owns its removal.
pub fn new_artifact_path(dir: &Path) -> Result<PathBuf, WorksheetError> {
    std::fs::create_dir_all(dir).map_err(|e| WorksheetError::RenderFailure {
        path: dir.to_path_buf(),
        reason: format!("cannot create artifact directory: {e}"),
    })?;

    let file = tempfile::Builder::new()
        .prefix(ARTIFACT_PREFIX)
        .suffix(ARTIFACT_SUFFIX)
        .rand_bytes(12)
        .tempfile_in(dir)
        .map_err(|e| WorksheetError::RenderFailure {
            path: dir.to_path_buf(),
            reason: format!("cannot create artifact file: {e}"),
        })?;

    file.into_temp_path()
        .keep()
        .map_err(|e| WorksheetError::RenderFailure {
            path: dir.to_path_buf(),
            reason: format!("cannot keep artifact file: {e}"),
        })
}

/// Render `doc` to `destination`, overwriting any existing file.
///
/// Blocking; see [`render_artifact`] for the async wrapper.
pub fn render_worksheet(
    doc: &WorksheetDocument,
    destination: &Path,
) -> Result<PathBuf, WorksheetError> {
    let fail = |reason: String| WorksheetError::RenderFailure {
        path: destination.to_path_buf(),
        reason,
    };

    let file = File::create(destination).map_err(|e| fail(e.to_string()))?;

    build_docx(doc)
        .build()
        .pack(file)
        .map_err(|e| fail(e.to_string()))?;

    info!(
        "Rendered worksheet with {} rows → {}",
        doc.rows.len(),
        destination.display()
    );
    Ok(destination.to_path_buf())
}

/// Render `doc` into a new artifact in `dir`, on the blocking pool.
///
/// The document is moved into the task; the returned path is the artifact.
pub async fn render_artifact(
    doc: WorksheetDocument,
    dir: PathBuf,
) -> Result<PathBuf, WorksheetError> {
    tokio::task::spawn_blocking(move || {
        let destination = new_artifact_path(&dir)?;
        render_worksheet(&doc, &destination)
    })
    .await
    .map_err(|e| WorksheetError::Unexpected(format!("Render task panicked: {e}")))?
}

fn build_docx(doc: &WorksheetDocument) -> Docx {
    let title_style = Style::new(TITLE_STYLE, StyleType::Paragraph)
        .name(TITLE_STYLE)
        .size(56)
        .bold();
    let title = Paragraph::new()
        .style(TITLE_STYLE)
        .add_run(Run::new().add_text(&doc.title));

    let rows: Vec<TableRow> = doc
        .table_cells()
        .iter()
        .enumerate()
        .map(|(i, cells)| table_row(cells, i == 0))
        .collect();
    debug!("Building table: {} rows × {} columns", rows.len(), WORKSHEET_HEADERS.len());

    let table = Table::new(rows).set_grid(COLUMN_WIDTHS.to_vec());

    Docx::new()
        .add_style(title_style)
        .add_paragraph(title)
        .add_table(table)
}

fn table_row(cells: &[&str; 3], is_header: bool) -> TableRow {
    TableRow::new(
        cells
            .iter()
            .map(|text| {
                let run = Run::new().add_text(*text);
                let run = if is_header { run.bold() } else { run };
                TableCell::new().add_paragraph(Paragraph::new().add_run(run))
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{
        read_docx, DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild,
        TableRowChild,
    };
    use tempfile::TempDir;

    fn row(exercise: &str, translation: &str, answer: &str) -> WorksheetRow {
        WorksheetRow {
            exercise: exercise.into(),
            translation: translation.into(),
            answer: answer.into(),
        }
    }

    fn sample() -> WorksheetDocument {
        WorksheetDocument::new(
            "YouTube Learning Worksheet",
            vec![
                row("It is ___ to meet you.", "당신을 만나서 반갑습니다.", "nice"),
                row("See you ___.", "나중에 봐요.", "later"),
            ],
        )
    }

    /// Read the first table of a `.docx` back as rows of cell text.
    #[allow(irrefutable_let_patterns)]
    fn read_table(path: &Path) -> Vec<Vec<String>> {
        let bytes = std::fs::read(path).expect("artifact readable");
        let docx = read_docx(&bytes).expect("valid docx");
        let table = docx
            .document
            .children
            .iter()
            .find_map(|child| match child {
                DocumentChild::Table(t) => Some(t),
                _ => None,
            })
            .expect("document has a table");

        let mut rows = Vec::new();
        for child in &table.rows {
            if let TableChild::TableRow(r) = child {
                let mut cells = Vec::new();
                for cell in &r.cells {
                    if let TableRowChild::TableCell(c) = cell {
                        cells.push(cell_text(&c.children));
                    }
                }
                rows.push(cells);
            }
        }
        rows
    }

    fn cell_text(children: &[TableCellContent]) -> String {
        let mut text = String::new();
        for content in children {
            if let TableCellContent::Paragraph(p) = content {
                for pc in &p.children {
                    if let ParagraphChild::Run(run) = pc {
                        for rc in &run.children {
                            if let RunChild::Text(t) = rc {
                                text.push_str(&t.text);
                            }
                        }
                    }
                }
            }
        }
        text
    }

    #[test]
    fn table_cells_start_with_header() {
        let doc = sample();
        let cells = doc.table_cells();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], WORKSHEET_HEADERS);
        assert_eq!(cells[2], ["See you ___.", "나중에 봐요.", "later"]);
    }

    #[test]
    fn render_round_trip() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.docx");
        let doc = sample();

        let path = render_worksheet(&doc, &dest).unwrap();
        assert_eq!(path, dest);

        let table = read_table(&path);
        assert_eq!(table.len(), doc.rows.len() + 1);
        assert_eq!(table[0], WORKSHEET_HEADERS.map(String::from).to_vec());
        for (read, row) in table[1..].iter().zip(&doc.rows) {
            assert_eq!(read, &row.cells().map(String::from).to_vec());
        }
    }

    #[test]
    fn title_uses_the_title_style() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.docx");
        render_worksheet(&sample(), &dest).unwrap();

        let docx = read_docx(&std::fs::read(&dest).unwrap()).unwrap();
        assert!(docx.styles.styles.iter().any(|s| s.style_id == TITLE_STYLE));
        let style = docx
            .document
            .children
            .iter()
            .find_map(|child| match child {
                DocumentChild::Paragraph(p) => p.property.style.as_ref().map(|s| s.val.clone()),
                _ => None,
            });
        assert_eq!(style.as_deref(), Some(TITLE_STYLE));
    }

    #[test]
    fn empty_rows_render_header_only() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("empty.docx");
        render_worksheet(&WorksheetDocument::new("t", vec![]), &dest).unwrap();
        assert_eq!(read_table(&dest).len(), 1);
    }

    #[test]
    fn render_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.docx");
        std::fs::write(&dest, b"stale").unwrap();
        render_worksheet(&sample(), &dest).unwrap();
        let bytes = std::fs::read(&dest).unwrap();
        assert_eq!(&bytes[..2], b"PK", "docx is a zip archive");
    }

    #[test]
    fn unwritable_destination_is_render_failure() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing-subdir").join("out.docx");
        let err = render_worksheet(&sample(), &dest).unwrap_err();
        assert_eq!(err.kind(), crate::error::FailureKind::RenderFailure);
    }

    #[test]
    fn artifact_paths_are_unique_and_recognisable() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("artifacts");
        let a = new_artifact_path(&nested).unwrap();
        let b = new_artifact_path(&nested).unwrap();
        assert_ne!(a, b);
        for p in [&a, &b] {
            let name = p.file_name().unwrap().to_str().unwrap();
            assert!(name.starts_with(ARTIFACT_PREFIX), "name: {name}");
            assert!(name.ends_with(ARTIFACT_SUFFIX), "name: {name}");
            assert!(p.exists());
        }
    }

    #[test]
    fn render_artifact_creates_named_file() {
        let dir = TempDir::new().unwrap();
        let path =
            tokio_test::block_on(render_artifact(sample(), dir.path().to_path_buf())).unwrap();
        assert_eq!(path.parent(), Some(dir.path()));
        assert!(path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with(ARTIFACT_PREFIX));
        assert_eq!(read_table(&path).len(), 3);
    }
}
