//! Vocabulary sources
//!
//! A source exposes one or more sheets; each sheet is a table whose first
//! two columns are the front and back text of a card and whose first row is
//! a header.

pub mod csv;
pub mod sheets_api;
pub mod workbook;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::layout::WordPair;

pub use self::csv::CsvSource;
pub use self::workbook::WorkbookSource;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open workbook {path:?}: {message}")]
    Open { path: PathBuf, message: String },

    #[error("Failed to read sheet '{sheet}': {message}")]
    Sheet { sheet: String, message: String },

    #[error("Sheet index {index} out of range ({count} sheets)")]
    SheetIndexOutOfRange { index: usize, count: usize },

    #[error("Sheet '{sheet}' has fewer than two columns")]
    MissingColumns { sheet: String },

    #[error("Malformed row {row} in sheet '{sheet}'")]
    MalformedRow { sheet: String, row: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Ordered word pairs, sheet by sheet
pub trait WordSource {
    fn sheet_names(&self) -> Vec<String>;

    /// Pairs of one sheet in row order, header row removed
    fn read_sheet(&mut self, index: usize) -> Result<Vec<WordPair>>;
}

/// Open a source by file extension: `.csv` as a single sheet split on
/// `csv_delimiter`, anything else as a spreadsheet workbook.
pub fn open_source(path: &Path, csv_delimiter: u8) -> Result<Box<dyn WordSource>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        Ok(Box::new(CsvSource::new(path.to_path_buf()).with_delimiter(csv_delimiter)))
    } else {
        Ok(Box::new(WorkbookSource::open(path)?))
    }
}

/// Turn raw table rows into word pairs.
///
/// Drops the header row, trims cells and skips rows with no front text.
pub(crate) fn rows_to_pairs<I>(rows: I) -> Vec<WordPair>
where
    I: IntoIterator<Item = (String, String)>,
{
    rows.into_iter()
        .skip(1)
        .map(|(front, back)| WordPair::new(front.trim(), back.trim()))
        .filter(|pair| !pair.front.is_empty())
        .collect()
}
