//! Single-sheet CSV vocabulary files

use std::path::PathBuf;

use super::{rows_to_pairs, Result, SourceError, WordSource};
use crate::layout::WordPair;

/// A CSV file read as one sheet named after the file stem
pub struct CsvSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn sheet_name(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Sheet1".to_string())
    }
}

impl WordSource for CsvSource {
    fn sheet_names(&self) -> Vec<String> {
        vec![self.sheet_name()]
    }

    fn read_sheet(&mut self, index: usize) -> Result<Vec<WordPair>> {
        if index != 0 {
            return Err(SourceError::SheetIndexOutOfRange { index, count: 1 });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_path(&self.path)?;

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            let front = record.get(0).unwrap_or_default();
            let back = record.get(1);

            // The header may be a lone title; past it a lone value is a
            // malformed card and a blank line is just skipped
            match back {
                Some(back) => rows.push((front.to_string(), back.to_string())),
                None if row_idx == 0 => rows.push((front.to_string(), String::new())),
                None if front.trim().is_empty() => {}
                None => {
                    return Err(SourceError::MalformedRow {
                        sheet: self.sheet_name(),
                        row: row_idx + 1,
                    })
                }
            }
        }

        Ok(rows_to_pairs(rows))
    }
}
