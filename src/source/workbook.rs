//! Spreadsheet workbooks (xlsx, xls, xlsb, ods) via calamine

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use super::{rows_to_pairs, Result, SourceError, WordSource};
use crate::layout::WordPair;

pub struct WorkbookSource {
    workbook: Sheets<BufReader<File>>,
    sheet_names: Vec<String>,
}

impl WorkbookSource {
    pub fn open(path: &Path) -> Result<Self> {
        let workbook = open_workbook_auto(path).map_err(|e| SourceError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let sheet_names = workbook.sheet_names().to_vec();
        log::debug!("Opened {:?} with {} sheets", path, sheet_names.len());

        Ok(Self {
            workbook,
            sheet_names,
        })
    }
}

impl WordSource for WorkbookSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheet_names.clone()
    }

    fn read_sheet(&mut self, index: usize) -> Result<Vec<WordPair>> {
        let name = self
            .sheet_names
            .get(index)
            .cloned()
            .ok_or(SourceError::SheetIndexOutOfRange {
                index,
                count: self.sheet_names.len(),
            })?;

        let range = self
            .workbook
            .worksheet_range(&name)
            .map_err(|e| SourceError::Sheet {
                sheet: name.clone(),
                message: e.to_string(),
            })?;

        let (height, width) = range.get_size();
        if height == 0 {
            return Ok(Vec::new());
        }
        if width < 2 {
            return Err(SourceError::MissingColumns { sheet: name });
        }

        let rows = range
            .rows()
            .map(|row| (cell_text(&row[0]), cell_text(&row[1])));
        Ok(rows_to_pairs(rows))
    }
}

/// Display text of a cell; integral floats lose their decimals
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        other => other.to_string(),
    }
}
