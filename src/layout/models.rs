//! Data models for page layout

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Invalid grid shape {rows}x{cols}: rows and columns must be positive")]
    InvalidShape { rows: usize, cols: usize },
}

/// One vocabulary entry: the term on the front face, its translation on the back
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WordPair {
    pub front: String,
    pub back: String,
}

impl WordPair {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Padding pairs have no text on either face
    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }
}

/// Rows x columns of flashcard cells on one sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::InvalidShape { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of cells on one face
    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    /// (row, col) of a row-major cell index
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self { rows: 3, cols: 3 }
    }
}

/// Both faces of one printed sheet.
///
/// `front_cells[i]` and `back_cells[i]` are the texts drawn at physical
/// cell `i` (row-major) of the front and back page respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub front_cells: Vec<String>,
    pub back_cells: Vec<String>,
    /// Real (non-padding) pairs placed on this page
    pub entries: usize,
}

impl Page {
    /// Non-empty front texts in cell order
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.front_cells
            .iter()
            .map(String::as_str)
            .filter(|w| !w.is_empty())
    }

    pub fn is_complete(&self) -> bool {
        self.entries == self.front_cells.len()
    }
}
