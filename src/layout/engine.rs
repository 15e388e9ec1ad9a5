//! Grid layout of one sheet
//!
//! The front face is filled row-major. The back face is mirrored within each
//! row so that, once the sheet is printed duplex and flipped along its
//! vertical axis, every translation lands behind its term.

use super::models::{GridShape, Page, WordPair};

/// Index of the pair whose back text is drawn at physical back cell `index`.
///
/// Reverses the column within the row. Applying it twice gives `index` back.
pub fn mirror_position(index: usize, cols: usize) -> usize {
    let row = index / cols;
    let col = index % cols;
    row * cols + (cols - 1 - col)
}

/// Placeholder for an unfilled cell, naming its 1-based grid position
pub fn placeholder(row: usize, col: usize) -> String {
    format!("a_{}{}", row + 1, col + 1)
}

/// Lay out one page from at most `shape.capacity()` pairs.
///
/// Cells without a pair get `fill`; with no fill they get a coordinate
/// placeholder, which is what template pages use.
pub fn layout_page(pairs: &[WordPair], shape: GridShape, fill: Option<&str>) -> Page {
    let capacity = shape.capacity();
    let pairs = &pairs[..pairs.len().min(capacity)];

    let missing = |index: usize| -> String {
        match fill {
            Some(text) => text.to_string(),
            None => {
                let (row, col) = shape.position(index);
                placeholder(row, col)
            }
        }
    };

    let front_cells = (0..capacity)
        .map(|i| match pairs.get(i) {
            Some(pair) => pair.front.clone(),
            None => missing(i),
        })
        .collect();

    let back_cells = (0..capacity)
        .map(|i| match pairs.get(mirror_position(i, shape.cols())) {
            Some(pair) => pair.back.clone(),
            None => missing(i),
        })
        .collect();

    Page {
        front_cells,
        back_cells,
        entries: pairs.iter().filter(|p| !p.is_empty()).count(),
    }
}
