//! Page rendering
//!
//! A renderer receives decks one at a time: `begin_deck`, any number of
//! `render_page` calls, then `finish_deck`. Each `Page` becomes a front face
//! followed by its back face.

pub mod models;
pub mod pdf;

use std::path::PathBuf;

use thiserror::Error;

use crate::layout::Page;

pub use models::{Orientation, PageFormat, RenderOptions};
pub use pdf::{deck_output_path, PdfRenderer};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No deck in progress")]
    NoDeck,
}

pub type Result<T> = std::result::Result<T, RenderError>;

pub trait Renderer {
    /// Start a new document. `name` is the sheet name in per-sheet mode.
    fn begin_deck(&mut self, name: Option<&str>) -> Result<()>;

    fn render_page(&mut self, page: &Page) -> Result<()>;

    /// Close the current document, returning where it was written (if anywhere)
    fn finish_deck(&mut self) -> Result<Option<PathBuf>>;
}
