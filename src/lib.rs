//! Vocabulary flashcard sheets.
//!
//! Word pairs are read from a workbook, filtered against a named session,
//! laid out on a grid with a mirrored back face and rendered to PDF.

pub mod config;
pub mod deck;
pub mod layout;
pub mod render;
pub mod session;
pub mod source;

pub use config::FlashsheetConfig;
pub use deck::{BuildOptions, BuildReport, DeckBuilder, DeckError, DeckPaginator, GroupingMode};
pub use layout::{layout_page, mirror_position, GridShape, Page, WordPair};
pub use render::{PdfRenderer, RenderOptions, Renderer};
pub use session::{SessionStore, SessionStoreError, SqliteSessionStore};
pub use source::{CsvSource, SourceError, WordSource, WorkbookSource};
