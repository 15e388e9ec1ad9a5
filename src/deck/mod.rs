//! Deck pagination and building
//!
//! This module provides:
//! - `DeckPaginator`: session filtering, page counting and recording
//! - `DeckBuilder`: sheet selection, per-sheet or merged grouping, rendering
//! - `DeckError`: the error taxonomy surfaced to callers

pub mod builder;
pub mod errors;
pub mod paginator;

pub use builder::{BuildOptions, BuildReport, DeckBuilder, DeckReport, GroupingMode};
pub use errors::DeckError;
pub use paginator::{DeckPaginator, Paginate};
