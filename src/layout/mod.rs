//! Flashcard grid layout
//!
//! This module provides:
//! - Word pair, grid shape and page models
//! - The pure page layout with per-row back-face mirroring

pub mod engine;
pub mod models;

pub use engine::{layout_page, mirror_position, placeholder};
pub use models::*;
