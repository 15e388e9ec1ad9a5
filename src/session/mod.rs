//! Session tracking for incremental deck generation
//!
//! This module provides:
//! - The `SessionStore` contract used by the paginator
//! - A SQLite implementation persisted across runs

pub mod models;
pub mod storage;

pub use models::*;
pub use storage::{SessionStore, SessionStoreError, SqliteSessionStore};
