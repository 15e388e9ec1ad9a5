use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use flashsheet_lib::config::{FlashsheetConfig, GridConfig};
use flashsheet_lib::layout::GridShape;
use flashsheet_lib::session::SqliteSessionStore;

/// Shared application state for CLI commands
pub struct App {
    pub config: FlashsheetConfig,
    db_override: Option<PathBuf>,
}

impl App {
    pub fn new(config_path: Option<&Path>, db: Option<PathBuf>) -> Result<Self> {
        let config = FlashsheetConfig::load(config_path).context("Failed to load config")?;
        Ok(Self {
            config,
            db_override: db,
        })
    }

    /// Grid shape from flags, falling back to the config file
    pub fn grid_shape(&self, rows: Option<usize>, cols: Option<usize>) -> Result<GridShape> {
        let grid = GridConfig {
            rows: rows.unwrap_or(self.config.grid.rows),
            cols: cols.unwrap_or(self.config.grid.cols),
        };
        grid.shape().context("Invalid grid shape")
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = self.db_override.as_ref().or(self.config.session.database.as_ref()) {
            return Ok(path.clone());
        }
        SqliteSessionStore::default_db_path().context("Failed to get data directory")
    }

    pub fn open_store(&self) -> Result<SqliteSessionStore> {
        let path = self.db_path()?;
        SqliteSessionStore::open(path.clone())
            .with_context(|| format!("Failed to open session database {}", path.display()))
    }
}
