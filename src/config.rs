//! User configuration
//!
//! Read from `config.toml` in the platform config directory, or from an
//! explicit path. Every section is optional; missing keys take defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deck::DeckError;
use crate::layout::GridShape;
use crate::render::RenderOptions;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        let shape = GridShape::default();
        Self {
            rows: shape.rows(),
            cols: shape.cols(),
        }
    }
}

impl GridConfig {
    pub fn shape(&self) -> std::result::Result<GridShape, DeckError> {
        Ok(GridShape::new(self.rows, self.cols)?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session database; defaults to the platform data directory
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Header names removed from fetched spreadsheets
    pub drop_columns: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            drop_columns: vec!["Etiquetas".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlashsheetConfig {
    pub grid: GridConfig,
    pub session: SessionConfig,
    pub render: RenderOptions,
    pub fetch: FetchConfig,
}

impl FlashsheetConfig {
    /// `<config dir>/flashsheet/config.toml`
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("flashsheet").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Load from `path`, or from the default location.
    ///
    /// An explicit path must exist. A missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = match Self::default_path() {
                    Ok(path) => path,
                    Err(_) => return Ok(Self::default()),
                };
                if path.exists() {
                    Self::from_file(&path)
                } else {
                    log::debug!("No config at {:?}, using defaults", path);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::parse(&content).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
