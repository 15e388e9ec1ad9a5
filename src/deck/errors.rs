use thiserror::Error;

use crate::layout::LayoutError;
use crate::render::RenderError;
use crate::session::SessionStoreError;
use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Source read failure: {0}")]
    Source(#[from] SourceError),

    #[error("Session store failure: {0}")]
    Session(#[from] SessionStoreError),

    #[error("Render failure: {0}")]
    Render(#[from] RenderError),
}

impl From<LayoutError> for DeckError {
    fn from(err: LayoutError) -> Self {
        Self::InvalidConfiguration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
