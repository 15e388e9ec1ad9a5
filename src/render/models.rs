//! Presentation settings for rendered sheets

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Physical paper size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PageFormat {
    #[default]
    A4,
    Letter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl PageFormat {
    /// (width, height) in millimetres
    pub fn dimensions(&self, orientation: Orientation) -> (f32, f32) {
        let (short, long) = match self {
            Self::A4 => (210.0, 297.0),
            Self::Letter => (215.9, 279.4),
        };
        match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RenderOptions {
    pub page_format: PageFormat,
    pub orientation: Orientation,
    pub margin_mm: f32,
    /// Font size in points; long words are shrunk to fit their cell
    pub font_size: f32,
    /// Solid border around every cell
    pub border: bool,
    /// Dashed cut lines across the whole sheet between rows and columns
    pub dashed_guides: bool,
    /// TrueType font for text outside the built-in Helvetica encoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            page_format: PageFormat::A4,
            orientation: Orientation::Landscape,
            margin_mm: 10.0,
            font_size: 16.0,
            border: true,
            dashed_guides: false,
            font_path: None,
        }
    }
}
