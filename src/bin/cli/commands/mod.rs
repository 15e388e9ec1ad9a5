pub mod build;
pub mod fetch;
pub mod session;
pub mod template;

use std::path::PathBuf;

use clap::Args;

use flashsheet_lib::render::{Orientation, RenderOptions};

/// Presentation flags shared by `build` and `template`
#[derive(Args, Debug, Clone)]
pub struct RenderFlags {
    /// Draw dashed cut guides between rows and columns
    #[arg(long)]
    pub dashed: bool,

    /// Omit the solid border around each cell
    #[arg(long)]
    pub no_border: bool,

    /// TrueType font file for the card text
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Font size in points
    #[arg(long)]
    pub font_size: Option<f32>,

    /// Portrait instead of landscape pages
    #[arg(long)]
    pub portrait: bool,
}

impl RenderFlags {
    pub fn apply(&self, mut options: RenderOptions) -> RenderOptions {
        if self.dashed {
            options.dashed_guides = true;
        }
        if self.no_border {
            options.border = false;
        }
        if let Some(font) = &self.font {
            options.font_path = Some(font.clone());
        }
        if let Some(size) = self.font_size {
            options.font_size = size;
        }
        if self.portrait {
            options.orientation = Orientation::Portrait;
        }
        options
    }
}
