use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use flashsheet_lib::layout::layout_page;
use flashsheet_lib::render::{PdfRenderer, Renderer};

use super::RenderFlags;
use crate::app::App;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Rows per page
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Columns per page
    #[arg(short, long)]
    pub cols: Option<usize>,

    /// Output PDF
    #[arg(short, long, default_value = "template.pdf")]
    pub output: PathBuf,

    #[command(flatten)]
    pub render: RenderFlags,
}

pub fn run(app: &App, args: &TemplateArgs, format: &OutputFormat) -> Result<()> {
    let shape = app.grid_shape(args.rows, args.cols)?;
    let render_options = args.render.apply(app.config.render.clone());

    // Every cell empty, so each face shows its own coordinates
    let page = layout_page(&[], shape, None);

    let mut renderer = PdfRenderer::new(args.output.clone(), shape, render_options);
    renderer.begin_deck(None)?;
    renderer.render_page(&page)?;
    let written = renderer
        .finish_deck()
        .context("Failed to write template")?
        .context("Template produced no pages")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "rows": shape.rows(),
                "cols": shape.cols(),
                "output": written.to_string_lossy(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "Template {}x{} written to {}",
                shape.rows(),
                shape.cols(),
                written.display()
            );
        }
    }

    Ok(())
}
