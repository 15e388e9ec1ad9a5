use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use flashsheet_lib::deck::{BuildOptions, BuildReport, DeckBuilder, GroupingMode};
use flashsheet_lib::render::PdfRenderer;
use flashsheet_lib::source::open_source;

use super::RenderFlags;
use crate::app::App;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Workbook (xlsx, xls, xlsb, ods) or CSV file with front/back columns
    #[arg(short, long)]
    pub file: PathBuf,

    /// Rows per page
    #[arg(short, long)]
    pub rows: Option<usize>,

    /// Columns per page
    #[arg(short, long)]
    pub cols: Option<usize>,

    /// Output PDF; per-sheet decks are written as <stem>_<sheet>.pdf
    #[arg(short, long, default_value = "flashcards.pdf")]
    pub output: PathBuf,

    /// Merge all selected sheets into a single deck
    #[arg(short, long)]
    pub merge: bool,

    /// Skip words already printed in this session and record new ones
    #[arg(short, long)]
    pub session: Option<String>,

    /// Only print full pages; leftover words stay for the next run
    #[arg(long)]
    pub complete_pages: bool,

    /// Comma-separated 0-based sheet indices (default: all sheets)
    #[arg(long, value_delimiter = ',')]
    pub sheets: Vec<usize>,

    /// Field delimiter for CSV input
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    #[command(flatten)]
    pub render: RenderFlags,
}

pub fn run(app: &App, args: &BuildArgs, format: &OutputFormat) -> Result<()> {
    let shape = app.grid_shape(args.rows, args.cols)?;
    let render_options = args.render.apply(app.config.render.clone());

    let Ok(delimiter) = u8::try_from(args.delimiter) else {
        bail!("CSV delimiter must be a single ASCII character, got '{}'", args.delimiter);
    };
    let mut source = open_source(&args.file, delimiter)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;

    let store = match &args.session {
        Some(_) => Some(app.open_store()?),
        None => None,
    };

    let options = BuildOptions {
        shape,
        drop_incomplete: args.complete_pages,
        mode: if args.merge {
            GroupingMode::Merged
        } else {
            GroupingMode::PerSheet
        },
        sheets: if args.sheets.is_empty() {
            None
        } else {
            Some(args.sheets.clone())
        },
        session: args.session.clone(),
    };

    let mut builder = DeckBuilder::new(options);
    if let Some(store) = &store {
        builder = builder.with_store(store);
    }

    let mut renderer = PdfRenderer::new(args.output.clone(), shape, render_options);
    let report = builder
        .build(source.as_mut(), &mut renderer)
        .context("Failed to build flashcards")?;

    print_report(&report, format)
}

fn print_report(report: &BuildReport, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let decks: Vec<serde_json::Value> = report.decks.iter().map(|deck| {
                serde_json::json!({
                    "name": deck.name,
                    "pages": deck.pages,
                    "words": deck.words,
                    "output": deck.output.as_ref().map(|p| p.to_string_lossy().to_string()),
                })
            }).collect();
            let failed: Vec<serde_json::Value> = report.failed_sheets.iter().map(|(sheet, err)| {
                serde_json::json!({
                    "sheet": sheet,
                    "error": err.to_string(),
                })
            }).collect();
            let output = serde_json::json!({
                "decks": decks,
                "failedSheets": failed,
                "totalPages": report.total_pages(),
                "totalWords": report.total_words(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for deck in &report.decks {
                let name = deck.name.as_deref().unwrap_or("(merged)");
                match &deck.output {
                    Some(path) => println!(
                        "{}: {} words on {} pages -> {}",
                        name,
                        deck.words,
                        deck.pages,
                        path.display()
                    ),
                    None => println!("{}: nothing new to print", name),
                }
            }
            for (sheet, err) in &report.failed_sheets {
                eprintln!("Skipped sheet {}: {}", sheet, err);
            }
            println!(
                "\n{} words on {} pages total",
                report.total_words(),
                report.total_pages()
            );
        }
    }

    Ok(())
}
