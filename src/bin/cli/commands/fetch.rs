use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use flashsheet_lib::source::sheets_api::{split_by_article, write_workbook, SheetsApiClient};

use crate::app::App;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// File holding the Google API key
    #[arg(short, long)]
    pub key: PathBuf,

    /// Spreadsheet ID (from its URL)
    #[arg(long)]
    pub spreadsheet: String,

    /// A1 range to read
    #[arg(long, default_value = "A1:AA1000")]
    pub range: String,

    /// Split rows into Maskulin/Femenin/Neutrum/Other sheets by article
    #[arg(short, long)]
    pub group: bool,

    /// Column to drop by header name (repeatable; replaces the config list)
    #[arg(long = "drop-column")]
    pub drop_columns: Vec<String>,

    /// Output workbook
    #[arg(short, long, default_value = "vocabulary.xlsx")]
    pub output: PathBuf,
}

pub fn run(app: &App, args: &FetchArgs, format: &OutputFormat) -> Result<()> {
    let api_key = fs::read_to_string(&args.key)
        .with_context(|| format!("Failed to read API key from {}", args.key.display()))?;
    if api_key.trim().is_empty() {
        bail!("API key file {} is empty", args.key.display());
    }

    let client = SheetsApiClient::new(api_key);
    let mut table = client
        .fetch_table(&args.spreadsheet, &args.range)
        .context("Failed to fetch spreadsheet")?;

    let drop_columns = if args.drop_columns.is_empty() {
        &app.config.fetch.drop_columns
    } else {
        &args.drop_columns
    };
    table.drop_columns(drop_columns);

    let sheets = if args.group {
        split_by_article(&table)
    } else {
        vec![("All".to_string(), table)]
    };

    write_workbook(&sheets, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = sheets.iter().map(|(name, table)| {
                serde_json::json!({
                    "sheet": name,
                    "rows": table.rows.len(),
                })
            }).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            for (name, table) in &sheets {
                println!("{}: {} rows", name, table.rows.len());
            }
            println!("Saved to {}", args.output.display());
        }
    }

    Ok(())
}
