mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::build::BuildArgs;
use commands::fetch::FetchArgs;
use commands::template::TemplateArgs;

#[derive(Parser)]
#[command(
    name = "flashsheet",
    about = "Print double-sided vocabulary flashcards from spreadsheets",
    version
)]
struct Cli {
    /// Config file (default: <config dir>/flashsheet/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session database (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Build flashcard PDFs from a workbook or CSV file
    Build(BuildArgs),

    /// Print one page of cell coordinates to check printer alignment
    Template(TemplateArgs),

    /// Inspect study sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Download a Google spreadsheet into an xlsx workbook
    Fetch(FetchArgs),
}

#[derive(Subcommand)]
enum SessionCommand {
    /// List sessions with word counts
    List,

    /// Print the words recorded in a session
    Words {
        /// Session name
        name: String,
    },

    /// Check whether a word was already printed in a session
    Check {
        /// Session name
        name: String,
        /// Front text of the word
        word: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref(), cli.db)?;

    match cli.command {
        Command::Build(args) => {
            commands::build::run(&app, &args, &cli.format)?;
        }
        Command::Template(args) => {
            commands::template::run(&app, &args, &cli.format)?;
        }
        Command::Session(subcmd) => match subcmd {
            SessionCommand::List => {
                commands::session::run_list(&app, &cli.format)?;
            }
            SessionCommand::Words { name } => {
                commands::session::run_words(&app, &name, &cli.format)?;
            }
            SessionCommand::Check { name, word } => {
                commands::session::run_check(&app, &name, &word, &cli.format)?;
            }
        },
        Command::Fetch(args) => {
            commands::fetch::run(&app, &args, &cli.format)?;
        }
    }

    Ok(())
}
