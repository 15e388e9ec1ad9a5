use anyhow::{Context, Result};

use flashsheet_lib::session::SessionStore;

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let store = app.open_store()?;
    let sessions = store.list_sessions().context("Failed to list sessions")?;

    let database = store
        .db_path()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_default();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "database": database,
                "sessions": sessions,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("Database: {}\n", database);
            if sessions.is_empty() {
                println!("No sessions found.");
                return Ok(());
            }

            let max_name_len = sessions.iter().map(|s| s.name.len()).max().unwrap_or(7).max(7);

            println!("{:<width$} Words  Last printed", "Session", width = max_name_len);
            println!(
                "{} {} {}",
                "\u{2500}".repeat(max_name_len),
                "\u{2500}".repeat(6),
                "\u{2500}".repeat(16)
            );

            for session in &sessions {
                let last = session
                    .last_recorded
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<width$} {:>5}  {}",
                    session.name,
                    session.word_count,
                    last,
                    width = max_name_len
                );
            }
        }
    }

    Ok(())
}

pub fn run_words(app: &App, name: &str, format: &OutputFormat) -> Result<()> {
    let store = app.open_store()?;
    let mut words: Vec<String> = store
        .seen_words(name)
        .with_context(|| format!("Failed to read session '{}'", name))?
        .into_iter()
        .collect();
    words.sort();

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "session": name,
                "words": words,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("No words recorded in session '{}'.", name);
                return Ok(());
            }
            for word in &words {
                println!("{}", word);
            }
            println!("\n{} words", words.len());
        }
    }

    Ok(())
}

pub fn run_check(app: &App, name: &str, word: &str, format: &OutputFormat) -> Result<()> {
    let store = app.open_store()?;
    let present = store
        .is_word_in_session(name, word)
        .with_context(|| format!("Failed to query session '{}'", name))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "session": name,
                "word": word,
                "present": present,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if present {
                println!("'{}' is in session '{}'", word, name);
            } else {
                println!("'{}' is not in session '{}'", word, name);
            }
        }
    }

    Ok(())
}
