// System status display: shows phrase store stats, lexicon breakdown, threshold.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::db::PhraseStore;
use crate::lexicon::LexiconSnapshot;
use crate::output::terminal;

/// The database path and file size, or None when no database file exists.
pub fn database_summary(config: &Config) -> Option<String> {
    let metadata = std::fs::metadata(Path::new(&config.db_path)).ok()?;
    Some(format!("{} ({})", config.db_path, format_bytes(metadata.len())))
}

/// What `pyx status` prints before `pyx init` has been run.
pub fn show_uninitialized() {
    println!("Database: not initialized");
    println!("\nRun `pyx init` and `pyx seed` to set up the phrase store.");
}

/// Display system status to the terminal.
pub async fn show(store: &dyn PhraseStore, config: &Config) -> Result<()> {
    match database_summary(config) {
        Some(summary) => println!("Database: {summary}"),
        None => println!("Database: in-memory (built-in phrases)"),
    }

    let phrases = store.load_phrases().await?;
    println!("Stored phrases: {}", phrases.len());

    let unsafe_count = phrases.iter().filter(|p| !p.safe).count();
    println!(
        "  {} unsafe, {} allow-listed",
        unsafe_count,
        phrases.len() - unsafe_count
    );

    let snapshot = LexiconSnapshot::build(1, phrases)?;
    if snapshot.is_empty() {
        println!("  Lexicon is empty; scoring will refuse to start.");
        println!("  Run `pyx seed` to load the built-in phrases");
    } else {
        println!("\nLexicon ({} unique phrases):", snapshot.len());
        terminal::display_category_counts(&snapshot.category_counts());
    }

    terminal::display_recent_phrases(&store.recent_phrases(5).await?);

    let source = if config.ban_line_is_default() {
        "default"
    } else {
        "PYX_BAN_LINE"
    };
    println!("\nBan line: {:.2} ({})", config.ban_line.value(), source);
    println!("Session capacity: {}", config.session_capacity);

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_database_summary_missing_file() {
        let config = Config {
            db_path: "./definitely-not-here/pyx.db".to_string(),
            ..Config::default()
        };
        assert_eq!(database_summary(&config), None);
    }

    #[test]
    fn test_database_summary_existing_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let config = Config {
            db_path: path.to_string(),
            ..Config::default()
        };
        let summary = database_summary(&config).unwrap();
        assert!(summary.starts_with(path), "Got {summary}");
        assert!(summary.ends_with("B)"), "Got {summary}");
    }
}
