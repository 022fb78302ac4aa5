use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use pyx::config::Config;
use pyx::db::{PhraseSource, PhraseStore};
use pyx::lexicon::LexiconEntry;
use pyx::Moderator;

/// Pyx: score chat text for severity, decide whether to block it, and censor it.
#[derive(Parser)]
#[command(name = "pyx", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the phrase database
    Init,

    /// Load the built-in phrase list (or a JSON file of phrases) into the store
    Seed {
        /// JSON array of {"text", "safe", "category"} objects to import instead
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Add or override a phrase label
    Label {
        /// The phrase to label
        text: String,

        /// Mark the phrase as disallowed (default: allow-listed)
        #[arg(long = "unsafe")]
        is_unsafe: bool,

        /// Category used to weight unsafe matches
        #[arg(long, default_value = "phrases")]
        category: String,
    },

    /// Score a piece of text
    Score {
        /// The text to score
        text: String,

        /// Print the {"score", "bad", "censored"} response instead of a report
        #[arg(long)]
        json: bool,
    },

    /// Interactive session: score each line with and without conversation context
    Chat {
        /// Session id the lines belong to
        #[arg(long, default_value = "cli")]
        session: String,
    },

    /// Show system status (phrase counts, categories, threshold)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pyx=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Init => {
            info!("Initializing Pyx phrase database...");
            let table_count = init_database(&config).await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: load the built-in phrases");
            println!("  pyx seed");
        }

        Commands::Seed { file } => {
            let store = open_store(&config).await?;

            let (entries, source) = match &file {
                Some(path) => (read_phrase_file(path)?, PhraseSource::Import),
                None => (pyx::lexicon::builtin::phrases(), PhraseSource::Builtin),
            };

            println!("Writing {} phrases ({})...", entries.len(), source);
            let written = seed_with_progress(store.as_ref(), &entries, source).await?;

            println!("\n{}", "Seed complete.".bold());
            println!("  Phrases written: {written}");
            if written < entries.len() {
                println!(
                    "  {} Skipped {} phrases with no word characters",
                    "Warning:".yellow(),
                    entries.len() - written
                );
            }
        }

        Commands::Label {
            text,
            is_unsafe,
            category,
        } => {
            let store = open_store(&config).await?;
            let moderator = load_moderator(store.as_ref(), &config).await?;

            let entry = LexiconEntry::new(text, !is_unsafe, category);
            let before = moderator.score(&entry.text);
            let version = moderator.learn(entry.clone(), store.as_ref()).await?;
            let after = moderator.score(&entry.text);

            let label = if entry.safe { "safe".green() } else { "unsafe".red() };
            println!("Labeled {:?} as {} ({})", entry.text, label, entry.category);
            println!("  Lexicon version: {version}");
            println!("  Score for the phrase itself: {before:.4} -> {after:.4}");
        }

        Commands::Score { text, json } => {
            let store = open_store(&config).await?;
            let moderator = load_moderator(store.as_ref(), &config).await?;

            let body = serde_json::json!({ "text": text });
            let text = match pyx::request::validate(&body, config.max_text_chars) {
                Ok(text) => text,
                Err(e) => anyhow::bail!("{e} (status {})", e.status_code()),
            };

            let verdict = moderator.evaluate(text);
            if json {
                println!("{}", serde_json::to_string(&verdict)?);
            } else {
                let breakdown = moderator.explain(text);
                pyx::output::terminal::display_verdict(text, &verdict, &breakdown);
            }
        }

        Commands::Chat { session } => {
            let store = open_store(&config).await?;
            let moderator = load_moderator(store.as_ref(), &config).await?;
            run_chat(&moderator, store.as_ref(), &session, &config).await?;
        }

        Commands::Status => {
            if cfg!(feature = "sqlite") && pyx::status::database_summary(&config).is_none() {
                pyx::status::show_uninitialized();
                return Ok(());
            }
            let store = open_store(&config).await?;
            pyx::status::show(store.as_ref(), &config).await?;
        }
    }

    Ok(())
}

/// Read lines from stdin and print regular vs context-aware scores for each.
///
/// `/reload` rebuilds the lexicon from the store, `/history` prints the
/// session's remembered messages, `/quit` exits.
async fn run_chat(
    moderator: &Moderator,
    store: &dyn PhraseStore,
    session: &str,
    config: &Config,
) -> Result<()> {
    println!(
        "Chatting as session {:?}. Type a message, /history, /reload, or /quit.",
        session
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/history" => {
                let history = moderator.sessions().history(session).unwrap_or_default();
                for (i, message) in history.iter().enumerate() {
                    println!("  {:>2}. {}", i + 1, message.dimmed());
                }
                continue;
            }
            "/reload" => {
                match moderator.reload_from(store).await {
                    Ok(version) => println!("  Lexicon reloaded (version {version})"),
                    Err(e) => {
                        let e = anyhow::Error::from(e);
                        warn!(error = %format!("{e:#}"), "Reload failed, keeping current lexicon");
                        println!("  {} {e:#}", "Reload failed:".yellow());
                    }
                }
                continue;
            }
            _ => {}
        }

        if line.chars().count() > config.max_text_chars {
            println!("  {} Text too long", "Rejected:".yellow());
            continue;
        }

        let regular = moderator.score(line);
        let verdict = moderator.evaluate_with_context(session, line);
        pyx::output::terminal::display_comparison(
            regular,
            verdict.score,
            moderator.threshold().value(),
        );
        if verdict.bad {
            println!("  Censored: {}", verdict.censored);
        }
    }

    Ok(())
}

/// Build the moderator from the phrase store. Refuses to start on an
/// unreadable or empty store.
async fn load_moderator(store: &dyn PhraseStore, config: &Config) -> Result<Moderator> {
    let moderator = Moderator::from_store(store, config.ban_line, config.session_capacity)
        .await
        .context("Cannot start without a lexicon")?;
    Ok(moderator)
}

/// Write phrases to the store in chunks, with a progress bar.
async fn seed_with_progress(
    store: &dyn PhraseStore,
    entries: &[LexiconEntry],
    source: PhraseSource,
) -> Result<usize> {
    const CHUNK: usize = 100;

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Phrases [{bar:30}] {pos}/{len}")?,
    );

    let mut written = 0;
    for chunk in entries.chunks(CHUNK) {
        written += store.seed(chunk, source).await?;
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    Ok(written)
}

/// Parse a JSON array of phrase records.
fn read_phrase_file(path: &Path) -> Result<Vec<LexiconEntry>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read phrase file {}", path.display()))?;
    let entries: Vec<LexiconEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of phrases", path.display()))?;
    Ok(entries)
}

/// Initialize the database (create if needed). Returns the table count.
#[cfg(feature = "sqlite")]
async fn init_database(config: &Config) -> Result<i64> {
    let conn = pyx::db::initialize(&config.db_path)?;
    let db = pyx::db::sqlite::SqliteDatabase::new(conn);
    db.table_count().await
}

#[cfg(not(feature = "sqlite"))]
async fn init_database(_config: &Config) -> Result<i64> {
    anyhow::bail!(
        "The 'sqlite' feature is not compiled in.\n\
         Rebuild with: cargo build --features sqlite"
    );
}

/// Open the phrase store for an existing database.
#[cfg(feature = "sqlite")]
async fn open_store(config: &Config) -> Result<Arc<dyn PhraseStore>> {
    let conn = pyx::db::open(&config.db_path)?;
    Ok(Arc::new(pyx::db::sqlite::SqliteDatabase::new(conn)))
}

/// Without SQLite, fall back to an in-memory store holding the built-in phrases.
#[cfg(not(feature = "sqlite"))]
async fn open_store(_config: &Config) -> Result<Arc<dyn PhraseStore>> {
    warn!("SQLite support not compiled in; using built-in phrases only");
    let store = pyx::db::MemoryPhraseStore::new();
    store
        .seed(&pyx::lexicon::builtin::phrases(), PhraseSource::Builtin)
        .await?;
    Ok(Arc::new(store))
}
