use std::io::Read;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use coverkit::config::Config;
use coverkit::session::{Operation, Session};
use coverkit::storage::{export_text, JsonFileStorage};

fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting coverkit v{}", env!("CARGO_PKG_VERSION"));

    let storage = JsonFileStorage::new(&config.state_path);
    let mut session = Session::open(Box::new(storage), config.history_limit)
        .with_context(|| format!("failed to load state from {}", config.state_path.display()))?;
    info!(
        "Loaded {} paragraphs from {}",
        session.state().paragraphs.len(),
        config.state_path.display()
    );

    let posting = read_posting(&config)?;
    if posting.trim().is_empty() {
        info!("No posting text supplied, reusing the saved posting");
    } else {
        session.execute(Operation::SetPostingText { text: posting })?;
    }

    let analysis = session.analyze();
    let letter = session.cover_letter();

    let posting_path = export_text(&config.output_dir, "posting.html", &analysis.html)?;
    let letter_path = export_text(&config.output_dir, "cover_letter.html", &letter)?;
    session.save().context("failed to save state")?;

    info!(
        "Wrote {} and {}",
        posting_path.display(),
        letter_path.display()
    );
    Ok(())
}

/// Posting text from `COVERKIT_POSTING_PATH`, or stdin when unset.
fn read_posting(config: &Config) -> Result<String> {
    match &config.posting_path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read posting from {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read posting from stdin")?;
            Ok(text)
        }
    }
}
