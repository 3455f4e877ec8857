use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub state_path: PathBuf,
    pub output_dir: PathBuf,
    /// Posting text file. Read from stdin when unset.
    pub posting_path: Option<PathBuf>,
    pub history_limit: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            state_path: std::env::var("COVERKIT_STATE_PATH")
                .unwrap_or_else(|_| "coverkit_state.json".to_string())
                .into(),
            output_dir: std::env::var("COVERKIT_OUTPUT_DIR")
                .unwrap_or_else(|_| ".".to_string())
                .into(),
            posting_path: std::env::var("COVERKIT_POSTING_PATH").ok().map(PathBuf::from),
            history_limit: std::env::var("COVERKIT_HISTORY_LIMIT")
                .unwrap_or_else(|_| "50".to_string())
                .parse::<usize>()
                .context("COVERKIT_HISTORY_LIMIT must be a non-negative integer")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
