//! Persistence boundary: one JSON snapshot of `AppState`, plus file exports.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::state::AppState;

/// Default snapshot file name, the single key the state lives under.
pub const STATE_FILE_NAME: &str = "coverkit_state.json";

/// Loads and saves the whole application state.
pub trait Storage: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<AppState>, AppError>;
    fn save(&self, state: &AppState) -> Result<(), AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// JSON file storage
// ────────────────────────────────────────────────────────────────────────────

/// Stores the snapshot in one JSON file, replaced atomically on save.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<AppState>, AppError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no saved state");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let state: AppState = serde_json::from_str(&raw)?;
        info!(
            path = %self.path.display(),
            paragraphs = state.paragraphs.len(),
            "state loaded"
        );
        Ok(Some(state))
    }

    fn save(&self, state: &AppState) -> Result<(), AppError> {
        let json = serde_json::to_vec_pretty(state)?;
        write_atomic(&self.path, &json)?;
        debug!(path = %self.path.display(), bytes = json.len(), "state saved");
        Ok(())
    }
}

fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), AppError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.persist(path).map_err(|e| AppError::Storage(e.error))?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory storage
// ────────────────────────────────────────────────────────────────────────────

/// Keeps the serialized snapshot in memory. Serializes on save so it exercises
/// the same JSON path as the file store.
#[derive(Default)]
pub struct MemoryStorage {
    snapshot: Mutex<Option<String>>,
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<AppState>, AppError> {
        let guard = self
            .snapshot
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("memory storage poisoned")))?;
        guard
            .as_deref()
            .map(serde_json::from_str::<AppState>)
            .transpose()
            .map_err(AppError::from)
    }

    fn save(&self, state: &AppState) -> Result<(), AppError> {
        let json = serde_json::to_string(state)?;
        let mut guard = self
            .snapshot
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("memory storage poisoned")))?;
        *guard = Some(json);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Exports
// ────────────────────────────────────────────────────────────────────────────

/// Writes `contents` to `dir/filename`. Returns the written path.
pub fn export_text(dir: &Path, filename: &str, contents: &str) -> Result<PathBuf, AppError> {
    let name = sanitize_filename(filename)?;
    let path = dir.join(name);
    write_atomic(&path, contents.as_bytes())?;
    info!(path = %path.display(), "exported");
    Ok(path)
}

/// Serializes `value` as pretty JSON into `dir/filename`.
pub fn export_json<T: Serialize>(dir: &Path, filename: &str, value: &T) -> Result<PathBuf, AppError> {
    let json = serde_json::to_string_pretty(value)?;
    export_text(dir, filename, &json)
}

/// Rejects names that would escape the export directory.
fn sanitize_filename(filename: &str) -> Result<&str, AppError> {
    let name = filename.trim();
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(AppError::Validation(format!("invalid export file name '{filename}'")));
    }
    Ok(name)
}
