//! Session — the explicit state container owned by the composition root.
//!
//! Holds the current snapshot, the undo/redo history and the persistence boundary.
//! Paragraph edits go through `execute` and are undoable; analysis and settings
//! changes are not recorded.

pub mod history;
pub mod inclusion;
pub mod operations;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::letter::{assemble_cover_letter, AssembleOptions};
use crate::matching::color::next_available_color_index;
use crate::matching::{analyze_posting, PostingAnalysis};
use crate::models::{Keyword, Paragraph, ParagraphId};
use crate::state::{AppState, Settings};
use crate::storage::Storage;

pub use history::History;
pub use inclusion::apply_matches;
pub use operations::{apply, Operation, ParagraphFlag};

pub struct Session {
    state: AppState,
    history: History,
    storage: Box<dyn Storage>,
}

impl Session {
    /// Loads the saved snapshot, or starts empty when none exists.
    pub fn open(storage: Box<dyn Storage>, history_limit: usize) -> Result<Self, AppError> {
        let state = storage.load()?.unwrap_or_default();
        Ok(Self::with_state(state, storage, history_limit))
    }

    pub fn with_state(state: AppState, storage: Box<dyn Storage>, history_limit: usize) -> Self {
        Self {
            state,
            history: History::new(history_limit),
            storage,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.storage.save(&self.state)
    }

    // ── undoable edits ──────────────────────────────────────────────────────

    pub fn execute(&mut self, op: Operation) -> Result<(), AppError> {
        let (next, inverse) = apply(&self.state, op)?;
        self.state = next;
        self.history.record(inverse);
        Ok(())
    }

    /// Reverts the most recent edit. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool, AppError> {
        let Some(op) = self.history.pop_undo() else {
            return Ok(false);
        };
        match apply(&self.state, op.clone()) {
            Ok((next, inverse)) => {
                self.state = next;
                self.history.push_redo(inverse);
                debug!(undo_depth = self.history.undo_depth(), "undo");
                Ok(true)
            }
            Err(e) => {
                self.history.push_undo(op);
                Err(e)
            }
        }
    }

    /// Re-applies the most recently undone edit.
    pub fn redo(&mut self) -> Result<bool, AppError> {
        let Some(op) = self.history.pop_redo() else {
            return Ok(false);
        };
        match apply(&self.state, op.clone()) {
            Ok((next, inverse)) => {
                self.state = next;
                self.history.push_undo(inverse);
                debug!(undo_depth = self.history.undo_depth(), "redo");
                Ok(true)
            }
            Err(e) => {
                self.history.push_redo(op);
                Err(e)
            }
        }
    }

    pub fn add_paragraph(
        &mut self,
        html: impl Into<String>,
        index: Option<usize>,
    ) -> Result<ParagraphId, AppError> {
        let paragraph = Paragraph::new(html);
        let id = paragraph.id;
        self.execute(Operation::AddParagraph { index, paragraph })?;
        Ok(id)
    }

    /// Adds a keyword with its text trimmed.
    pub fn add_keyword(&mut self, id: ParagraphId, keyword: Keyword) -> Result<(), AppError> {
        let keyword = Keyword {
            text: keyword.search_text().to_string(),
            ..keyword
        };
        self.execute(Operation::AddKeyword {
            id,
            keyword,
            index: None,
        })
    }

    pub fn set_flag(&mut self, id: ParagraphId, flag: ParagraphFlag, value: bool) -> Result<(), AppError> {
        self.execute(Operation::SetFlag { id, flag, value })
    }

    /// Sets an explicit color, or returns the paragraph to auto-color with `None`.
    pub fn set_color(&mut self, id: ParagraphId, color: Option<String>) -> Result<(), AppError> {
        let user_picked = color.is_some();
        self.execute(Operation::SetColor {
            id,
            color,
            user_picked,
        })
    }

    /// Palette index to preselect when the color picker opens for `id`.
    pub fn suggested_color_index(&self, id: ParagraphId) -> usize {
        next_available_color_index(&self.state.paragraphs, Some(id))
    }

    // ── non-undoable updates ────────────────────────────────────────────────

    pub fn update_settings(&mut self, settings: Settings) {
        self.state.settings = settings;
    }

    /// Applies a snapshot transform that is not part of paragraph history, such as
    /// a job tracker edit.
    pub fn commit<T>(
        &mut self,
        edit: impl FnOnce(&AppState) -> Result<(AppState, T), AppError>,
    ) -> Result<T, AppError> {
        let (next, out) = edit(&self.state)?;
        self.state = next;
        Ok(out)
    }

    // ── pipeline ────────────────────────────────────────────────────────────

    /// Replaces the posting text (undoable) and analyses it.
    pub fn analyze_text(&mut self, text: impl Into<String>) -> Result<PostingAnalysis, AppError> {
        self.execute(Operation::SetPostingText { text: text.into() })?;
        Ok(self.analyze())
    }

    /// Matches the current posting text, updates inclusion flags and returns the
    /// highlighted posting.
    pub fn analyze(&mut self) -> PostingAnalysis {
        let analysis = analyze_posting(
            &self.state.posting_text,
            &self.state.paragraphs,
            self.state.settings.dark_mode,
        );
        self.state.paragraphs = apply_matches(&self.state.paragraphs, &analysis.matched_by_paragraph);
        info!(
            matched_paragraphs = analysis.matched_by_paragraph.len(),
            highlighted_spans = analysis.highlighted_spans,
            "posting analysed"
        );
        analysis
    }

    pub fn cover_letter(&self) -> String {
        assemble_cover_letter(
            &self.state.paragraphs,
            &AssembleOptions::from(&self.state.settings),
        )
    }
}
