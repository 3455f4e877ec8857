use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{JobEntry, Paragraph, ParagraphId};
use crate::site_rules::{default_site_rules, SiteRule};

/// User preferences that shape analysis and assembly output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true")]
    pub highlight_enabled: bool,
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recruiter_name: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            highlight_enabled: true,
            dark_mode: false,
            recruiter_name: None,
        }
    }
}

/// The whole application state. Loaded and saved as one JSON snapshot.
///
/// Every edit produces a new value (see `session::operations::apply`); callers hold
/// snapshots, never shared mutable references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
    #[serde(default)]
    pub posting_text: String,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub jobs: Vec<JobEntry>,
    #[serde(default = "default_site_rules")]
    pub site_rules: Vec<SiteRule>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            paragraphs: Vec::new(),
            posting_text: String::new(),
            settings: Settings::default(),
            jobs: Vec::new(),
            site_rules: default_site_rules(),
        }
    }
}

impl AppState {
    pub fn paragraph_index(&self, id: ParagraphId) -> Result<usize, AppError> {
        self.paragraphs
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| AppError::NotFound(format!("paragraph {id}")))
    }

    pub fn paragraph(&self, id: ParagraphId) -> Result<&Paragraph, AppError> {
        let index = self.paragraph_index(id)?;
        Ok(&self.paragraphs[index])
    }

    pub fn paragraph_mut(&mut self, id: ParagraphId) -> Result<&mut Paragraph, AppError> {
        let index = self.paragraph_index(id)?;
        Ok(&mut self.paragraphs[index])
    }
}
