//! Reversible state edits.
//!
//! Each edit is plain data. `apply` is pure: it takes a snapshot and returns the
//! edited snapshot together with the operation that reverts it.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Keyword, Paragraph, ParagraphId};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphFlag {
    Included,
    AutoInclude,
    NoLineBreak,
    Collapsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Operation {
    /// Inserts at `index`, or appends when `None`. Out-of-range indexes append.
    AddParagraph {
        index: Option<usize>,
        paragraph: Paragraph,
    },
    DeleteParagraph {
        id: ParagraphId,
    },
    MoveParagraph {
        from: usize,
        to: usize,
    },
    SetHtml {
        id: ParagraphId,
        html: String,
    },
    AddKeyword {
        id: ParagraphId,
        keyword: Keyword,
        index: Option<usize>,
    },
    RemoveKeyword {
        id: ParagraphId,
        text: String,
    },
    SetKeywordOptions {
        id: ParagraphId,
        text: String,
        match_whole_word: bool,
        match_case: bool,
    },
    SetFlag {
        id: ParagraphId,
        flag: ParagraphFlag,
        value: bool,
    },
    /// `user_picked` is stored alongside so reverting a pick restores auto-color.
    SetColor {
        id: ParagraphId,
        color: Option<String>,
        user_picked: bool,
    },
    SetPostingText {
        text: String,
    },
}

/// Applies `op` to a copy of `state`. Returns the new snapshot and the inverse.
pub fn apply(state: &AppState, op: Operation) -> Result<(AppState, Operation), AppError> {
    let mut next = state.clone();

    let inverse = match op {
        Operation::AddParagraph { index, paragraph } => {
            if next.paragraphs.iter().any(|p| p.id == paragraph.id) {
                return Err(AppError::Validation(format!(
                    "paragraph {} already exists",
                    paragraph.id
                )));
            }
            let id = paragraph.id;
            let at = index
                .unwrap_or(next.paragraphs.len())
                .min(next.paragraphs.len());
            next.paragraphs.insert(at, paragraph);
            Operation::DeleteParagraph { id }
        }

        Operation::DeleteParagraph { id } => {
            let index = next.paragraph_index(id)?;
            let paragraph = next.paragraphs.remove(index);
            Operation::AddParagraph {
                index: Some(index),
                paragraph,
            }
        }

        Operation::MoveParagraph { from, to } => {
            let len = next.paragraphs.len();
            if from >= len || to >= len {
                return Err(AppError::Validation(format!(
                    "cannot move paragraph {from} to {to}: only {len} paragraphs"
                )));
            }
            let paragraph = next.paragraphs.remove(from);
            next.paragraphs.insert(to, paragraph);
            Operation::MoveParagraph { from: to, to: from }
        }

        Operation::SetHtml { id, html } => {
            let paragraph = next.paragraph_mut(id)?;
            let previous = std::mem::replace(&mut paragraph.html, html);
            Operation::SetHtml { id, html: previous }
        }

        Operation::AddKeyword { id, keyword, index } => {
            if keyword.search_text().is_empty() {
                return Err(AppError::Validation("keyword text is empty".to_string()));
            }
            let paragraph = next.paragraph_mut(id)?;
            if paragraph.has_keyword(&keyword.text) {
                return Err(AppError::Validation(format!(
                    "keyword '{}' already exists",
                    keyword.text
                )));
            }
            let text = keyword.text.clone();
            let at = index
                .unwrap_or(paragraph.keywords.len())
                .min(paragraph.keywords.len());
            paragraph.keywords.insert(at, keyword);
            Operation::RemoveKeyword { id, text }
        }

        Operation::RemoveKeyword { id, text } => {
            let paragraph = next.paragraph_mut(id)?;
            let position = paragraph
                .keyword_position(&text)
                .ok_or_else(|| AppError::NotFound(format!("keyword '{text}'")))?;
            let keyword = paragraph.keywords.remove(position);
            Operation::AddKeyword {
                id,
                keyword,
                index: Some(position),
            }
        }

        Operation::SetKeywordOptions {
            id,
            text,
            match_whole_word,
            match_case,
        } => {
            let paragraph = next.paragraph_mut(id)?;
            let keyword = paragraph
                .keywords
                .iter_mut()
                .find(|k| k.text == text)
                .ok_or_else(|| AppError::NotFound(format!("keyword '{text}'")))?;
            let inverse = Operation::SetKeywordOptions {
                id,
                text,
                match_whole_word: keyword.match_whole_word,
                match_case: keyword.match_case,
            };
            keyword.match_whole_word = match_whole_word;
            keyword.match_case = match_case;
            inverse
        }

        Operation::SetFlag { id, flag, value } => {
            let paragraph = next.paragraph_mut(id)?;
            let slot = match flag {
                ParagraphFlag::Included => &mut paragraph.included,
                ParagraphFlag::AutoInclude => &mut paragraph.auto_include,
                ParagraphFlag::NoLineBreak => &mut paragraph.no_line_break,
                ParagraphFlag::Collapsed => &mut paragraph.collapsed,
            };
            let previous = std::mem::replace(slot, value);
            Operation::SetFlag {
                id,
                flag,
                value: previous,
            }
        }

        Operation::SetColor {
            id,
            color,
            user_picked,
        } => {
            let paragraph = next.paragraph_mut(id)?;
            let inverse = Operation::SetColor {
                id,
                color: paragraph.color.take(),
                user_picked: paragraph.user_picked_color,
            };
            paragraph.color = color;
            paragraph.user_picked_color = user_picked;
            inverse
        }

        Operation::SetPostingText { text } => {
            let previous = std::mem::replace(&mut next.posting_text, text);
            Operation::SetPostingText { text: previous }
        }
    };

    Ok((next, inverse))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
