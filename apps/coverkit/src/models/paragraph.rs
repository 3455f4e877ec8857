use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ParagraphId = Uuid;

/// A lexical search term with its matching options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub text: String,
    #[serde(default)]
    pub match_whole_word: bool,
    #[serde(default)]
    pub match_case: bool,
}

impl Keyword {
    /// Keyword with both options off: substring, case-insensitive.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            match_whole_word: false,
            match_case: false,
        }
    }

    pub fn whole_word(mut self) -> Self {
        self.match_whole_word = true;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.match_case = true;
        self
    }

    /// The text used for searching and for span length.
    pub fn search_text(&self) -> &str {
        self.text.trim()
    }
}

/// A user-authored cover-letter block plus its keywords and inclusion flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub id: ParagraphId,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub included: bool,
    #[serde(default)]
    pub auto_include: bool,
    #[serde(default)]
    pub no_line_break: bool,
    /// UI only.
    #[serde(default)]
    pub collapsed: bool,
    #[serde(default)]
    pub user_picked_color: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Derived by the most recent analysis. Not authoritative.
    #[serde(default)]
    pub last_matched_keywords: Vec<String>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new("")
    }
}

impl Paragraph {
    pub fn new(html: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            html: html.into(),
            keywords: Vec::new(),
            included: false,
            auto_include: false,
            no_line_break: false,
            collapsed: false,
            user_picked_color: false,
            color: None,
            last_matched_keywords: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: impl IntoIterator<Item = Keyword>) -> Self {
        for keyword in keywords {
            if !self.has_keyword(&keyword.text) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    pub fn has_keyword(&self, text: &str) -> bool {
        self.keywords.iter().any(|k| k.text == text)
    }

    pub fn keyword_position(&self, text: &str) -> Option<usize> {
        self.keywords.iter().position(|k| k.text == text)
    }

    /// Whether the cover letter assembler picks this paragraph up.
    pub fn is_selected(&self) -> bool {
        self.included || self.auto_include
    }

    /// Explicit color, ignoring blank strings.
    pub fn explicit_color(&self) -> Option<&str> {
        self.color.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}
