//! Block extraction over editor-produced HTML fragments.
//!
//! Only `<p>` blocks are recognised. Unbalanced markup is not an error: a fragment
//! without a complete block yields no blocks and the caller falls back to treating
//! the whole fragment as one implicit block.

use std::sync::OnceLock;

use regex::Regex;

/// A top-level `<p>` block: its raw attribute text and inner markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Attribute text including its leading whitespace, e.g. ` class="lead"`.
    pub attrs: String,
    pub inner: String,
}

impl Block {
    pub fn implicit(inner: impl Into<String>) -> Self {
        Self {
            attrs: String::new(),
            inner: inner.into(),
        }
    }

    pub fn to_html(&self) -> String {
        format!("<p{}>{}</p>", self.attrs, self.inner)
    }
}

fn block_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<p(\s[^>]*)?>(.*?)</p\s*>").expect("block pattern is valid")
    })
}

fn blank_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)^(?:\s|&nbsp;)*(?:<br\s*/?>)?(?:\s|&nbsp;)*$")
            .expect("blank pattern is valid")
    })
}

/// True for block content that is only whitespace or a single line break.
pub fn is_blank_content(inner: &str) -> bool {
    blank_regex().is_match(inner)
}

/// Drops empty blocks at the end of the fragment, e.g. `<p><br></p>` left behind
/// by the editor after a trailing Enter.
pub fn strip_trailing_empty_blocks(html: &str) -> String {
    let mut current = html.trim_end();
    loop {
        let Some(last) = block_regex().captures_iter(current).last() else {
            break;
        };
        let (Some(whole), Some(inner)) = (last.get(0), last.get(2)) else {
            break;
        };
        if whole.end() != current.len() || !is_blank_content(inner.as_str()) {
            break;
        }
        current = current[..whole.start()].trim_end();
    }
    current.to_string()
}

/// Extracts every non-empty `<p>` block, keeping attributes and inner markup.
pub fn extract_blocks(html: &str) -> Vec<Block> {
    block_regex()
        .captures_iter(html)
        .filter_map(|caps| {
            let inner = caps.get(2).map_or("", |m| m.as_str());
            if is_blank_content(inner) {
                return None;
            }
            Some(Block {
                attrs: caps.get(1).map_or("", |m| m.as_str()).to_string(),
                inner: inner.to_string(),
            })
        })
        .collect()
}
