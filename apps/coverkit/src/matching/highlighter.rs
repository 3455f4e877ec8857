//! Span merger and posting highlighter.
//!
//! Overlap resolution is a greedy left-to-right pass: at a given start the longest
//! span wins, and among identical ranges the one the matcher produced first wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::matching::color::{paragraph_color, ColorVariant};
use crate::matching::escape::escape_html;
use crate::matching::matcher::{find_matches, MatchSpan};
use crate::models::{Paragraph, ParagraphId};

/// Result of running matcher and highlighter over a posting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostingAnalysis {
    /// Escaped posting text with highlight spans injected.
    pub html: String,
    pub matched_by_paragraph: HashMap<ParagraphId, Vec<String>>,
    /// Number of spans that survived overlap resolution.
    pub highlighted_spans: usize,
}

/// Selects a non-overlapping subset of spans, ordered by start.
///
/// Sort is stable, so ties in both start and end keep matcher iteration order.
pub fn select_spans(spans: &[MatchSpan]) -> Vec<&MatchSpan> {
    let mut sorted: Vec<&MatchSpan> = spans.iter().collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut kept: Vec<&MatchSpan> = Vec::with_capacity(sorted.len());
    let mut last_end = 0;
    for span in sorted {
        if span.start >= last_end {
            last_end = span.end;
            kept.push(span);
        }
    }
    kept
}

/// Wraps `content` in the highlight markup used everywhere in the app.
pub fn wrap_highlight(content: &str, color: &str) -> String {
    format!(r#"<span style="background:{color}">{content}</span>"#)
}

/// Rebuilds `raw_text` as escaped HTML with each kept span wrapped in a colored
/// `<span>`. Every slice is cut from the raw text first and escaped on its own.
pub fn highlight<F>(raw_text: &str, spans: &[MatchSpan], color_of: F) -> String
where
    F: Fn(usize) -> String,
{
    let mut out = String::with_capacity(raw_text.len() * 2);
    let mut cursor = 0;

    for span in select_spans(spans) {
        let (Some(gap), Some(matched)) = (
            raw_text.get(cursor..span.start),
            raw_text.get(span.start..span.end),
        ) else {
            tracing::warn!(start = span.start, end = span.end, "span outside text, skipped");
            continue;
        };
        out.push_str(&escape_html(gap));
        out.push_str(&wrap_highlight(&escape_html(matched), &color_of(span.color_index)));
        cursor = span.end;
    }

    out.push_str(&escape_html(raw_text.get(cursor..).unwrap_or_default()));
    out
}

/// Runs the matcher over `raw_text` and renders highlighted HTML using each
/// paragraph's soft color.
pub fn analyze_posting(raw_text: &str, paragraphs: &[Paragraph], dark_mode: bool) -> PostingAnalysis {
    let result = find_matches(raw_text, paragraphs);
    let color_of = |index: usize| {
        paragraphs
            .get(index)
            .map(|p| paragraph_color(p, index, dark_mode, ColorVariant::Soft))
            .unwrap_or_default()
    };
    let html = highlight(raw_text, &result.spans, color_of);

    PostingAnalysis {
        html,
        highlighted_spans: select_spans(&result.spans).len(),
        matched_by_paragraph: result.matched_by_paragraph,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
