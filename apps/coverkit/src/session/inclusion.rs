use std::collections::HashMap;

use crate::models::{Paragraph, ParagraphId};

/// Folds an analysis result back into the paragraph list.
///
/// Records each paragraph's matched keywords and forces `included` on for
/// auto-include paragraphs and for any paragraph with a match. Never clears
/// `included`; only an explicit edit does that.
pub fn apply_matches(
    paragraphs: &[Paragraph],
    matched_by_paragraph: &HashMap<ParagraphId, Vec<String>>,
) -> Vec<Paragraph> {
    paragraphs
        .iter()
        .map(|paragraph| {
            let mut next = paragraph.clone();
            next.last_matched_keywords = matched_by_paragraph
                .get(&paragraph.id)
                .cloned()
                .unwrap_or_default();
            if next.auto_include || !next.last_matched_keywords.is_empty() {
                next.included = true;
            }
            next
        })
        .collect()
}
