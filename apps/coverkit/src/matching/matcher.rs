//! Matcher — finds every occurrence of every paragraph keyword in posting text.
//!
//! Offsets are byte offsets into the original text. Case folding is char-wise and
//! keeps the UTF-8 layout intact, so an offset found in the folded text is valid in
//! the original.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::{Keyword, Paragraph, ParagraphId};

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

/// A keyword occurrence in raw text. Derived, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
    /// Position of the originating paragraph in the full, unfiltered list.
    pub color_index: usize,
    /// Trimmed keyword text.
    pub keyword: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Every occurrence, in paragraph-then-keyword-then-offset order.
    pub spans: Vec<MatchSpan>,
    /// Distinct matched keyword texts per paragraph, in first-match order.
    pub matched_by_paragraph: HashMap<ParagraphId, Vec<String>>,
}

impl MatchResult {
    pub fn matched_keywords(&self, id: ParagraphId) -> &[String] {
        self.matched_by_paragraph
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matching
// ────────────────────────────────────────────────────────────────────────────

/// Scans `raw_text` for every non-empty keyword of every paragraph.
///
/// Overlapping occurrences of the same keyword are all reported; the highlighter
/// resolves overlaps later.
pub fn find_matches(raw_text: &str, paragraphs: &[Paragraph]) -> MatchResult {
    let mut result = MatchResult::default();
    let folded_text = fold_case(raw_text);

    for (color_index, paragraph) in paragraphs.iter().enumerate() {
        for keyword in &paragraph.keywords {
            let needle = keyword.search_text();
            if needle.is_empty() {
                continue;
            }

            let starts = if keyword.match_case {
                occurrences(raw_text, needle)
            } else {
                occurrences(&folded_text, &fold_case(needle))
            };

            for start in starts {
                let end = start + needle.len();
                if keyword.match_whole_word && !is_whole_word(raw_text, start, end) {
                    continue;
                }
                record(&mut result, paragraph.id, keyword, start, end, color_index);
            }
        }
    }

    tracing::debug!(
        spans = result.spans.len(),
        paragraphs = result.matched_by_paragraph.len(),
        "keyword scan complete"
    );
    result
}

fn record(
    result: &mut MatchResult,
    paragraph_id: ParagraphId,
    keyword: &Keyword,
    start: usize,
    end: usize,
    color_index: usize,
) {
    let text = keyword.search_text();
    result.spans.push(MatchSpan {
        start,
        end,
        color_index,
        keyword: text.to_string(),
    });
    let matched = result.matched_by_paragraph.entry(paragraph_id).or_default();
    if !matched.iter().any(|k| k == text) {
        matched.push(text.to_string());
    }
}

/// Start offsets of every occurrence of `needle`, overlapping ones included.
fn occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut from = 0;
    while from <= haystack.len() {
        let Some(pos) = haystack[from..].find(needle) else {
            break;
        };
        let start = from + pos;
        found.push(start);
        // resume one character after this start
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    found
}

/// Lower-cases char by char, keeping any char whose lower-case form would change
/// its encoded length.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(l), None) if l.len_utf8() == c.len_utf8() => l,
                _ => c,
            }
        })
        .collect()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Both neighbours must be non-word characters; text edges count as a space.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back().unwrap_or(' ');
    let after = text[end..].chars().next().unwrap_or(' ');
    !is_word_char(before) && !is_word_char(after)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(keywords: Vec<Keyword>) -> Paragraph {
        Paragraph::new("").with_keywords(keywords)
    }

    fn starts(result: &MatchResult) -> Vec<usize> {
        result.spans.iter().map(|s| s.start).collect()
    }

    #[test]
    fn test_whole_word_case_sensitive_one_span_per_occurrence() {
        let p = paragraph(vec![Keyword::new("Rust").whole_word().case_sensitive()]);
        let result = find_matches("Rust, and more Rust. Rusty? Rust", &[p]);
        assert_eq!(starts(&result), vec![0, 15, 28]);
        assert!(result.spans.iter().all(|s| s.end - s.start == 4));
    }

    #[test]
    fn test_whole_word_rejects_substring_of_longer_word() {
        let p = paragraph(vec![Keyword::new("cat").whole_word()]);
        let result = find_matches("category concatenate", &[p]);
        assert!(result.spans.is_empty());
        assert!(result.matched_by_paragraph.is_empty());
    }

    #[test]
    fn test_cats_and_categories_example() {
        let p = paragraph(vec![Keyword::new("cat").whole_word()]);
        let result = find_matches("Cats and categories", &[p]);
        // "Cats": 's' follows, not a boundary. "categories": 'e' follows.
        assert!(result.spans.is_empty());

        let p = paragraph(vec![Keyword::new("cat").whole_word()]);
        let result = find_matches("Cat and categories", &[p]);
        assert_eq!(starts(&result), vec![0]);
        assert_eq!(result.spans[0].end, 3);
    }

    #[test]
    fn test_case_insensitive_matches_all_casings() {
        let p = paragraph(vec![Keyword::new("react")]);
        let result = find_matches("React and REACT and react", &[p]);
        assert_eq!(starts(&result), vec![0, 10, 20]);
    }

    #[test]
    fn test_case_sensitive_skips_other_casings() {
        let p = paragraph(vec![Keyword::new("react").case_sensitive()]);
        let result = find_matches("React and REACT and react", &[p]);
        assert_eq!(starts(&result), vec![20]);
    }

    #[test]
    fn test_overlapping_occurrences_are_all_reported() {
        let p = paragraph(vec![Keyword::new("aa")]);
        let result = find_matches("aaaa", &[p]);
        assert_eq!(starts(&result), vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_and_whitespace_keywords_are_skipped() {
        let p = paragraph(vec![Keyword::new(""), Keyword::new("   ")]);
        let result = find_matches("any text at all", &[p]);
        assert!(result.spans.is_empty());
    }

    #[test]
    fn test_keyword_is_trimmed_for_search_and_length() {
        let p = paragraph(vec![Keyword::new("  Go  ")]);
        let result = find_matches("We use Go daily", &[p]);
        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].start, 7);
        assert_eq!(result.spans[0].end, 9);
        assert_eq!(result.spans[0].keyword, "Go");
    }

    #[test]
    fn test_punctuation_and_text_edges_are_boundaries() {
        let p = paragraph(vec![Keyword::new("sql").whole_word()]);
        let result = find_matches("SQL/NoSQL (sql)", &[p]);
        assert_eq!(starts(&result), vec![0, 11]);
    }

    #[test]
    fn test_underscore_is_a_word_character() {
        let p = paragraph(vec![Keyword::new("api").whole_word()]);
        let result = find_matches("rest_api api", &[p]);
        assert_eq!(starts(&result), vec![9]);
    }

    #[test]
    fn test_color_index_is_position_in_full_list() {
        let first = paragraph(vec![Keyword::new("python")]);
        let second = paragraph(vec![Keyword::new("rust")]);
        let result = find_matches("rust", &[first, second]);
        assert_eq!(result.spans[0].color_index, 1);
    }

    #[test]
    fn test_matched_set_records_each_keyword_once() {
        let p = paragraph(vec![Keyword::new("rust"), Keyword::new("go"), Keyword::new("java")]);
        let id = p.id;
        let result = find_matches("rust go rust go", &[p]);
        assert_eq!(result.matched_keywords(id), ["rust", "go"]);
        assert_eq!(result.spans.len(), 4);
    }

    #[test]
    fn test_offsets_stay_valid_with_multibyte_text() {
        let p = paragraph(vec![Keyword::new("CAFÉ")]);
        let text = "Über café";
        let result = find_matches(text, &[p]);
        assert_eq!(result.spans.len(), 1);
        let span = &result.spans[0];
        assert_eq!(&text[span.start..span.end], "café");
    }

    #[test]
    fn test_fold_case_preserves_byte_length() {
        let text = "İstanbul KELVIN \u{212A}";
        assert_eq!(fold_case(text).len(), text.len());
        assert_eq!(fold_case("ÀB"), "àb");
    }
}
