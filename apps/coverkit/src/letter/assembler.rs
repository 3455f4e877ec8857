//! Cover Letter Assembler — turns the included paragraphs into one HTML fragment.
//!
//! Algorithm:
//! 1. Select paragraphs with `included || auto_include`, keeping their position in
//!    the full list for color resolution
//! 2. Strip trailing empty blocks, extract `<p>` blocks (or one implicit block)
//! 3. Optionally wrap each block's content in the paragraph's highlight color
//! 4. Merge no-line-break chains into a single block, joined by one space
//! 5. Substitute the recruiter name for `<recruiter>` tags

use std::sync::OnceLock;

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::letter::blocks::{extract_blocks, strip_trailing_empty_blocks, Block};
use crate::matching::color::{paragraph_color, ColorVariant};
use crate::matching::highlighter::wrap_highlight;
use crate::models::Paragraph;
use crate::state::Settings;

/// Shown for an included paragraph that has neither content nor keywords.
pub const EMPTY_PARAGRAPH_PLACEHOLDER: &str = "[No keywords - add keywords to this paragraph]";

const PLACEHOLDER_ATTRS: &str = r#" style="color:#888;font-style:italic""#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssembleOptions {
    pub highlight_enabled: bool,
    pub dark_mode: bool,
    #[serde(default)]
    pub recruiter_name: Option<String>,
}

impl From<&Settings> for AssembleOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            highlight_enabled: settings.highlight_enabled,
            dark_mode: settings.dark_mode,
            recruiter_name: settings.recruiter_name.clone(),
        }
    }
}

/// Builds the cover letter HTML from `paragraphs`. Returns an empty string when
/// nothing is included.
pub fn assemble_cover_letter(paragraphs: &[Paragraph], opts: &AssembleOptions) -> String {
    let selected: Vec<(usize, &Paragraph)> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_selected())
        .collect();
    let rendered: Vec<Vec<Block>> = selected
        .iter()
        .map(|&(index, p)| paragraph_blocks(p, index, opts))
        .collect();

    let mut out = String::new();
    let mut i = 0;
    while i < selected.len() {
        let (_, paragraph) = selected[i];
        let blocks = &rendered[i];
        i += 1;

        let Some((last, leading)) = blocks.split_last() else {
            continue;
        };
        for block in leading {
            out.push_str(&block.to_html());
        }
        if !paragraph.no_line_break {
            out.push_str(&last.to_html());
            continue;
        }

        // Absorb following paragraphs while the previous one asked for no break;
        // the paragraph that ends the chain is absorbed too.
        let mut merged = last.inner.clone();
        while i < selected.len() {
            let (_, next) = selected[i];
            let content = join_inner(&rendered[i]);
            if !content.is_empty() {
                merged.push(' ');
                merged.push_str(&content);
            }
            i += 1;
            if !next.no_line_break {
                break;
            }
        }
        out.push_str(
            &Block {
                attrs: last.attrs.clone(),
                inner: merged,
            }
            .to_html(),
        );
    }

    tracing::debug!(
        selected = selected.len(),
        bytes = out.len(),
        "cover letter assembled"
    );

    match opts.recruiter_name.as_deref() {
        Some(name) if !name.trim().is_empty() => replace_recruiter(&out, name),
        _ => out,
    }
}

/// Blocks for one selected paragraph, highlighted when enabled and the paragraph
/// has keywords.
fn paragraph_blocks(paragraph: &Paragraph, index: usize, opts: &AssembleOptions) -> Vec<Block> {
    let cleaned = strip_trailing_empty_blocks(&paragraph.html);
    let mut blocks = extract_blocks(&cleaned);

    if blocks.is_empty() {
        let content = cleaned.trim();
        if !content.is_empty() {
            blocks.push(Block::implicit(content));
        } else if paragraph.keywords.is_empty() {
            blocks.push(Block {
                attrs: PLACEHOLDER_ATTRS.to_string(),
                inner: EMPTY_PARAGRAPH_PLACEHOLDER.to_string(),
            });
        }
    }

    if opts.highlight_enabled && !paragraph.keywords.is_empty() {
        let color = paragraph_color(paragraph, index, opts.dark_mode, ColorVariant::Soft);
        for block in &mut blocks {
            block.inner = wrap_highlight(&block.inner, &color);
        }
    }
    blocks
}

fn join_inner(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(|b| b.inner.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn recruiter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<recruiter>|&lt;recruiter&gt;").expect("recruiter pattern is valid")
    })
}

/// Replaces every `<recruiter>` tag, raw or entity-escaped, with `name` verbatim.
fn replace_recruiter(html: &str, name: &str) -> String {
    recruiter_regex().replace_all(html, NoExpand(name)).into_owned()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::color::soft_color;
    use crate::models::Keyword;

    fn para(html: &str, keywords: &[&str], included: bool, no_line_break: bool) -> Paragraph {
        let mut p = Paragraph::new(html).with_keywords(keywords.iter().map(|k| Keyword::new(*k)));
        p.included = included;
        p.no_line_break = no_line_break;
        p
    }

    fn plain() -> AssembleOptions {
        AssembleOptions::default()
    }

    fn highlighted() -> AssembleOptions {
        AssembleOptions {
            highlight_enabled: true,
            ..AssembleOptions::default()
        }
    }

    #[test]
    fn test_nothing_included_returns_empty() {
        let paragraphs = vec![para("<p>A</p>", &["a"], false, false)];
        assert_eq!(assemble_cover_letter(&paragraphs, &plain()), "");
    }

    #[test]
    fn test_auto_include_overrides_included_flag() {
        let mut p = para("<p>Always</p>", &[], false, false);
        p.auto_include = true;
        assert_eq!(assemble_cover_letter(&[p], &plain()), "<p>Always</p>");
    }

    #[test]
    fn test_hello_world_merge_example() {
        let paragraphs = vec![
            para("<p>Hello</p>", &["Hello"], true, true),
            para("<p>World</p>", &[], true, false),
        ];
        assert_eq!(assemble_cover_letter(&paragraphs, &plain()), "<p>Hello World</p>");
        assert_eq!(
            assemble_cover_letter(&paragraphs, &highlighted()),
            format!(
                r#"<p><span style="background:{}">Hello</span> World</p>"#,
                soft_color(0, false)
            )
        );
    }

    #[test]
    fn test_chain_stops_after_paragraph_without_flag() {
        let paragraphs = vec![
            para("<p>One</p>", &[], true, true),
            para("<p>Two</p>", &[], true, false),
            para("<p>Three</p>", &[], true, false),
        ];
        assert_eq!(
            assemble_cover_letter(&paragraphs, &plain()),
            "<p>One Two</p><p>Three</p>"
        );
    }

    #[test]
    fn test_chain_spans_several_flagged_paragraphs() {
        let paragraphs = vec![
            para("<p>A</p>", &[], true, true),
            para("<p>B</p>", &[], true, true),
            para("<p>C</p>", &[], true, false),
            para("<p>D</p>", &[], true, false),
        ];
        assert_eq!(
            assemble_cover_letter(&paragraphs, &plain()),
            "<p>A B C</p><p>D</p>"
        );
    }

    #[test]
    fn test_chain_skips_excluded_paragraphs() {
        let paragraphs = vec![
            para("<p>A</p>", &[], true, true),
            para("<p>hidden</p>", &[], false, false),
            para("<p>B</p>", &[], true, false),
        ];
        assert_eq!(assemble_cover_letter(&paragraphs, &plain()), "<p>A B</p>");
    }

    #[test]
    fn test_merge_uses_last_block_and_absorbs_all_next_blocks() {
        let paragraphs = vec![
            para(r#"<p>Intro</p><p class="x">Tail</p>"#, &[], true, true),
            para("<p>Next one</p><p>Next two</p>", &[], true, false),
        ];
        assert_eq!(
            assemble_cover_letter(&paragraphs, &plain()),
            r#"<p>Intro</p><p class="x">Tail Next one Next two</p>"#
        );
    }

    #[test]
    fn test_trailing_empty_blocks_do_not_contribute() {
        let paragraphs = vec![
            para("<p>Body</p><p><br></p>", &[], true, true),
            para("<p>More</p>", &[], true, false),
        ];
        assert_eq!(assemble_cover_letter(&paragraphs, &plain()), "<p>Body More</p>");
    }

    #[test]
    fn test_content_without_blocks_is_one_implicit_block() {
        let paragraphs = vec![para("  Just <b>text</b>  ", &[], true, false)];
        assert_eq!(
            assemble_cover_letter(&paragraphs, &plain()),
            "<p>Just <b>text</b></p>"
        );
    }

    #[test]
    fn test_malformed_block_falls_back_to_implicit() {
        let paragraphs = vec![para("<p>unclosed", &[], true, false)];
        assert_eq!(
            assemble_cover_letter(&paragraphs, &plain()),
            "<p><p>unclosed</p>"
        );
    }

    #[test]
    fn test_empty_keywordless_paragraph_gets_placeholder() {
        let paragraphs = vec![para("<p><br></p>", &[], true, false)];
        let out = assemble_cover_letter(&paragraphs, &highlighted());
        assert!(out.contains(EMPTY_PARAGRAPH_PLACEHOLDER));
        assert!(out.contains("font-style:italic"));
        assert!(!out.contains("background"));
    }

    #[test]
    fn test_empty_paragraph_with_keywords_emits_nothing() {
        let paragraphs = vec![para("", &["rust"], true, false)];
        assert_eq!(assemble_cover_letter(&paragraphs, &highlighted()), "");
    }

    #[test]
    fn test_keywordless_paragraph_is_never_highlighted() {
        let paragraphs = vec![para("<p>Plain</p>", &[], true, false)];
        assert_eq!(assemble_cover_letter(&paragraphs, &highlighted()), "<p>Plain</p>");
    }

    #[test]
    fn test_highlight_color_uses_unfiltered_position() {
        let paragraphs = vec![
            para("<p>skip</p>", &["x"], false, false),
            para("<p>keep</p>", &["y"], true, false),
        ];
        let opts = AssembleOptions {
            highlight_enabled: true,
            dark_mode: true,
            recruiter_name: None,
        };
        assert_eq!(
            assemble_cover_letter(&paragraphs, &opts),
            format!(r#"<p><span style="background:{}">keep</span></p>"#, soft_color(1, true))
        );
    }

    #[test]
    fn test_recruiter_tag_is_replaced_case_insensitively() {
        let paragraphs = vec![para(
            "<p>Dear <recruiter>, thanks <RECRUITER>. &lt;Recruiter&gt;</p>",
            &[],
            true,
            false,
        )];
        let opts = AssembleOptions {
            recruiter_name: Some("Ms. $1 Lee".to_string()),
            ..AssembleOptions::default()
        };
        assert_eq!(
            assemble_cover_letter(&paragraphs, &opts),
            "<p>Dear Ms. $1 Lee, thanks Ms. $1 Lee. Ms. $1 Lee</p>"
        );
    }

    #[test]
    fn test_blank_recruiter_name_leaves_tag() {
        let paragraphs = vec![para("<p>Dear <recruiter></p>", &[], true, false)];
        let opts = AssembleOptions {
            recruiter_name: Some("  ".to_string()),
            ..AssembleOptions::default()
        };
        assert_eq!(
            assemble_cover_letter(&paragraphs, &opts),
            "<p>Dear <recruiter></p>"
        );
    }

    #[test]
    fn test_options_from_settings() {
        let settings = Settings {
            highlight_enabled: false,
            dark_mode: true,
            recruiter_name: Some("Sam".to_string()),
        };
        let opts = AssembleOptions::from(&settings);
        assert!(!opts.highlight_enabled);
        assert!(opts.dark_mode);
        assert_eq!(opts.recruiter_name.as_deref(), Some("Sam"));
    }
}
