//! Paragraph color resolution.
//!
//! Palette hues step by 47 degrees per positional index so neighbouring paragraphs
//! stay visually distinct. Explicit colors always win over the palette.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Paragraph, ParagraphId};

/// Number of palette slots considered when suggesting a color for a new pick.
pub const PALETTE_SIZE: usize = 12;

const HUE_STEP: usize = 47;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorVariant {
    /// Highlight background.
    Soft,
    /// Higher-saturation swatch for UI chrome.
    Opaque,
}

pub fn palette_hue(index: usize) -> usize {
    (index % 360) * HUE_STEP % 360
}

pub fn soft_color(index: usize, dark_mode: bool) -> String {
    let hue = palette_hue(index);
    if dark_mode {
        format!("hsl({hue}, 70%, 35%)")
    } else {
        format!("hsl({hue}, 80%, 85%)")
    }
}

pub fn opaque_color(index: usize, dark_mode: bool) -> String {
    let hue = palette_hue(index);
    if dark_mode {
        format!("hsl({hue}, 80%, 50%)")
    } else {
        format!("hsl({hue}, 90%, 60%)")
    }
}

/// Fixed gray for paragraphs with no keywords and no explicit color.
pub fn neutral_color(dark_mode: bool) -> String {
    if dark_mode {
        "hsl(0, 0%, 30%)".to_string()
    } else {
        "hsl(0, 0%, 85%)".to_string()
    }
}

/// Resolves a paragraph's color: explicit color, then gray for keyword-less
/// paragraphs, then the palette entry for its position in the full list.
pub fn paragraph_color(
    paragraph: &Paragraph,
    index: usize,
    dark_mode: bool,
    variant: ColorVariant,
) -> String {
    if let Some(color) = paragraph.explicit_color() {
        return color.to_string();
    }
    if paragraph.keywords.is_empty() {
        return neutral_color(dark_mode);
    }
    match variant {
        ColorVariant::Soft => soft_color(index, dark_mode),
        ColorVariant::Opaque => opaque_color(index, dark_mode),
    }
}

/// Suggests a palette index for a new explicit pick.
///
/// Scans the first `PALETTE_SIZE` slots and skips hues already taken by another
/// paragraph, either through its explicit color or its auto-derived one. Falls
/// back to `paragraphs.len()` when every slot is taken.
pub fn next_available_color_index(
    paragraphs: &[Paragraph],
    exclude: Option<ParagraphId>,
) -> usize {
    let used: HashSet<usize> = paragraphs
        .iter()
        .enumerate()
        .filter(|(_, p)| Some(p.id) != exclude)
        .filter_map(|(index, p)| match p.explicit_color() {
            Some(color) => parse_hsl_hue(color),
            None if p.keywords.is_empty() => None,
            None => Some(palette_hue(index)),
        })
        .collect();

    (0..PALETTE_SIZE)
        .find(|&i| !used.contains(&palette_hue(i)))
        .unwrap_or(paragraphs.len())
}

/// Extracts the hue from an `hsl(...)`/`hsla(...)` string. Other formats carry
/// no comparable hue and yield `None`.
fn parse_hsl_hue(color: &str) -> Option<usize> {
    let lower = color.trim().to_ascii_lowercase();
    let args = lower
        .strip_prefix("hsla(")
        .or_else(|| lower.strip_prefix("hsl("))?;
    let first = args
        .split(|c: char| c == ',' || c.is_whitespace() || c == ')')
        .find(|s| !s.is_empty())?;
    let hue: f64 = first.trim_end_matches("deg").parse().ok()?;
    Some((hue.round() as i64).rem_euclid(360) as usize)
}
