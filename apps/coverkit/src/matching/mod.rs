//! Keyword matching and posting highlighting.
//!
//! Pure functions only: the caller passes a snapshot of the paragraph list in and
//! gets derived spans, HTML and matched-keyword sets back.

pub mod color;
pub mod escape;
pub mod highlighter;
pub mod matcher;

pub use color::{paragraph_color, ColorVariant};
pub use escape::escape_html;
pub use highlighter::{analyze_posting, highlight, select_spans, PostingAnalysis};
pub use matcher::{find_matches, MatchResult, MatchSpan};
