//! Cover letter assembly from included paragraphs.

pub mod assembler;
pub mod blocks;

pub use assembler::{assemble_cover_letter, AssembleOptions, EMPTY_PARAGRAPH_PLACEHOLDER};
pub use blocks::{extract_blocks, strip_trailing_empty_blocks, Block};
