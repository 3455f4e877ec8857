pub mod job;
pub mod paragraph;

pub use job::{JobEntry, JobStatus};
pub use paragraph::{Keyword, Paragraph, ParagraphId};
