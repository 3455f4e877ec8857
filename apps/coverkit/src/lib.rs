// Cover letter tailoring core.
// Implements: keyword matching, posting highlighting, cover letter assembly,
// reversible paragraph edits and the JSON snapshot boundary.

pub mod config;
pub mod errors;
pub mod letter;
pub mod matching;
pub mod models;
pub mod session;
pub mod site_rules;
pub mod state;
pub mod storage;
pub mod tracker;
