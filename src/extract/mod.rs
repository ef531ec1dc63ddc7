//! Code Extraction
//!
//! Two-stage isolation of code from noisy model output: the sanitizer's
//! fallback ladder picks the best-effort code string, and the repairer
//! clears superficial syntax artifacts before structural parsing.

pub mod fence;
pub mod repair;
pub mod sanitize;

pub use fence::fenced_blocks;
pub use repair::repair;
pub use sanitize::extract;
