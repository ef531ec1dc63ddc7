//! BabelCode - Cross-Lingual Code Generation Probe
//!
//! Translates one prompt into many natural languages, asks a local LLM
//! to write Python for each, then robustly isolates and statically
//! analyzes the code that comes back.
//!
//! ## Core Pipeline
//!
//! - **Extraction**: fallback ladder over noisy model output (reasoning
//!   regions, prose, multiple fences, partial syntax)
//! - **Repair**: bounded heuristic fixes to maximize successful parses
//! - **Analysis**: tree-sitter walk producing per-language statistics
//!   and element lists
//! - **Aggregation**: cross-language summary report in stable order
//!
//! ## Quick Start
//!
//! ```ignore
//! use babelcode::pipeline::Pipeline;
//! use babelcode::ai::provider::{OllamaProvider, ProviderConfig};
//!
//! let provider = OllamaProvider::new(ProviderConfig::default())?;
//! let pipeline = Pipeline::new(&provider)?;
//! let runs = pipeline.run(&translations).await;
//! ```
//!
//! ## Modules
//!
//! - [`extract`]: fence scanning, response sanitizing, code repair
//! - [`analyzer`]: tree-sitter structural analysis
//! - [`report`]: cross-language aggregation
//! - [`translate`], [`ai`]: HTTP collaborators
//! - [`pipeline`], [`storage`], [`config`], [`cli`]: orchestration

pub mod ai;
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod constants;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod storage;
pub mod translate;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::{AnalysisRecord, BabelError, ExtractedCode, LanguageCode, Result, Statistics};

pub use analyzer::PythonAnalyzer;
pub use extract::{extract, fenced_blocks, repair};
pub use pipeline::{LanguageRun, Pipeline};
pub use report::{SummaryReport, summarize};
pub use storage::DataStore;
