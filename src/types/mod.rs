//! Shared Types
//!
//! Core data model and the unified error type.

pub mod error;
pub mod record;

pub use error::{BabelError, Result};
pub use record::{
    AnalysisRecord, CallInfo, ClassInfo, ConditionalInfo, Elements, ExtractedCode, FunctionInfo,
    ImportInfo, LoopInfo, MethodInfo, Statistics, VariableInfo,
};

/// Opaque per-language identifier (a locale tag such as "en" or "zh-CN").
/// Unique within a run; the configured target-language list fixes the
/// insertion order that every downstream mapping and report preserves.
pub type LanguageCode = String;
