//! Core Data Model
//!
//! Types flowing through the extraction and analysis pipeline:
//! `ExtractedCode` (sanitizer output), `Statistics` and `Elements`
//! (analyzer output), and the three-state `AnalysisRecord`.
//!
//! Records are created once per language per run and never mutated
//! afterwards; a rerun replaces the record wholesale.

use serde::{Deserialize, Serialize};

// =============================================================================
// ExtractedCode
// =============================================================================

/// Sanitizer output for one language: either a non-empty code string or an
/// explicit "no code detected" result. Never confuse `Empty` with a missing
/// raw response - absence of a response is `Option::None` upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedCode {
    Code(String),
    Empty,
}

impl ExtractedCode {
    /// Wrap a candidate string, collapsing whitespace-only input to `Empty`.
    pub fn from_candidate(candidate: &str) -> Self {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            ExtractedCode::Empty
        } else {
            ExtractedCode::Code(trimmed.to_string())
        }
    }

    pub fn as_code(&self) -> Option<&str> {
        match self {
            ExtractedCode::Code(code) => Some(code),
            ExtractedCode::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ExtractedCode::Empty)
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Fixed set of counters recomputed from scratch on every parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub function_count: usize,
    pub class_count: usize,
    pub import_count: usize,
    pub variable_count: usize,
    pub function_call_count: usize,
    pub loop_count: usize,
    pub conditional_count: usize,
    pub string_literal_count: usize,
    pub numeric_literal_count: usize,
}

// =============================================================================
// Elements
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub args: Vec<String>,
    pub decorators: Vec<String>,
    pub has_return: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    pub args: Vec<String>,
    pub has_return: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub bases: Vec<String>,
    pub methods: Vec<MethodInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub module: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableInfo {
    pub name: String,
    /// Inferred value-kind tag: "str", "int", "list", "function_call", ...
    #[serde(rename = "type")]
    pub value_kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallInfo {
    pub name: String,
    pub args_count: usize,
    pub keywords_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopInfo {
    /// "for" or "while"
    #[serde(rename = "type")]
    pub kind: String,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalInfo {
    #[serde(rename = "type")]
    pub kind: String,
    /// Best-effort textual rendering of the test expression
    pub test: String,
}

/// Ordered descriptor lists extracted in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Elements {
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<ImportInfo>,
    pub variables: Vec<VariableInfo>,
    pub function_calls: Vec<CallInfo>,
    pub loops: Vec<LoopInfo>,
    pub conditionals: Vec<ConditionalInfo>,
}

// =============================================================================
// AnalysisRecord
// =============================================================================

/// Per-language outcome of structural analysis. Exactly one state holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RecordRepr", from = "RecordRepr")]
pub enum AnalysisRecord {
    /// No extracted code for this language
    NoCode,
    /// Extraction produced code but the structural parse failed; the
    /// repaired-but-unparsed code is kept for audit
    ParseError { message: String, code: String },
    /// Successful parse
    Parsed {
        statistics: Statistics,
        elements: Elements,
    },
}

impl AnalysisRecord {
    /// Whether the sanitizer produced any code at all for this language.
    /// A `ParseError` still counts: code existed, it just would not parse.
    pub fn has_code(&self) -> bool {
        !matches!(self, AnalysisRecord::NoCode)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisRecord::ParseError { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn statistics(&self) -> Option<&Statistics> {
        match self {
            AnalysisRecord::Parsed { statistics, .. } => Some(statistics),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&Elements> {
        match self {
            AnalysisRecord::Parsed { elements, .. } => Some(elements),
            _ => None,
        }
    }
}

/// Persisted wire shape: `{ has_code, error, statistics, elements, raw_code? }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordRepr {
    has_code: bool,
    error: Option<String>,
    #[serde(default)]
    statistics: Statistics,
    #[serde(default)]
    elements: Elements,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    raw_code: Option<String>,
}

impl From<AnalysisRecord> for RecordRepr {
    fn from(record: AnalysisRecord) -> Self {
        match record {
            AnalysisRecord::NoCode => RecordRepr {
                has_code: false,
                error: None,
                statistics: Statistics::default(),
                elements: Elements::default(),
                raw_code: None,
            },
            AnalysisRecord::ParseError { message, code } => RecordRepr {
                has_code: true,
                error: Some(message),
                statistics: Statistics::default(),
                elements: Elements::default(),
                raw_code: Some(code),
            },
            AnalysisRecord::Parsed {
                statistics,
                elements,
            } => RecordRepr {
                has_code: true,
                error: None,
                statistics,
                elements,
                raw_code: None,
            },
        }
    }
}

impl From<RecordRepr> for AnalysisRecord {
    fn from(repr: RecordRepr) -> Self {
        if !repr.has_code {
            AnalysisRecord::NoCode
        } else if let Some(message) = repr.error {
            AnalysisRecord::ParseError {
                message,
                code: repr.raw_code.unwrap_or_default(),
            }
        } else {
            AnalysisRecord::Parsed {
                statistics: repr.statistics,
                elements: repr.elements,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracted_code_collapses_whitespace() {
        assert_eq!(ExtractedCode::from_candidate("   \n\t "), ExtractedCode::Empty);
        assert_eq!(
            ExtractedCode::from_candidate("  x = 1\n"),
            ExtractedCode::Code("x = 1".to_string())
        );
    }

    #[test]
    fn test_record_roundtrip_no_code() {
        let record = AnalysisRecord::NoCode;
        let json = serde_json::to_string(&record).unwrap();
        let back: AnalysisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AnalysisRecord::NoCode);
        assert!(json.contains("\"has_code\":false"));
    }

    #[test]
    fn test_record_roundtrip_parse_error() {
        let record = AnalysisRecord::ParseError {
            message: "Syntax error at line 1, column 9".to_string(),
            code: "print(42".to_string(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AnalysisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_roundtrip_parsed() {
        let record = AnalysisRecord::Parsed {
            statistics: Statistics {
                function_count: 1,
                ..Default::default()
            },
            elements: Elements {
                functions: vec![FunctionInfo {
                    name: "add".to_string(),
                    args: vec!["a".to_string(), "b".to_string()],
                    decorators: vec![],
                    has_return: true,
                }],
                ..Default::default()
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: AnalysisRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert!(back.has_code());
        assert!(back.error().is_none());
    }
}
