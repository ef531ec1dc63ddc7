//! Structural Analysis
//!
//! Tree-sitter based analysis of extracted code. Python is the single
//! target grammar; analysis of other source languages is out of scope.

pub mod python;

pub use python::PythonAnalyzer;
