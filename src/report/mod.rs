//! Cross-Language Summary Report
//!
//! Pure reduction of the per-language record mapping into overall counts
//! plus one rendered block per language. The report is always derived
//! last and rebuilt from scratch - it owns nothing and is never updated
//! in place.

use serde::Serialize;

use crate::types::{AnalysisRecord, LanguageCode, Statistics};

const RULE_HEAVY: &str =
    "============================================================";
const RULE_LIGHT: &str = "----------------------------------------";

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub total: usize,
    pub with_code: usize,
    pub with_errors: usize,
    pub languages: Vec<LanguageSummary>,
}

/// One language's contribution to the report, in insertion order.
#[derive(Debug, Clone, Serialize)]
pub struct LanguageSummary {
    pub lang: LanguageCode,
    pub has_code: bool,
    pub error: Option<String>,
    pub statistics: Option<Statistics>,
    pub function_names: Vec<String>,
    pub class_names: Vec<String>,
}

/// Fold the ordered record mapping into a `SummaryReport`.
pub fn summarize(records: &[(LanguageCode, AnalysisRecord)]) -> SummaryReport {
    let total = records.len();
    let with_code = records.iter().filter(|(_, r)| r.has_code()).count();
    let with_errors = records.iter().filter(|(_, r)| r.error().is_some()).count();

    let languages = records
        .iter()
        .map(|(lang, record)| LanguageSummary {
            lang: lang.clone(),
            has_code: record.has_code(),
            error: record.error().map(str::to_string),
            statistics: record.statistics().cloned(),
            function_names: record
                .elements()
                .map(|e| e.functions.iter().map(|f| f.name.clone()).collect())
                .unwrap_or_default(),
            class_names: record
                .elements()
                .map(|e| e.classes.iter().map(|c| c.name.clone()).collect())
                .unwrap_or_default(),
        })
        .collect();

    SummaryReport {
        total,
        with_code,
        with_errors,
        languages,
    }
}

impl SummaryReport {
    /// Render the textual report: header, overall counts, then one block
    /// per language in mapping order.
    pub fn render(&self) -> String {
        let mut out = Vec::new();

        out.push(RULE_HEAVY.to_string());
        out.push("PYTHON CODE ANALYSIS SUMMARY REPORT".to_string());
        out.push(RULE_HEAVY.to_string());
        out.push(String::new());
        out.push(format!("Total languages analyzed: {}", self.total));
        out.push(format!("Languages with valid code: {}", self.with_code));
        out.push(format!("Languages with parsing errors: {}", self.with_errors));
        out.push(String::new());
        out.push("PER-LANGUAGE SUMMARY:".to_string());
        out.push(RULE_LIGHT.to_string());

        for summary in &self.languages {
            out.push(String::new());
            out.push(format!("{}:", summary.lang.to_uppercase()));

            if !summary.has_code {
                out.push("  No code provided".to_string());
                continue;
            }

            if let Some(error) = &summary.error {
                out.push(format!("  Error: {}", error));
                continue;
            }

            if let Some(stats) = &summary.statistics {
                out.push(format!("  Functions: {}", stats.function_count));
                out.push(format!("  Classes: {}", stats.class_count));
                out.push(format!("  Imports: {}", stats.import_count));
                out.push(format!("  Variables: {}", stats.variable_count));
                out.push(format!("  Function calls: {}", stats.function_call_count));
                out.push(format!("  Loops: {}", stats.loop_count));
            }

            if !summary.function_names.is_empty() {
                out.push(format!(
                    "  Function names: {}",
                    summary.function_names.join(", ")
                ));
            }
            if !summary.class_names.is_empty() {
                out.push(format!("  Class names: {}", summary.class_names.join(", ")));
            }
        }

        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Elements, FunctionInfo};

    fn parsed_record(function_names: &[&str]) -> AnalysisRecord {
        AnalysisRecord::Parsed {
            statistics: Statistics {
                function_count: function_names.len(),
                ..Default::default()
            },
            elements: Elements {
                functions: function_names
                    .iter()
                    .map(|n| FunctionInfo {
                        name: n.to_string(),
                        args: vec![],
                        decorators: vec![],
                        has_return: false,
                    })
                    .collect(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_counts() {
        let records = vec![
            ("en".to_string(), parsed_record(&["add"])),
            (
                "fr".to_string(),
                AnalysisRecord::ParseError {
                    message: "Syntax error at line 1, column 0".to_string(),
                    code: "print(".to_string(),
                },
            ),
            ("sw".to_string(), AnalysisRecord::NoCode),
        ];

        let report = summarize(&records);
        assert_eq!(report.total, 3);
        // A parse error still means code was produced
        assert_eq!(report.with_code, 2);
        assert_eq!(report.with_errors, 1);
    }

    #[test]
    fn test_absent_response_counts_in_total_only() {
        let records = vec![("ja".to_string(), AnalysisRecord::NoCode)];
        let report = summarize(&records);
        assert_eq!(report.total, 1);
        assert_eq!(report.with_code, 0);
        assert_eq!(report.with_errors, 0);
    }

    #[test]
    fn test_render_preserves_insertion_order() {
        let records = vec![
            ("zh-CN".to_string(), parsed_record(&["f"])),
            ("en".to_string(), parsed_record(&["g"])),
        ];
        let text = summarize(&records).render();
        let zh = text.find("ZH-CN:").unwrap();
        let en = text.find("EN:").unwrap();
        assert!(zh < en);
    }

    #[test]
    fn test_render_blocks() {
        let records = vec![
            ("en".to_string(), parsed_record(&["add", "sub"])),
            ("ar".to_string(), AnalysisRecord::NoCode),
            (
                "de".to_string(),
                AnalysisRecord::ParseError {
                    message: "Syntax error at line 2, column 4".to_string(),
                    code: String::new(),
                },
            ),
        ];
        let text = summarize(&records).render();

        assert!(text.contains("Total languages analyzed: 3"));
        assert!(text.contains("Function names: add, sub"));
        assert!(text.contains("No code provided"));
        assert!(text.contains("Error: Syntax error at line 2, column 4"));
    }

    #[test]
    fn test_summarize_is_pure() {
        let records = vec![("en".to_string(), parsed_record(&["f"]))];
        let first = summarize(&records).render();
        let second = summarize(&records).render();
        assert_eq!(first, second);
    }
}
