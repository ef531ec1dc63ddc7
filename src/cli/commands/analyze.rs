//! Analyze Command
//!
//! Re-runs extraction over the saved raw responses and produces the
//! per-language analysis records, per-language `.py` files, and the
//! summary report. Works fully offline - extraction is deterministic,
//! so saved responses analyze identically every time.

use std::path::Path;

use console::style;

use crate::analyzer::PythonAnalyzer;
use crate::constants::artifacts;
use crate::extract::extract;
use crate::report::summarize;
use crate::storage::DataStore;
use crate::types::{AnalysisRecord, BabelError, ExtractedCode, LanguageCode, Result};

pub fn run() -> Result<()> {
    if !DataStore::is_initialized(Path::new(".")) {
        return Err(BabelError::NotInitialized);
    }

    let store = DataStore::new(Path::new("."));
    let raw_outputs = store.load_text_map(artifacts::LLM_OUTPUT_FILE)?;

    let analyzer = PythonAnalyzer::new()?;
    let mut extracted_entries: Vec<(LanguageCode, Option<String>)> = Vec::new();
    let mut records: Vec<(LanguageCode, AnalysisRecord)> = Vec::new();

    for (lang, response) in &raw_outputs {
        // A null response means no generation happened; the sanitizer is
        // never consulted for it.
        let extracted = match response {
            None => ExtractedCode::Empty,
            Some(raw) => extract(raw),
        };

        let record = analyzer.analyze(&extracted, lang);
        extracted_entries.push((lang.clone(), extracted.as_code().map(str::to_string)));
        records.push((lang.clone(), record));
    }

    store.save_text_map(artifacts::EXTRACTED_CODE_FILE, &extracted_entries)?;
    store.save_records(&records)?;

    // Prompts are only needed for .py file headers; older runs may not
    // have them on disk.
    let prompts = store
        .load_text_map(artifacts::TRANSLATED_PROMPTS_FILE)
        .unwrap_or_default();
    let written = store.save_python_files(&extracted_entries, &prompts)?;

    let report = summarize(&records);
    let rendered = report.render();
    store.save_report(&rendered)?;

    println!("{}", rendered);
    println!();
    println!(
        "{} Analyzed {} languages ({} parsed, {} errors); wrote {} .py files",
        style("✓").green(),
        report.total,
        report.with_code - report.with_errors,
        report.with_errors,
        written
    );
    println!("  Artifacts: {}", store.data_dir().display());

    Ok(())
}
