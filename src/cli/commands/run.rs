//! Run Command
//!
//! End-to-end pipeline: translate the prompt, query the LLM per
//! language, extract and analyze the code, persist every artifact, and
//! print the summary report.

use std::path::Path;

use console::style;
use tracing::warn;

use crate::ai::provider::create_provider;
use crate::config::ConfigLoader;
use crate::constants::artifacts;
use crate::pipeline::{Pipeline, analysis_records, extracted_outputs, raw_outputs};
use crate::report::summarize;
use crate::storage::DataStore;
use crate::types::{BabelError, Result};

use super::translate::translate_prompt;

pub async fn run(prompt: String) -> Result<()> {
    if !DataStore::is_initialized(Path::new(".")) {
        return Err(BabelError::NotInitialized);
    }

    let config = ConfigLoader::load()?;
    let store = DataStore::new(Path::new("."));
    store.init()?;

    // 1) Translate
    println!("Translating prompt into {} languages...", config.languages.len());
    let translations = translate_prompt(&config, &prompt).await?;
    store.save_text_map(artifacts::TRANSLATED_PROMPTS_FILE, &translations)?;

    // 2) Generate + extract + analyze, one language at a time
    let provider = create_provider(config.provider_config())?;
    if !provider.health_check().await? {
        warn!("provider health check failed; attempting generation anyway");
    }

    println!(
        "Querying {} ({}) per language...",
        provider.name(),
        provider.model()
    );
    let pipeline = Pipeline::new(provider.as_ref())?;
    let runs = pipeline.run(&translations).await;

    // 3) Persist artifacts
    store.save_text_map(artifacts::LLM_OUTPUT_FILE, &raw_outputs(&runs))?;
    let extracted = extracted_outputs(&runs);
    store.save_text_map(artifacts::EXTRACTED_CODE_FILE, &extracted)?;
    store.save_python_files(&extracted, &translations)?;

    let records = analysis_records(&runs);
    store.save_records(&records)?;

    // 4) Report
    let report = summarize(&records);
    let rendered = report.render();
    store.save_report(&rendered)?;

    println!();
    println!("{}", rendered);
    println!();
    println!(
        "{} Pipeline complete: {}/{} languages produced parseable code",
        style("✓").green(),
        report.with_code - report.with_errors,
        report.total
    );
    println!("  Artifacts: {}", store.data_dir().display());

    Ok(())
}
