//! Generate Command
//!
//! Loads the saved translated prompts, queries the LLM for each
//! language, and persists both the raw responses and the extracted
//! code. Analysis is the `analyze` command's job.

use std::path::Path;

use console::style;
use tracing::warn;

use crate::ai::provider::create_provider;
use crate::config::ConfigLoader;
use crate::constants::artifacts;
use crate::pipeline::{Pipeline, extracted_outputs, raw_outputs};
use crate::storage::DataStore;
use crate::types::{BabelError, Result};

pub async fn run() -> Result<()> {
    if !DataStore::is_initialized(Path::new(".")) {
        return Err(BabelError::NotInitialized);
    }

    let config = ConfigLoader::load()?;
    let store = DataStore::new(Path::new("."));

    let translations = store.load_text_map(artifacts::TRANSLATED_PROMPTS_FILE)?;

    let provider = create_provider(config.provider_config())?;
    if !provider.health_check().await? {
        warn!("provider health check failed; attempting generation anyway");
    }

    let pipeline = Pipeline::new(provider.as_ref())?;
    let runs = pipeline.run(&translations).await;

    store.save_text_map(artifacts::LLM_OUTPUT_FILE, &raw_outputs(&runs))?;
    let extracted = extracted_outputs(&runs);
    let with_code = extracted.iter().filter(|(_, c)| c.is_some()).count();
    store.save_text_map(artifacts::EXTRACTED_CODE_FILE, &extracted)?;

    println!(
        "{} Generated responses for {} languages ({} with extractable code)",
        style("✓").green(),
        runs.len(),
        with_code
    );
    println!("  Next: babelcode analyze");

    Ok(())
}
