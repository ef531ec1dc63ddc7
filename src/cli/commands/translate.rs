//! Translate Command
//!
//! Translates the base prompt into every configured target language and
//! persists the ordered mapping. Languages whose translation fails are
//! saved as null and stay in the run.

use std::path::Path;

use console::style;

use crate::config::{Config, ConfigLoader};
use crate::constants::artifacts;
use crate::storage::DataStore;
use crate::translate::{HttpTranslator, translate_all};
use crate::types::{BabelError, LanguageCode, Result};

pub async fn run(prompt: String) -> Result<()> {
    if !DataStore::is_initialized(Path::new(".")) {
        return Err(BabelError::NotInitialized);
    }

    let config = ConfigLoader::load()?;
    let store = DataStore::new(Path::new("."));
    store.init()?;

    let translations = translate_prompt(&config, &prompt).await?;
    let missing = translations.iter().filter(|(_, t)| t.is_none()).count();

    let path = store.save_text_map(artifacts::TRANSLATED_PROMPTS_FILE, &translations)?;

    println!(
        "{} Translated prompt into {} languages ({} unavailable)",
        style("✓").green(),
        translations.len() - missing,
        missing
    );
    println!("  Saved: {}", path.display());

    Ok(())
}

/// Translate the prompt for every configured language, in config order.
pub async fn translate_prompt(
    config: &Config,
    prompt: &str,
) -> Result<Vec<(LanguageCode, Option<String>)>> {
    let translator = HttpTranslator::new(
        &config.translation.endpoint,
        &config.translation.source,
        config.translation.api_key.clone(),
        config.translation.timeout_secs,
    )?;

    Ok(translate_all(&translator, prompt, &config.languages).await)
}
