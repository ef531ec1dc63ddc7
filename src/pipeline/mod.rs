//! Run Orchestration
//!
//! Drives the per-language flow: translated prompt -> generation ->
//! extraction (with the single stricter retry on an empty result) ->
//! structural analysis. Languages are processed one at a time, in the
//! order of the translation mapping, and each failure is isolated to
//! its own language - nothing here aborts the run.

use tracing::{debug, info, warn};

use crate::ai::provider::{LlmProvider, generate_with_backoff};
use crate::analyzer::PythonAnalyzer;
use crate::constants::extraction::MAX_GENERATION_ATTEMPTS;
use crate::extract::extract;
use crate::types::{AnalysisRecord, ExtractedCode, LanguageCode, Result};

/// Everything produced for one language during a run. Created exactly
/// once per language and never revisited; a rerun replaces the whole
/// value.
#[derive(Debug, Clone)]
pub struct LanguageRun {
    pub lang: LanguageCode,
    pub raw_response: Option<String>,
    pub extracted: ExtractedCode,
    pub record: AnalysisRecord,
}

pub struct Pipeline<'a> {
    provider: &'a dyn LlmProvider,
    analyzer: PythonAnalyzer,
}

impl<'a> Pipeline<'a> {
    pub fn new(provider: &'a dyn LlmProvider) -> Result<Self> {
        Ok(Self {
            provider,
            analyzer: PythonAnalyzer::new()?,
        })
    }

    /// Process every language in order. A `None` prompt short-circuits
    /// straight to `NoCode` without touching the provider or sanitizer.
    pub async fn run(&self, translations: &[(LanguageCode, Option<String>)]) -> Vec<LanguageRun> {
        let mut runs = Vec::with_capacity(translations.len());

        for (lang, prompt) in translations {
            let run = match prompt {
                None => {
                    debug!(lang = %lang, "no translated prompt, skipping generation");
                    LanguageRun {
                        lang: lang.clone(),
                        raw_response: None,
                        extracted: ExtractedCode::Empty,
                        record: AnalysisRecord::NoCode,
                    }
                }
                Some(prompt) => self.process_language(lang, prompt).await,
            };
            runs.push(run);
        }

        let parsed = runs
            .iter()
            .filter(|r| matches!(r.record, AnalysisRecord::Parsed { .. }))
            .count();
        info!(total = runs.len(), parsed, "run finished");
        runs
    }

    async fn process_language(&self, lang: &str, prompt: &str) -> LanguageRun {
        match self.generate_and_extract(prompt).await {
            Ok((raw, extracted)) => {
                let record = self.analyzer.analyze(&extracted, lang);
                LanguageRun {
                    lang: lang.to_string(),
                    raw_response: Some(raw),
                    extracted,
                    record,
                }
            }
            Err(e) => {
                // Isolated per language: log, record the absence, move on
                warn!(lang = %lang, error = %e, "generation failed");
                LanguageRun {
                    lang: lang.to_string(),
                    raw_response: None,
                    extracted: ExtractedCode::Empty,
                    record: AnalysisRecord::NoCode,
                }
            }
        }
    }

    /// Request a generation and extract code from it. On an empty
    /// extraction, exactly one more request is issued with the stricter
    /// instruction; a second empty result is accepted as final. The
    /// attempt counter is explicit state of this function, not of any
    /// module.
    pub async fn generate_and_extract(&self, prompt: &str) -> Result<(String, ExtractedCode)> {
        let mut attempt = 1;
        let mut raw = generate_with_backoff(self.provider, prompt, false).await?;
        let mut extracted = extract(&raw);

        while extracted.is_empty() && attempt < MAX_GENERATION_ATTEMPTS {
            attempt += 1;
            warn!(attempt, "extraction came back empty, retrying with strict instruction");
            raw = generate_with_backoff(self.provider, prompt, true).await?;
            extracted = extract(&raw);
        }

        Ok((raw, extracted))
    }
}

// =============================================================================
// Artifact views
// =============================================================================

/// Mapping of raw responses for persistence (null = never obtained).
pub fn raw_outputs(runs: &[LanguageRun]) -> Vec<(LanguageCode, Option<String>)> {
    runs.iter()
        .map(|r| (r.lang.clone(), r.raw_response.clone()))
        .collect()
}

/// Mapping of extracted code for persistence (null = nothing detected).
pub fn extracted_outputs(runs: &[LanguageRun]) -> Vec<(LanguageCode, Option<String>)> {
    runs.iter()
        .map(|r| (r.lang.clone(), r.extracted.as_code().map(str::to_string)))
        .collect()
}

/// Ordered record mapping for the aggregator and persistence.
pub fn analysis_records(runs: &[LanguageRun]) -> Vec<(LanguageCode, AnalysisRecord)> {
    runs.iter()
        .map(|r| (r.lang.clone(), r.record.clone()))
        .collect()
}
