//! Prompt Translation
//!
//! Collaborator that turns the base English prompt into one translated
//! prompt per configured target language. Per-language failures become
//! `None` entries - a missing translation is a valid terminal state for
//! that language, never a reason to abort the run.

use std::sync::LazyLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::types::{BabelError, LanguageCode, Result};

static SENTENCE_PUNCT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])(\S)").expect("valid regex"));
static MULTI_SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("valid regex"));

/// Ensure a single space after sentence-ending punctuation and collapse
/// runs of whitespace. Machine translation backends mangle cramped
/// punctuation, so the prompt is normalized before every translation.
pub fn normalize_text(text: &str) -> String {
    let spaced = SENTENCE_PUNCT_RE.replace_all(text, "$1 $2");
    MULTI_SPACE_RE.replace_all(&spaced, " ").trim().to_string()
}

#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` into the `target` locale.
    async fn translate(&self, text: &str, target: &str) -> Result<String>;

    fn name(&self) -> &str;
}

/// Translate the prompt into every target language in order.
///
/// The output vector preserves the configured language order exactly;
/// this ordering flows through extraction, analysis, and the final
/// report unchanged.
pub async fn translate_all(
    translator: &dyn Translator,
    prompt: &str,
    targets: &[LanguageCode],
) -> Vec<(LanguageCode, Option<String>)> {
    let normalized = normalize_text(prompt);
    let mut translations = Vec::with_capacity(targets.len());

    for lang in targets {
        match translator.translate(&normalized, lang).await {
            Ok(text) => {
                debug!(lang = %lang, "translated prompt");
                translations.push((lang.clone(), Some(text)));
            }
            Err(e) => {
                warn!(lang = %lang, error = %e, "translation failed");
                translations.push((lang.clone(), None));
            }
        }
    }

    info!(
        total = translations.len(),
        missing = translations.iter().filter(|(_, t)| t.is_none()).count(),
        "prompt translation finished"
    );
    translations
}

// =============================================================================
// HTTP Translator (LibreTranslate-compatible)
// =============================================================================

pub struct HttpTranslator {
    endpoint: String,
    source: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl HttpTranslator {
    pub fn new(
        endpoint: &str,
        source: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let endpoint = validate_endpoint(endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BabelError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint,
            source: source.to_string(),
            api_key: api_key.map(SecretString::from),
            client,
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String> {
        let url = format!("{}/translate", self.endpoint);
        let request = TranslateRequest {
            q: text,
            source: &self.source,
            target,
            format: "text",
            api_key: self.api_key.as_ref().map(|k| k.expose_secret().to_string()),
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BabelError::Translation {
                lang: target.to_string(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BabelError::Translation {
                lang: target.to_string(),
                message: format!("backend returned {}: {}", status, body),
            });
        }

        let body: TranslateResponse =
            response.json().await.map_err(|e| BabelError::Translation {
                lang: target.to_string(),
                message: format!("malformed response: {}", e),
            })?;

        Ok(body.translated_text)
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}

/// Only http/https endpoints are accepted; a non-localhost host gets a
/// warning since translation backends are usually self-hosted here.
fn validate_endpoint(endpoint: &str) -> Result<String> {
    let parsed = url::Url::parse(endpoint).map_err(|e| {
        BabelError::Config(format!("Invalid translation endpoint '{}': {}", endpoint, e))
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BabelError::Config(format!(
            "Translation endpoint must use http or https scheme, got: {}",
            parsed.scheme()
        )));
    }

    if let Some(host) = parsed.host_str()
        && !matches!(host, "localhost" | "127.0.0.1" | "::1")
    {
        warn!(
            "Translation endpoint is not localhost: {}. Ensure this is intentional.",
            host
        );
    }

    let mut result = parsed.to_string();
    if result.ends_with('/') {
        result.pop();
    }
    Ok(result)
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}
