//! LLM Provider Abstraction
//!
//! Defines the `LlmProvider` trait for raw text generation. Providers
//! return the model's response text untouched - isolating code from the
//! noise is the extraction pipeline's job, not the transport's.

mod ollama;

pub use ollama::OllamaProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::constants::network;
use crate::types::Result;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Ask the model to generate code for `prompt` and return the raw
    /// response text. `strict` selects the sterner system instruction
    /// used for the single retry after an empty extraction.
    async fn generate(&self, prompt: &str, strict: bool) -> Result<String>;

    fn name(&self) -> &str;

    fn model(&self) -> &str;

    /// Cheap availability probe; providers should not error when the
    /// backend is merely down.
    async fn health_check(&self) -> Result<bool>;
}

/// Configuration for LLM providers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider type; only "ollama" is currently implemented
    pub provider: String,
    /// Model name (provider-specific)
    pub model: Option<String>,
    /// API base URL
    pub api_base: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Temperature for generation (0.0 = deterministic)
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: None,
            api_base: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: 0.2,
        }
    }
}

/// Create a provider from configuration.
pub fn create_provider(config: ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config.provider.as_str() {
        "ollama" => Ok(Box::new(OllamaProvider::new(config)?)),
        other => Err(crate::types::BabelError::Config(format!(
            "Unknown LLM provider: {}",
            other
        ))),
    }
}

/// Call `generate` with bounded exponential backoff on transient
/// transport failures. This is transport-level resilience only; the
/// empty-extraction retry is a separate single-shot policy owned by the
/// pipeline.
pub async fn generate_with_backoff(
    provider: &dyn LlmProvider,
    prompt: &str,
    strict: bool,
) -> Result<String> {
    let mut delay = Duration::from_millis(network::BASE_DELAY_MS);
    let mut attempt = 0;

    loop {
        match provider.generate(prompt, strict).await {
            Ok(text) => return Ok(text),
            Err(e) if e.is_transient() && attempt < network::MAX_NETWORK_RETRIES => {
                attempt += 1;
                warn!(
                    provider = provider.name(),
                    attempt,
                    wait_ms = delay.as_millis() as u64,
                    error = %e,
                    "transient provider error, backing off"
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BabelError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        failures: AtomicUsize,
    }

    #[async_trait]
    impl LlmProvider for FlakyProvider {
        async fn generate(&self, _prompt: &str, _strict: bool) -> Result<String> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(BabelError::LlmApi("server returned 503".to_string()));
            }
            Ok("```python\nx = 1\n```".to_string())
        }

        fn name(&self) -> &str {
            "flaky"
        }

        fn model(&self) -> &str {
            "test"
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_backoff_recovers_from_transient_errors() {
        let provider = FlakyProvider {
            failures: AtomicUsize::new(1),
        };
        let out = generate_with_backoff(&provider, "prompt", false).await.unwrap();
        assert!(out.contains("x = 1"));
    }

    #[tokio::test]
    async fn test_backoff_gives_up_eventually() {
        let provider = FlakyProvider {
            failures: AtomicUsize::new(10),
        };
        assert!(generate_with_backoff(&provider, "prompt", false).await.is_err());
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let config = ProviderConfig {
            provider: "gpt-web".to_string(),
            ..Default::default()
        };
        assert!(create_provider(config).is_err());
    }
}
