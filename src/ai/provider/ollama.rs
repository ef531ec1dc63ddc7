//! Ollama Local LLM Provider
//!
//! Posts translated prompts to a locally-running Ollama instance and
//! returns the raw response text for downstream extraction.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{LlmProvider, ProviderConfig};
use crate::types::{BabelError, Result};

const DEFAULT_API_BASE: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "qwen3:30b-a3b";

/// System instruction for the first generation attempt.
const SYSTEM_PROMPT: &str = "You are a code generator. Always respond with only the code in a \
     Python fenced code block. No explanation. No thinking steps.";

/// Sterner instruction for the single retry after an empty extraction.
const STRICT_SYSTEM_PROMPT: &str = "/no_think You are a code generator. Output ONLY valid Python code \
     inside a single fenced code block. Do not include any explanation, \
     reasoning, or text outside the code block.";

pub struct OllamaProvider {
    api_base: String,
    model: String,
    temperature: f32,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let api_base = config
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let api_base = Self::validate_endpoint(&api_base)?;

        let model = config.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BabelError::LlmApi(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            api_base,
            model,
            temperature: config.temperature,
            client,
        })
    }

    /// Validate endpoint URL for security (SSRF prevention)
    ///
    /// Only allows http/https schemes and warns for non-localhost endpoints.
    fn validate_endpoint(endpoint: &str) -> Result<String> {
        let url = url::Url::parse(endpoint).map_err(|e| {
            BabelError::Config(format!("Invalid Ollama endpoint URL '{}': {}", endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(BabelError::Config(format!(
                "Ollama endpoint must use http or https scheme, got: {}",
                url.scheme()
            )));
        }

        if let Some(host) = url.host_str()
            && !matches!(host, "localhost" | "127.0.0.1" | "::1")
        {
            warn!(
                "Ollama endpoint is not localhost: {}. Ensure this is intentional.",
                host
            );
        }

        let mut result = url.to_string();
        if result.ends_with('/') {
            result.pop();
        }
        Ok(result)
    }

    fn build_request<'a>(&'a self, prompt: &'a str, strict: bool) -> OllamaRequest<'a> {
        OllamaRequest {
            model: &self.model,
            prompt,
            system: if strict {
                STRICT_SYSTEM_PROMPT
            } else {
                SYSTEM_PROMPT
            },
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn generate(&self, prompt: &str, strict: bool) -> Result<String> {
        debug!(
            model = %self.model,
            strict,
            "sending generation request to Ollama"
        );

        let start_time = Instant::now();
        let request = self.build_request(prompt, strict);
        let url = format!("{}/api/generate", self.api_base);

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    BabelError::LlmApi(format!(
                        "Failed to connect to Ollama at {}. Is Ollama running? Start with: ollama serve",
                        self.api_base
                    ))
                } else {
                    BabelError::LlmApi(format!("Ollama request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BabelError::LlmApi(format!(
                "Ollama API error ({}): {}",
                status, body
            )));
        }

        let body: OllamaResponse = response
            .json()
            .await
            .map_err(|e| BabelError::LlmApi(format!("Failed to parse Ollama response: {}", e)))?;

        debug!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            prompt_tokens = body.prompt_eval_count.unwrap_or(0),
            output_tokens = body.eval_count.unwrap_or(0),
            "received response from Ollama"
        );

        Ok(body.response)
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.api_base);

        let response = self.client.get(&url).send().await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                if let Ok(tags) = resp.json::<OllamaTagsResponse>().await {
                    let model_available = tags.models.iter().any(|m| {
                        m.name == self.model
                            || m.name.starts_with(&self.model.replace(":latest", ""))
                    });

                    if model_available {
                        info!("Ollama is available with model: {}", self.model);
                        Ok(true)
                    } else {
                        warn!(
                            "Ollama is running but model '{}' not found. Pull with: ollama pull {}",
                            self.model, self.model
                        );
                        Ok(false)
                    }
                } else {
                    info!("Ollama is available");
                    Ok(true)
                }
            }
            Ok(resp) => {
                warn!("Ollama API check failed: {}", resp.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Ollama not available: {}. Start with: ollama serve", e);
                Ok(false)
            }
        }
    }
}

// Request/Response types

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProviderConfig::default();
        let provider = OllamaProvider::new(config).expect("Failed to create provider");
        assert_eq!(provider.api_base, DEFAULT_API_BASE);
        assert_eq!(provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_invalid_scheme_rejected() {
        let config = ProviderConfig {
            api_base: Some("file:///etc/passwd".to_string()),
            ..Default::default()
        };
        assert!(OllamaProvider::new(config).is_err());
    }

    #[test]
    fn test_strict_flag_selects_sterner_instruction() {
        let provider = OllamaProvider::new(ProviderConfig::default()).unwrap();
        let normal = provider.build_request("p", false);
        let strict = provider.build_request("p", true);
        assert_ne!(normal.system, strict.system);
        assert!(strict.system.contains("ONLY"));
    }
}
