//! LLM Integration
//!
//! Provider abstraction over the inference backend. The pipeline only
//! sees raw response text; everything clever happens in `extract`.

pub mod provider;

pub use provider::{LlmProvider, OllamaProvider, ProviderConfig, create_provider, generate_with_backoff};
