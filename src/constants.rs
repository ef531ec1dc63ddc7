//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds); local models can be slow
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum transport-level retries for transient failures
    pub const MAX_NETWORK_RETRIES: u32 = 2;
}

/// Extraction policy constants
pub mod extraction {
    /// Total generation attempts per language: the first request plus
    /// exactly one stricter retry after an empty extraction
    pub const MAX_GENERATION_ATTEMPTS: u32 = 2;
}

/// Artifact layout under the project directory
pub mod artifacts {
    pub const PROJECT_DIR: &str = ".babelcode";
    pub const DATA_DIR: &str = "data";

    pub const TRANSLATED_PROMPTS_FILE: &str = "translated_prompts.json";
    pub const LLM_OUTPUT_FILE: &str = "llm_output.json";
    pub const EXTRACTED_CODE_FILE: &str = "extracted_code.json";
    pub const ANALYSIS_FILE: &str = "ast_analysis.json";
    pub const REPORT_FILE: &str = "ast_analysis_report.txt";

    /// Directory of one runnable .py file per language
    pub const PYTHON_FILES_DIR: &str = "python_files";
}
