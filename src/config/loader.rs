//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/babelcode/config.toml)
//! 3. Project config (.babelcode/config.toml)
//! 4. Environment variables (BABELCODE_* prefix)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::constants::artifacts;
use crate::types::{BabelError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain using Figment:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. BABELCODE_LLM_MODEL -> llm.model
        figment = figment.merge(Env::prefixed("BABELCODE_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| BabelError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| BabelError::Config(format!("Configuration error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (~/.config/babelcode/)
    pub fn global_dir() -> Option<PathBuf> {
        env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| PathBuf::from(home).join(".config"))
            })
            .map(|p| p.join("babelcode"))
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(artifacts::PROJECT_DIR).join("config.toml")
    }

    /// Get project data directory
    pub fn project_dir() -> PathBuf {
        PathBuf::from(artifacts::PROJECT_DIR)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file path
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Show current effective configuration
    pub fn show_config(as_json: bool) -> Result<()> {
        let config = Self::load()?;

        if as_json {
            println!("{}", serde_json::to_string_pretty(&config)?);
        } else {
            println!(
                "{}",
                toml::to_string_pretty(&config).map_err(|e| BabelError::Config(e.to_string()))?
            );
        }

        Ok(())
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Initialize global configuration
    pub fn init_global(force: bool) -> Result<PathBuf> {
        let global_dir = Self::global_dir().ok_or_else(|| {
            BabelError::Config("Cannot determine global config directory".to_string())
        })?;

        fs::create_dir_all(&global_dir)?;

        let config_path = global_dir.join("config.toml");
        if !config_path.exists() || force {
            fs::write(&config_path, Self::default_global_config())?;
            info!("Created global config: {}", config_path.display());
        } else {
            info!("Global config exists: {}", config_path.display());
        }

        Ok(global_dir)
    }

    /// Initialize project configuration and artifact directories
    pub fn init_project() -> Result<PathBuf> {
        let project_dir = Self::project_dir();

        fs::create_dir_all(&project_dir)?;
        fs::create_dir_all(project_dir.join(artifacts::DATA_DIR))?;
        fs::create_dir_all(
            project_dir
                .join(artifacts::DATA_DIR)
                .join(artifacts::PYTHON_FILES_DIR),
        )?;

        let config_path = project_dir.join("config.toml");
        if !config_path.exists() {
            fs::write(&config_path, Self::default_project_config())?;
            info!("Created project config: {}", config_path.display());
        }

        Ok(project_dir)
    }

    /// Check if project is initialized
    pub fn is_project_initialized() -> bool {
        Self::project_dir().exists()
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default global config content (TOML)
    fn default_global_config() -> String {
        r#"# BabelCode Global Configuration
# User-wide defaults. Project settings in .babelcode/config.toml override these.

version = "1.0"

# LLM settings
[llm]
provider = "ollama"
timeout_secs = 300
temperature = 0.2

# Translation backend
[translation]
endpoint = "http://localhost:5000"
source = "en"
timeout_secs = 60
"#
        .to_string()
    }

    /// Generate default project config content (TOML)
    fn default_project_config() -> String {
        r#"# BabelCode Project Configuration
# Project-specific settings that override global defaults.

version = "1.0"

# Target languages, probed in this order
languages = [
    "en", "zh-CN", "hi", "es", "ar",
    "bn", "fr", "ru", "pt", "ur",
    "id", "de", "ja", "sw", "tr",
    "vi", "ko", "ta", "mr", "fa",
]

[llm]
provider = "ollama"
# model = "qwen3:30b-a3b"

[translation]
endpoint = "http://localhost:5000"
"#
        .to_string()
    }
}
