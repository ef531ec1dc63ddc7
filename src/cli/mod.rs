//! Command-Line Interface
//!
//! Thin wrappers over the pipeline, storage, and config layers.

pub mod commands;

use std::io::{self, Write};

use crate::types::{BabelError, Result};

/// Resolve the base prompt: the CLI argument wins, otherwise ask on
/// stdin like the interactive flow users expect.
pub fn resolve_prompt(arg: Option<String>) -> Result<String> {
    if let Some(prompt) = arg {
        let prompt = prompt.trim().to_string();
        if !prompt.is_empty() {
            return Ok(prompt);
        }
    }

    eprint!("Enter the base prompt (in English): ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    let prompt = line.trim().to_string();

    if prompt.is_empty() {
        return Err(BabelError::Config("Empty prompt; aborting".to_string()));
    }
    Ok(prompt)
}
