//! Init Command
//!
//! Creates the `.babelcode/` project directory, artifact folders, and a
//! default project config.

use std::fs;

use console::style;

use crate::config::ConfigLoader;
use crate::types::Result;

pub fn run(force: bool) -> Result<()> {
    let config_path = ConfigLoader::project_config_path();

    if force && config_path.exists() {
        fs::remove_file(&config_path)?;
    }

    let project_dir = ConfigLoader::init_project()?;

    println!(
        "{} Initialized BabelCode in {}",
        style("✓").green(),
        project_dir.display()
    );
    println!("  Config: {}", config_path.display());
    println!("  Next: babelcode run \"<your prompt>\"");

    Ok(())
}
