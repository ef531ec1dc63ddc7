//! Config Command
//!
//! Show, locate, and initialize configuration files.

use crate::config::ConfigLoader;
use crate::types::Result;

pub fn show(as_json: bool) -> Result<()> {
    ConfigLoader::show_config(as_json)
}

pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

pub fn init(global: bool, force: bool) -> Result<()> {
    if global {
        let dir = ConfigLoader::init_global(force)?;
        println!("Global config initialized: {}", dir.display());
    } else {
        let dir = ConfigLoader::init_project()?;
        println!("Project config initialized: {}", dir.display());
    }
    Ok(())
}
