//! Report Command
//!
//! Regenerates the textual summary report from the saved analysis
//! records. The report is always a fresh reduction, never an in-place
//! update.

use std::path::Path;

use crate::constants::artifacts;
use crate::report::summarize;
use crate::storage::DataStore;
use crate::types::{BabelError, Result};

pub fn run(as_json: bool) -> Result<()> {
    if !DataStore::is_initialized(Path::new(".")) {
        return Err(BabelError::NotInitialized);
    }

    let store = DataStore::new(Path::new("."));
    let records = store.load_records()?;
    let report = summarize(&records);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let rendered = report.render();
    store.save_report(&rendered)?;
    println!("{}", rendered);

    Ok(())
}
