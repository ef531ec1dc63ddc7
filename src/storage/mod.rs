//! Artifact Storage
//!
//! JSON artifacts under `.babelcode/data/`. Every mapping is written and
//! read in insertion order (serde_json's `preserve_order`), so reports
//! regenerated from disk keep the original language ordering.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::constants::artifacts;
use crate::types::{AnalysisRecord, BabelError, LanguageCode, Result};

pub struct DataStore {
    data_dir: PathBuf,
}

impl DataStore {
    pub fn new(root: &Path) -> Self {
        Self {
            data_dir: root.join(artifacts::PROJECT_DIR).join(artifacts::DATA_DIR),
        }
    }

    /// Create the artifact directories; idempotent.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        fs::create_dir_all(self.data_dir.join(artifacts::PYTHON_FILES_DIR))?;
        Ok(())
    }

    pub fn is_initialized(root: &Path) -> bool {
        root.join(artifacts::PROJECT_DIR).exists()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn ensure_initialized(&self) -> Result<()> {
        if !self.data_dir.exists() {
            return Err(BabelError::NotInitialized);
        }
        Ok(())
    }

    // =========================================================================
    // LanguageCode -> Option<text> mappings
    // =========================================================================

    /// Persist an ordered language map; absent values are written as
    /// JSON null, never as an empty string.
    pub fn save_text_map(
        &self,
        file_name: &str,
        entries: &[(LanguageCode, Option<String>)],
    ) -> Result<PathBuf> {
        self.ensure_initialized()?;

        let mut map = Map::with_capacity(entries.len());
        for (lang, text) in entries {
            let value = match text {
                Some(text) => Value::String(text.clone()),
                None => Value::Null,
            };
            map.insert(lang.clone(), value);
        }

        let path = self.data_dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        debug!(path = %path.display(), "saved language map");
        Ok(path)
    }

    pub fn load_text_map(&self, file_name: &str) -> Result<Vec<(LanguageCode, Option<String>)>> {
        let path = self.data_dir.join(file_name);
        if !path.exists() {
            return Err(BabelError::NotInitialized);
        }

        let map: Map<String, Value> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let mut entries = Vec::with_capacity(map.len());
        for (lang, value) in map {
            let text = match value {
                Value::String(s) => Some(s),
                Value::Null => None,
                other => {
                    warn!(lang = %lang, "unexpected value type in {}: {}", file_name, other);
                    None
                }
            };
            entries.push((lang, text));
        }
        Ok(entries)
    }

    // =========================================================================
    // Analysis records
    // =========================================================================

    pub fn save_records(
        &self,
        records: &[(LanguageCode, AnalysisRecord)],
    ) -> Result<PathBuf> {
        self.ensure_initialized()?;

        let mut map = Map::with_capacity(records.len());
        for (lang, record) in records {
            map.insert(lang.clone(), serde_json::to_value(record)?);
        }

        let path = self.data_dir.join(artifacts::ANALYSIS_FILE);
        fs::write(&path, serde_json::to_string_pretty(&Value::Object(map))?)?;
        debug!(path = %path.display(), "saved analysis records");
        Ok(path)
    }

    pub fn load_records(&self) -> Result<Vec<(LanguageCode, AnalysisRecord)>> {
        let path = self.data_dir.join(artifacts::ANALYSIS_FILE);
        if !path.exists() {
            return Err(BabelError::NotInitialized);
        }

        let map: Map<String, Value> = serde_json::from_str(&fs::read_to_string(&path)?)?;
        let mut records = Vec::with_capacity(map.len());
        for (lang, value) in map {
            records.push((lang, serde_json::from_value(value)?));
        }
        Ok(records)
    }

    // =========================================================================
    // Report + per-language source files
    // =========================================================================

    pub fn save_report(&self, rendered: &str) -> Result<PathBuf> {
        self.ensure_initialized()?;
        let path = self.data_dir.join(artifacts::REPORT_FILE);
        fs::write(&path, rendered)?;
        Ok(path)
    }

    /// Write each language's extracted code as an individual `.py` file
    /// with a provenance header. Languages without code are skipped.
    /// Returns the number of files written.
    pub fn save_python_files(
        &self,
        codes: &[(LanguageCode, Option<String>)],
        prompts: &[(LanguageCode, Option<String>)],
    ) -> Result<usize> {
        self.ensure_initialized()?;
        let dir = self.data_dir.join(artifacts::PYTHON_FILES_DIR);
        fs::create_dir_all(&dir)?;

        let mut written = 0;
        for (lang, code) in codes {
            let Some(code) = code.as_deref().filter(|c| !c.trim().is_empty()) else {
                continue;
            };

            let prompt = prompts
                .iter()
                .find(|(l, _)| l == lang)
                .and_then(|(_, p)| p.as_deref())
                .unwrap_or("Unknown prompt");

            let contents = format!(
                "# Python code generated for language: {}\n# Original prompt: {}\n\n{}\n",
                lang, prompt, code
            );
            fs::write(dir.join(format!("{}_code.py", lang)), contents)?;
            written += 1;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, DataStore) {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path());
        store.init().unwrap();
        (dir, store)
    }

    #[test]
    fn test_text_map_roundtrip_preserves_order_and_nulls() {
        let (_tmp, store) = store();
        let entries = vec![
            ("zh-CN".to_string(), Some("代码".to_string())),
            ("sw".to_string(), None),
            ("en".to_string(), Some("code".to_string())),
        ];

        store.save_text_map("llm_output.json", &entries).unwrap();
        let loaded = store.load_text_map("llm_output.json").unwrap();

        assert_eq!(loaded, entries);
    }

    #[test]
    fn test_records_roundtrip() {
        let (_tmp, store) = store();
        let records = vec![
            ("en".to_string(), AnalysisRecord::NoCode),
            (
                "fr".to_string(),
                AnalysisRecord::ParseError {
                    message: "Syntax error at line 1, column 0".to_string(),
                    code: "oops(".to_string(),
                },
            ),
        ];

        store.save_records(&records).unwrap();
        let loaded = store.load_records().unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_python_files_written_with_header() {
        let (_tmp, store) = store();
        let codes = vec![
            ("en".to_string(), Some("x = 1".to_string())),
            ("sw".to_string(), None),
        ];
        let prompts = vec![("en".to_string(), Some("Add numbers.".to_string()))];

        let written = store.save_python_files(&codes, &prompts).unwrap();
        assert_eq!(written, 1);

        let path = store
            .data_dir()
            .join(artifacts::PYTHON_FILES_DIR)
            .join("en_code.py");
        let contents = std::fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("# Python code generated for language: en"));
        assert!(contents.contains("Add numbers."));
        assert!(contents.contains("x = 1"));
    }

    #[test]
    fn test_uninitialized_store_errors() {
        let dir = TempDir::new().unwrap();
        let store = DataStore::new(dir.path());
        assert!(store.save_report("report").is_err());
        assert!(store.load_text_map("llm_output.json").is_err());
    }
}
