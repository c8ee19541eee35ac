//! Persisted language preference.
//!
//! A single string stored under the well-known key `"language"`. Storage
//! failures are never fatal: callers log them and carry on with in-memory
//! state for the rest of the session.

use crate::i18n::Language;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Storage key holding the last selected language code.
pub const PREFERENCE_KEY: &str = "language";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read preferences from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("preferences file {path} is not a JSON object")]
    Corrupt { path: String },
}

/// Key-value storage for the language preference.
pub trait PreferenceStore: Send + Sync {
    /// Raw stored value, if any. Validation is the caller's job.
    fn get(&self) -> Result<Option<String>, PersistenceError>;

    fn set(&self, language: Language) -> Result<(), PersistenceError>;
}

/// Parse a stored value, falling back to the default language when the value
/// is absent or not a supported code.
pub fn preferred_language(stored: Option<&str>) -> Language {
    stored
        .and_then(|code| Language::from_code(code).ok())
        .unwrap_or_else(Language::default_language)
}

/// Preference kept in memory only.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    value: Mutex<Option<String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a raw value, valid or not.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self) -> Result<Option<String>, PersistenceError> {
        Ok(self
            .value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn set(&self, language: Language) -> Result<(), PersistenceError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(language.code().to_string());
        Ok(())
    }
}

/// Preference stored in a JSON object file, alongside any other keys the
/// file already holds.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>, PersistenceError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(object)) => Ok(object),
            _ => Err(PersistenceError::Corrupt {
                path: self.path.display().to_string(),
            }),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self) -> Result<Option<String>, PersistenceError> {
        let object = self.read_object()?;
        Ok(object
            .get(PREFERENCE_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&self, language: Language) -> Result<(), PersistenceError> {
        // A corrupt file is replaced rather than blocking every future write.
        let mut object = self.read_object().unwrap_or_default();
        object.insert(
            PREFERENCE_KEY.to_string(),
            Value::String(language.code().to_string()),
        );

        let write_error = |source| PersistenceError::Write {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }

        let content = serde_json::to_string_pretty(&Value::Object(object))
            .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        std::fs::write(&self.path, content).map_err(write_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_preferred_language_defaults_to_arabic() {
        assert_eq!(preferred_language(None), Language::Arabic);
        assert_eq!(preferred_language(Some("fr")), Language::Arabic);
        assert_eq!(preferred_language(Some("")), Language::Arabic);
        assert_eq!(preferred_language(Some("en")), Language::English);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set(Language::English).unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FilePreferenceStore::new(dir.path().join("prefs.json"));
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn test_file_store_creates_parent_and_preserves_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, r#"{"sound": "on"}"#).unwrap();

        let store = FilePreferenceStore::new(&path);
        store.set(Language::English).unwrap();

        let saved: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["language"], "en");
        assert_eq!(saved["sound"], "on");
        assert_eq!(store.get().unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FilePreferenceStore::new(&path);
        assert!(matches!(store.get(), Err(PersistenceError::Corrupt { .. })));

        store.set(Language::Arabic).unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("ar"));
    }
}
