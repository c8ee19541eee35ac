//! Translation loaders: fetch the catalog for one language.
//!
//! Every language has exactly one catalog resource named after its code
//! (`ar.json`, `en.json`) under a common root, which is either a URL prefix
//! or a directory. Loaders never retry; a failed load is handed back to the
//! caller, who decides whether to keep the previous catalog.

use crate::i18n::{Language, MappingError, TranslationMapping};
use futures::future::{self, BoxFuture, FutureExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a catalog could not be produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch '{language}' catalog from {location}: {message}")]
    Unavailable {
        language: Language,
        location: String,
        message: String,
    },

    #[error("'{language}' catalog at {location} returned HTTP {status}")]
    Status {
        language: Language,
        location: String,
        status: u16,
    },

    #[error("'{language}' catalog at {location} is malformed: {source}")]
    Malformed {
        language: Language,
        location: String,
        #[source]
        source: MappingError,
    },

    #[error("loading '{language}' catalog timed out after {timeout:?}")]
    Timeout { language: Language, timeout: Duration },

    #[error("no catalog registered for '{0}'")]
    Missing(Language),
}

impl LoadError {
    pub fn language(&self) -> Language {
        match self {
            LoadError::Unavailable { language, .. }
            | LoadError::Status { language, .. }
            | LoadError::Malformed { language, .. }
            | LoadError::Timeout { language, .. } => *language,
            LoadError::Missing(language) => *language,
        }
    }
}

/// Produces the catalog for a language.
///
/// Loading is the only suspend point in the translation runtime.
pub trait TranslationLoader: Send + Sync {
    fn load(&self, language: Language) -> BoxFuture<'_, Result<TranslationMapping, LoadError>>;
}

/// File name of a language's catalog resource.
pub fn catalog_file_name(language: Language) -> String {
    format!("{}.json", language.code())
}

/// Fetches catalogs over HTTP from `{base_url}/{code}.json`.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLoader {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn catalog_url(&self, language: Language) -> String {
        format!("{}/{}", self.base_url, catalog_file_name(language))
    }

    async fn fetch(&self, language: Language) -> Result<TranslationMapping, LoadError> {
        let url = self.catalog_url(language);
        debug!("Fetching '{}' catalog from {}", language, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            LoadError::Unavailable {
                language,
                location: url.clone(),
                message: e.to_string(),
            }
        })?;

        if !response.status().is_success() {
            return Err(LoadError::Status {
                language,
                location: url,
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| LoadError::Unavailable {
            language,
            location: url.clone(),
            message: e.to_string(),
        })?;

        TranslationMapping::from_json_str(&body).map_err(|source| LoadError::Malformed {
            language,
            location: url,
            source,
        })
    }
}

impl TranslationLoader for HttpLoader {
    fn load(&self, language: Language) -> BoxFuture<'_, Result<TranslationMapping, LoadError>> {
        self.fetch(language).boxed()
    }
}

/// Reads catalogs from `{dir}/{code}.json`.
#[derive(Debug, Clone)]
pub struct FileLoader {
    dir: PathBuf,
}

impl FileLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog_path(&self, language: Language) -> PathBuf {
        self.dir.join(catalog_file_name(language))
    }

    async fn read(&self, language: Language) -> Result<TranslationMapping, LoadError> {
        let path = self.catalog_path(language);
        debug!("Reading '{}' catalog from {}", language, path.display());

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| LoadError::Unavailable {
                language,
                location: path.display().to_string(),
                message: e.to_string(),
            })?;

        TranslationMapping::from_json_str(&content).map_err(|source| LoadError::Malformed {
            language,
            location: path.display().to_string(),
            source,
        })
    }
}

impl TranslationLoader for FileLoader {
    fn load(&self, language: Language) -> BoxFuture<'_, Result<TranslationMapping, LoadError>> {
        self.read(language).boxed()
    }
}

/// Serves catalogs held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticLoader {
    catalogs: HashMap<Language, TranslationMapping>,
}

const BUNDLED_AR: &str = include_str!("../../translations/ar.json");
const BUNDLED_EN: &str = include_str!("../../translations/en.json");

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, language: Language, mapping: TranslationMapping) -> Self {
        self.catalogs.insert(language, mapping);
        self
    }

    /// Loader over the catalogs compiled into the binary.
    pub fn bundled() -> Result<Self, LoadError> {
        let mut loader = Self::new();
        for (language, content) in [(Language::Arabic, BUNDLED_AR), (Language::English, BUNDLED_EN)] {
            let mapping =
                TranslationMapping::from_json_str(content).map_err(|source| LoadError::Malformed {
                    language,
                    location: format!("bundled:{}", catalog_file_name(language)),
                    source,
                })?;
            loader.catalogs.insert(language, mapping);
        }
        Ok(loader)
    }
}

impl TranslationLoader for StaticLoader {
    fn load(&self, language: Language) -> BoxFuture<'_, Result<TranslationMapping, LoadError>> {
        let result = self
            .catalogs
            .get(&language)
            .cloned()
            .ok_or(LoadError::Missing(language));
        future::ready(result).boxed()
    }
}

/// Build the loader matching a configured source: URLs go over HTTP, anything
/// else is treated as a directory.
pub fn loader_for_source(source: &str) -> Box<dyn TranslationLoader> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Box::new(HttpLoader::new(source))
    } else {
        Box::new(FileLoader::new(source))
    }
}
