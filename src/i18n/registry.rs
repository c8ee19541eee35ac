//! Language registry: Single source of truth for the supported languages.
//!
//! The site ships exactly two languages. Their metadata lives here behind a
//! `OnceLock` singleton so every part of the crate reads the same table.

use crate::i18n::Direction;
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "ar", "en")
    pub code: &'static str,

    /// English name of the language (e.g., "Arabic", "English")
    pub name: &'static str,

    /// Native name of the language (e.g., "العربية", "English")
    pub native_name: &'static str,

    /// Text direction used when this language is active
    pub direction: Direction,

    /// Whether this language's catalog backs resolution misses (only one should be true)
    pub is_fallback: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Codes are matched case-sensitively, the same way translation keys are.
    ///
    /// # Arguments
    /// * `code` - The ISO 639-1 language code (e.g., "ar", "en")
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language is supported
    /// * `None` if the code is unknown
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages.
    ///
    /// # Returns
    /// A vector of references to all language configurations, default first.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the fallback language configuration.
    ///
    /// # Returns
    /// A reference to the language whose catalog backs resolution misses.
    ///
    /// # Panics
    /// Panics if the table does not define exactly one fallback language.
    pub fn fallback(&self) -> &LanguageConfig {
        let fallbacks: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_fallback)
            .collect();

        match fallbacks.len() {
            0 => panic!("No fallback language found in registry"),
            1 => fallbacks[0],
            _ => panic!("Multiple fallback languages found in registry"),
        }
    }
}

/// Default language configurations: Arabic (right-to-left, site default) and
/// English (left-to-right, fallback catalog).
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "ar",
            name: "Arabic",
            native_name: "العربية",
            direction: Direction::Rtl,
            is_fallback: false,
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            direction: Direction::Ltr,
            is_fallback: true,
        },
    ]
}
