//! Language type: the two-valued language tag and its text direction.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Rtl,
    Ltr,
}

impl Direction {
    /// Value of the document `dir` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Rtl => "rtl",
            Direction::Ltr => "ltr",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// All supported languages, in registry order.
    pub const ALL: [Language; 2] = [Language::Arabic, Language::English];

    /// Create a Language from a language code string.
    ///
    /// # Example
    /// ```ignore
    /// let arabic = Language::from_code("ar")?;
    /// ```
    pub fn from_code(code: &str) -> Result<Language> {
        match code {
            "ar" => Ok(Language::Arabic),
            "en" => Ok(Language::English),
            "" => bail!("Empty language code"),
            other => bail!("Unknown language code: '{}'", other),
        }
    }

    /// The language a fresh session starts in when no valid preference exists.
    pub fn default_language() -> Language {
        Language::Arabic
    }

    /// The language whose catalog is consulted when the active one misses a key.
    pub fn fallback() -> Language {
        let config = LanguageRegistry::get().fallback();
        // Registry codes and enum codes are kept in lockstep.
        Language::from_code(config.code).unwrap_or(Language::English)
    }

    /// The other member of the pair.
    pub fn other(&self) -> Language {
        match self {
            Language::Arabic => Language::English,
            Language::English => Language::Arabic,
        }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the registry does not list this language, which would mean
    /// the registry table and this enum have drifted apart.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code())
            .expect("Every Language variant must be registered")
    }

    pub fn direction(&self) -> Direction {
        self.config().direction
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// CSS hook placed on the root content element, e.g. `lang-ar`.
    pub fn css_class(&self) -> String {
        format!("lang-{}", self.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
