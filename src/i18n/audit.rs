//! Catalog parity audit.
//!
//! Compares a language's catalog with the fallback catalog so gaps show up
//! before they surface as fallback text or raw keys on the page.

use crate::i18n::{Language, TranslationMapping, TranslationValue};

/// Validation report containing errors and warnings about a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Problems that change what a page renders (e.g., a list became text)
    pub errors: Vec<String>,

    /// Gaps the fallback chain papers over
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

pub struct CatalogAuditor;

impl CatalogAuditor {
    /// Audit `catalog` (for `language`) against the fallback catalog.
    ///
    /// Warnings:
    /// - key present in the fallback but missing here
    /// - key present here but absent from the fallback
    /// - empty text value
    ///
    /// Errors:
    /// - the same key holds different kinds of value in the two catalogs
    pub fn audit(
        language: Language,
        catalog: &TranslationMapping,
        fallback: &TranslationMapping,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let fallback_language = Language::fallback();
        let ours = catalog.flatten();
        let theirs = fallback.flatten();

        for (key, fallback_value) in &theirs {
            match ours.get(key) {
                None if language != fallback_language => report.warnings.push(format!(
                    "Missing key '{}' in '{}' (falls back to '{}')",
                    key, language, fallback_language
                )),
                None => {}
                Some(value) if value.kind() != fallback_value.kind() => {
                    report.errors.push(format!(
                        "Key '{}' is {} in '{}' but {} in '{}'",
                        key,
                        value.kind(),
                        language,
                        fallback_value.kind(),
                        fallback_language
                    ))
                }
                Some(_) => {}
            }
        }

        for key in ours.keys().filter(|key| !theirs.contains_key(*key)) {
            report.warnings.push(format!(
                "Key '{}' in '{}' has no '{}' fallback",
                key, language, fallback_language
            ));
        }

        for (key, value) in &ours {
            if matches!(value, TranslationValue::Text(text) if text.trim().is_empty()) {
                report
                    .warnings
                    .push(format!("Key '{}' in '{}' is empty", key, language));
            }
        }

        report
    }
}
