//! Translation store and resolver.
//!
//! The store owns the active language together with its catalog, plus the
//! always-loaded fallback catalog. Resolution never fails: a miss in the
//! active catalog falls over to the fallback catalog, and a miss there
//! returns the key itself.

use crate::i18n::{Language, TranslationMapping, TranslationMetrics, TranslationValue};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// The active language and the catalog loaded for it.
#[derive(Debug, Clone)]
pub struct ActiveCatalog {
    pub language: Language,
    pub mapping: Arc<TranslationMapping>,
}

/// Holds the current and fallback catalogs and resolves keys against them.
#[derive(Debug)]
pub struct TranslationStore {
    active: RwLock<ActiveCatalog>,
    fallback: RwLock<Option<Arc<TranslationMapping>>>,
    metrics: Arc<TranslationMetrics>,
}

impl TranslationStore {
    /// Create a store with an empty catalog for `language` and no fallback.
    pub fn new(language: Language) -> Self {
        Self::with_metrics(language, Arc::new(TranslationMetrics::new()))
    }

    pub fn with_metrics(language: Language, metrics: Arc<TranslationMetrics>) -> Self {
        Self {
            active: RwLock::new(ActiveCatalog {
                language,
                mapping: Arc::new(TranslationMapping::new()),
            }),
            fallback: RwLock::new(None),
            metrics,
        }
    }

    /// Replace the active language and its catalog in one step.
    ///
    /// Readers see either the old pair or the new pair, never a mix.
    pub fn set_active(&self, language: Language, mapping: Arc<TranslationMapping>) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *active = ActiveCatalog { language, mapping };
    }

    /// Install the fallback catalog.
    pub fn set_fallback(&self, mapping: Arc<TranslationMapping>) {
        let mut fallback = self.fallback.write().unwrap_or_else(PoisonError::into_inner);
        *fallback = Some(mapping);
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Clone of the active language/catalog pair.
    pub fn snapshot(&self) -> ActiveCatalog {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn language(&self) -> Language {
        self.snapshot().language
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    /// Resolve a dotted key to display text.
    ///
    /// Lists are joined with `", "`. Numbers and booleans come back in their
    /// string form. A key found in neither catalog is returned unchanged.
    ///
    /// # Arguments
    /// * `key` - Dotted key, walked through nested mappings (e.g., "footer.links.privacy")
    ///
    /// # Returns
    /// The active catalog's text, else the fallback catalog's text, else `key` itself.
    pub fn resolve(&self, key: &str) -> String {
        self.find(key, display_text)
            .unwrap_or_else(|| key.to_string())
    }

    /// Resolve a dotted key to a list of strings.
    ///
    /// # Arguments
    /// * `key` - Dotted key of a list entry (e.g., "day1Topics")
    ///
    /// # Returns
    /// The list from the active catalog, else from the fallback catalog, else
    /// an empty vector when neither holds a list at `key`.
    pub fn resolve_list(&self, key: &str) -> Vec<String> {
        self.find(key, |value| match value {
            TranslationValue::List(items) => Some(items.clone()),
            _ => None,
        })
        .unwrap_or_default()
    }

    fn find<T>(&self, key: &str, extract: impl Fn(&TranslationValue) -> Option<T>) -> Option<T> {
        let active = self.snapshot();
        if let Some(found) = active.mapping.lookup(key).and_then(&extract) {
            self.metrics.record_active_hit();
            return Some(found);
        }

        let fallback = self
            .fallback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(found) = fallback
            .as_deref()
            .and_then(|mapping| mapping.lookup(key))
            .and_then(&extract)
        {
            debug!(
                "Translation for key '{}' not found in '{}', using fallback",
                key, active.language
            );
            self.metrics.record_fallback_hit();
            return Some(found);
        }

        debug!("Translation for key '{}' not found", key);
        self.metrics.record_miss();
        None
    }
}

/// Render a catalog value as display text. Nested mappings have no text form.
fn display_text(value: &TranslationValue) -> Option<String> {
    match value {
        TranslationValue::Text(text) | TranslationValue::Scalar(text) => Some(text.clone()),
        TranslationValue::List(items) => Some(items.join(", ")),
        TranslationValue::Nested(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arabic() -> TranslationMapping {
        TranslationMapping::new()
            .with("navHome", "الرئيسية")
            .with("day1Topics", vec!["مقدمة", "أساسيات"])
            .with("footer", TranslationMapping::new().with("rights", "جميع الحقوق محفوظة"))
    }

    fn english() -> TranslationMapping {
        TranslationMapping::new()
            .with("navHome", "Home")
            .with("navContact", "Contact")
            .with("day2Topics", vec!["Chain of thought", "Few-shot"])
    }

    fn store() -> TranslationStore {
        let store = TranslationStore::new(Language::Arabic);
        store.set_active(Language::Arabic, Arc::new(arabic()));
        store.set_fallback(Arc::new(english()));
        store
    }

    #[test]
    fn test_resolve_active_value() {
        assert_eq!(store().resolve("navHome"), "الرئيسية");
    }

    #[test]
    fn test_resolve_nested_value() {
        assert_eq!(store().resolve("footer.rights"), "جميع الحقوق محفوظة");
    }

    #[test]
    fn test_resolve_falls_back() {
        assert_eq!(store().resolve("navContact"), "Contact");
    }

    #[test]
    fn test_resolve_miss_returns_key() {
        assert_eq!(
            store().resolve("glossaryPromptEngineering"),
            "glossaryPromptEngineering"
        );
    }

    #[test]
    fn test_resolve_empty_key() {
        assert_eq!(store().resolve(""), "");
    }

    #[test]
    fn test_resolve_joins_lists() {
        assert_eq!(store().resolve("day1Topics"), "مقدمة, أساسيات");
    }

    #[test]
    fn test_resolve_mapping_value_is_a_miss() {
        assert_eq!(store().resolve("footer"), "footer");
    }

    #[test]
    fn test_resolve_scalar_is_stringified() {
        let store = TranslationStore::new(Language::English);
        let mapping = TranslationMapping::from_json_str(r#"{"price": 399, "live": false}"#).unwrap();
        store.set_active(Language::English, Arc::new(mapping));
        assert_eq!(store.resolve("price"), "399");
        assert_eq!(store.resolve("live"), "false");
    }

    #[test]
    fn test_resolve_without_fallback() {
        let store = TranslationStore::new(Language::Arabic);
        store.set_active(Language::Arabic, Arc::new(arabic()));
        assert!(!store.has_fallback());
        assert_eq!(store.resolve("navContact"), "navContact");
    }

    #[test]
    fn test_resolve_list() {
        let store = store();
        assert_eq!(store.resolve_list("day1Topics"), vec!["مقدمة", "أساسيات"]);
        assert_eq!(
            store.resolve_list("day2Topics"),
            vec!["Chain of thought", "Few-shot"]
        );
        assert!(store.resolve_list("navHome").is_empty());
        assert!(store.resolve_list("missing").is_empty());
    }

    #[test]
    fn test_set_active_swaps_pair() {
        let store = store();
        store.set_active(Language::English, Arc::new(english()));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.language, Language::English);
        assert_eq!(store.resolve("navHome"), "Home");
    }

    #[test]
    fn test_resolution_does_not_mutate_mappings() {
        let store = store();
        let before = store.snapshot().mapping.as_ref().clone();
        store.resolve("navContact");
        store.resolve_list("missing");
        assert_eq!(*store.snapshot().mapping, before);
    }

    #[test]
    fn test_metrics_recorded() {
        let store = store();
        store.resolve("navHome");
        store.resolve("navContact");
        store.resolve("nope");

        let report = store.metrics().report();
        assert_eq!(report.active_hits, 1);
        assert_eq!(report.fallback_hits, 1);
        assert_eq!(report.misses, 1);
    }
}
