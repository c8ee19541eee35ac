//! Document-level side effects of a language change.
//!
//! The rendering layer supplies a [`Document`]; applying a language sets the
//! root `dir` and `lang` attributes and swaps the `lang-*` CSS hook on the
//! content root. Applying the same language twice leaves the document as it
//! was after the first application.

use crate::i18n::Language;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::{Mutex, OnceLock, PoisonError};

/// The slice of a rendered document the translation runtime writes to.
pub trait Document: Send + Sync {
    /// Set an attribute on the document root element.
    fn set_attribute(&self, name: &str, value: &str);

    /// Class list of the content root, space separated.
    fn class_name(&self) -> String;

    fn set_class_name(&self, class_name: &str);
}

static LANG_CLASS_REGEX: OnceLock<Regex> = OnceLock::new();

fn lang_class_regex() -> &'static Regex {
    LANG_CLASS_REGEX.get_or_init(|| Regex::new(r"^lang-\w+$").expect("valid lang class pattern"))
}

/// Replace every `lang-*` class with the one for `language`, keeping the
/// other classes in order.
pub fn replace_language_class(class_name: &str, language: Language) -> String {
    let regex = lang_class_regex();
    let mut classes: Vec<&str> = class_name
        .split_whitespace()
        .filter(|class| !regex.is_match(class))
        .collect();
    let language_class = language.css_class();
    classes.push(&language_class);
    classes.join(" ")
}

/// Write direction, language and CSS hook for `language` into `document`.
pub fn apply_language(document: &dyn Document, language: Language) {
    document.set_attribute("dir", language.direction().as_str());
    document.set_attribute("lang", language.code());
    let class_name = replace_language_class(&document.class_name(), language);
    document.set_class_name(&class_name);
}

/// Snapshot of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentState {
    pub attributes: BTreeMap<String, String>,
    pub class_name: String,
}

impl DocumentState {
    pub fn dir(&self) -> Option<&str> {
        self.attributes.get("dir").map(String::as_str)
    }

    pub fn lang(&self) -> Option<&str> {
        self.attributes.get("lang").map(String::as_str)
    }

    pub fn classes(&self) -> Vec<&str> {
        self.class_name.split_whitespace().collect()
    }
}

/// In-process document model, used headless and in tests.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    state: Mutex<DocumentState>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class_name(class_name: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(DocumentState {
                attributes: BTreeMap::new(),
                class_name: class_name.into(),
            }),
        }
    }

    pub fn state(&self) -> DocumentState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Document for MemoryDocument {
    fn set_attribute(&self, name: &str, value: &str) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn class_name(&self) -> String {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .class_name
            .clone()
    }

    fn set_class_name(&self, class_name: &str) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .class_name = class_name.to_string();
    }
}
