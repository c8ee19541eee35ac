//! Internationalization (i18n) module for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the two supported languages
//! - `language`: Type-safe `Language` tag bound to a text direction
//! - `mapping`: Per-language catalogs parsed from JSON
//! - `store`: Active/fallback catalogs and key resolution with fallback
//! - `loader`: Catalog loaders (HTTP, directory, in-memory)
//! - `preference`: Persisted language preference
//! - `document`: Document direction, language and CSS hook side effects
//! - `controller`: Toggle state machine and change notifications
//! - `legacy`: Renderers and subscriber for pre-rendered markup bindings
//! - `metrics`: Resolution and load counters
//! - `audit`: Catalog parity checks
//!
//! # Example
//!
//! ```rust,ignore
//! use academy_i18n::i18n::{LanguageSwitchController, StaticLoader, MemoryDocument, MemoryPreferenceStore};
//!
//! let controller = LanguageSwitchController::new(
//!     Arc::new(StaticLoader::bundled()?),
//!     Arc::new(MemoryPreferenceStore::new()),
//!     Arc::new(MemoryDocument::new()),
//! );
//! controller.initialize().await?;
//! let title = controller.resolve("heroTitle");
//! ```

mod audit;
mod controller;
mod document;
mod language;
mod legacy;
mod loader;
mod mapping;
mod metrics;
mod preference;
mod registry;
mod store;

pub use audit::{CatalogAuditor, ValidationReport};
pub use controller::{
    LanguageChanged, LanguageSwitchController, SwitchError, SwitchPhase, ToggleOutcome,
    DEFAULT_LOAD_TIMEOUT,
};
pub use document::{apply_language, replace_language_class, Document, DocumentState, MemoryDocument};
pub use language::{Direction, Language};
pub use legacy::{
    escape_html, initials, render_binding, render_initials, render_list, render_text, Binding,
    BindingKind, Fragment, LegacySyncer, SubtreeUpdate, DEFAULT_SUBTREE_DELAY,
};
pub use loader::{
    catalog_file_name, loader_for_source, FileLoader, HttpLoader, LoadError, StaticLoader,
    TranslationLoader,
};
pub use mapping::{MappingError, TranslationMapping, TranslationValue};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use preference::{
    preferred_language, FilePreferenceStore, MemoryPreferenceStore, PersistenceError,
    PreferenceStore, PREFERENCE_KEY,
};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use store::{ActiveCatalog, TranslationStore};
