//! Language switch controller.
//!
//! Owns the active-language state machine:
//!
//! ```text
//! idle --toggle()--> switching --load ok--> idle (new language applied)
//!                              --load err-> idle (previous language restored)
//! ```
//!
//! While switching, further `toggle()` calls are ignored rather than queued,
//! so at most one catalog load is in flight. Every successful apply writes the
//! document attributes first and then broadcasts a [`LanguageChanged`] to all
//! subscribers.

use crate::i18n::document::{apply_language, Document};
use crate::i18n::loader::{LoadError, TranslationLoader};
use crate::i18n::preference::{preferred_language, PreferenceStore};
use crate::i18n::{Direction, Language, TranslationMapping, TranslationMetrics, TranslationStore};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Default bound on a single catalog load.
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Capacity of the notification channel; slow subscribers skip old events.
const NOTIFICATION_CAPACITY: usize = 16;

/// Broadcast after every successful language apply.
#[derive(Debug, Clone)]
pub struct LanguageChanged {
    pub language: Language,
    pub direction: Direction,
    pub translations: Arc<TranslationMapping>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("language switch failed: {0}")]
    Load(#[from] LoadError),

    #[error("a language switch is already in progress")]
    Busy,
}

/// Result of a `toggle()` call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Switched(Language),
    /// Another switch was in flight; nothing happened.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    Switching,
}

#[derive(Debug)]
struct ControllerState {
    phase: SwitchPhase,
    language: Language,
}

/// Single owner of the active language.
pub struct LanguageSwitchController {
    loader: Arc<dyn TranslationLoader>,
    preferences: Arc<dyn PreferenceStore>,
    document: Arc<dyn Document>,
    store: Arc<TranslationStore>,
    state: Mutex<ControllerState>,
    notifier: broadcast::Sender<LanguageChanged>,
    load_timeout: Duration,
}

impl LanguageSwitchController {
    pub fn new(
        loader: Arc<dyn TranslationLoader>,
        preferences: Arc<dyn PreferenceStore>,
        document: Arc<dyn Document>,
    ) -> Self {
        let language = Language::default_language();
        let (notifier, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Self {
            loader,
            preferences,
            document,
            store: Arc::new(TranslationStore::with_metrics(
                language,
                Arc::new(TranslationMetrics::new()),
            )),
            state: Mutex::new(ControllerState {
                phase: SwitchPhase::Idle,
                language,
            }),
            notifier,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
        }
    }

    pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
        self.load_timeout = load_timeout;
        self
    }

    /// Read the stored preference, load the active and fallback catalogs, and
    /// apply the active language.
    ///
    /// A failed fallback load is logged and resolution simply runs without a
    /// fallback. A failed active load leaves an empty active catalog and is
    /// returned to the caller.
    pub async fn initialize(&self) -> Result<Language, SwitchError> {
        let guard = self.begin_switch().ok_or(SwitchError::Busy)?;

        let stored = self.preferences.get().unwrap_or_else(|e| {
            warn!("Could not read language preference, using default: {}", e);
            None
        });
        let language = preferred_language(stored.as_deref());
        self.lock_state().language = language;
        info!("Initializing translations for '{}'", language);

        let fallback_language = Language::fallback();
        let (active, fallback) = if language == fallback_language {
            let loaded = self.load(language).await;
            let fallback = loaded.as_ref().ok().cloned().ok_or(());
            (loaded, fallback)
        } else {
            let (active, fallback) =
                futures::join!(self.load(language), self.load(fallback_language));
            (active, fallback.map_err(|e| {
                warn!("Failed to load fallback translations: {}", e);
            }))
        };

        if let Ok(mapping) = fallback {
            self.store.set_fallback(mapping);
        }

        match active {
            Ok(mapping) => {
                self.persist(language);
                self.apply(language, mapping);
                guard.commit(language);
                Ok(language)
            }
            Err(e) => {
                error!("Failed to load {} translations: {}", language, e);
                self.store
                    .set_active(language, Arc::new(TranslationMapping::new()));
                guard.commit(language);
                Err(SwitchError::Load(e))
            }
        }
    }

    /// Switch to the other language.
    ///
    /// The new preference is persisted before the load starts. On failure the
    /// preference and active language are restored and the document is left
    /// untouched. A successful load of the fallback language also installs it
    /// as the fallback catalog if startup could not.
    pub async fn toggle(&self) -> Result<ToggleOutcome, SwitchError> {
        let Some(guard) = self.begin_switch() else {
            debug!("Language switch already in progress, ignoring toggle");
            return Ok(ToggleOutcome::Ignored);
        };

        let next = guard.restore.other();
        self.lock_state().language = next;
        self.persist(next);

        match self.load(next).await {
            Ok(mapping) => {
                if next == Language::fallback() && !self.store.has_fallback() {
                    info!("Installing '{}' as fallback after a failed startup load", next);
                    self.store.set_fallback(Arc::clone(&mapping));
                }
                self.apply(next, mapping);
                guard.commit(next);
                info!("Language switched to '{}'", next);
                Ok(ToggleOutcome::Switched(next))
            }
            Err(e) => {
                error!("Failed to switch language to '{}': {}", next, e);
                // Dropping the guard restores the previous language.
                drop(guard);
                Err(SwitchError::Load(e))
            }
        }
    }

    /// Subscribe to language change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<LanguageChanged> {
        self.notifier.subscribe()
    }

    pub fn language(&self) -> Language {
        self.lock_state().language
    }

    pub fn phase(&self) -> SwitchPhase {
        self.lock_state().phase
    }

    pub fn store(&self) -> &Arc<TranslationStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        self.store.metrics()
    }

    pub fn resolve(&self, key: &str) -> String {
        self.store.resolve(key)
    }

    pub fn resolve_list(&self, key: &str) -> Vec<String> {
        self.store.resolve_list(key)
    }

    fn lock_state(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move to `Switching`, or return `None` if a switch is already running.
    fn begin_switch(&self) -> Option<SwitchGuard<'_>> {
        let mut state = self.lock_state();
        if state.phase == SwitchPhase::Switching {
            return None;
        }
        state.phase = SwitchPhase::Switching;
        Some(SwitchGuard {
            controller: self,
            restore: state.language,
            committed: false,
        })
    }

    async fn load(&self, language: Language) -> Result<Arc<TranslationMapping>, LoadError> {
        let metrics = self.metrics();
        metrics.record_load();

        let result = match tokio::time::timeout(self.load_timeout, self.loader.load(language)).await
        {
            Ok(result) => result,
            Err(_) => Err(LoadError::Timeout {
                language,
                timeout: self.load_timeout,
            }),
        };

        if result.is_err() {
            metrics.record_load_failure();
        }
        result.map(Arc::new)
    }

    fn persist(&self, language: Language) {
        if let Err(e) = self.preferences.set(language) {
            warn!("Could not persist language preference '{}': {}", language, e);
        }
    }

    fn apply(&self, language: Language, mapping: Arc<TranslationMapping>) {
        self.store.set_active(language, Arc::clone(&mapping));
        apply_language(self.document.as_ref(), language);

        let event = LanguageChanged {
            language,
            direction: language.direction(),
            translations: mapping,
            applied_at: Utc::now(),
        };
        // No subscribers is not an error.
        let receivers = self.notifier.send(event).unwrap_or(0);
        debug!("Applied '{}', notified {} subscribers", language, receivers);
    }
}

/// Marks a switch in flight. Dropping it without `commit` restores the
/// previous language and preference, which also covers a cancelled toggle.
struct SwitchGuard<'a> {
    controller: &'a LanguageSwitchController,
    restore: Language,
    committed: bool,
}

impl SwitchGuard<'_> {
    fn commit(mut self, language: Language) {
        self.committed = true;
        let mut state = self.controller.lock_state();
        state.language = language;
        state.phase = SwitchPhase::Idle;
    }
}

impl Drop for SwitchGuard<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.controller.persist(self.restore);
        let mut state = self.controller.lock_state();
        state.language = self.restore;
        state.phase = SwitchPhase::Idle;
    }
}
