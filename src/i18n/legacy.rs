//! Markup bindings for the pre-rendered (non-component) parts of the site.
//!
//! Static markup marks elements with a translation key and a binding kind:
//! plain text, an input placeholder, avatar initials derived from a name, or a
//! bullet list. The renderers here are pure functions of `(key, mapping)`;
//! [`LegacySyncer`] is one more subscriber of the controller's notifications
//! that re-renders its bindings on every language change and then, after a
//! short delay, pings each externally rendered subtree.

use crate::i18n::{Language, LanguageChanged, TranslationMapping, TranslationValue};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Default pause before subtree notifications go out.
pub const DEFAULT_SUBTREE_DELAY: Duration = Duration::from_millis(50);

const SUBTREE_CAPACITY: usize = 16;

/// How a bound element consumes its translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Text,
    Placeholder,
    Initials,
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element_id: String,
    pub kind: BindingKind,
    pub key: String,
}

/// Rendered output for one bound element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Replacement text content.
    Text(String),
    /// Replacement `placeholder` attribute.
    Placeholder(String),
    /// Replacement inner HTML.
    Html(String),
}

/// Sent to each registered subtree root once a language change has settled.
#[derive(Debug, Clone)]
pub struct SubtreeUpdate {
    pub root_id: String,
    pub language: Language,
    pub translations: Arc<TranslationMapping>,
}

/// Display text for `key`, if the mapping has a textual value there.
pub fn render_text(key: &str, mapping: &TranslationMapping) -> Option<String> {
    match mapping.lookup(key)? {
        TranslationValue::Text(text) | TranslationValue::Scalar(text) => Some(text.clone()),
        TranslationValue::List(items) => Some(items.join(", ")),
        TranslationValue::Nested(_) => None,
    }
}

/// First letter of each space-separated word, concatenated.
pub fn initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .collect()
}

pub fn render_initials(key: &str, mapping: &TranslationMapping) -> Option<String> {
    match mapping.lookup(key)? {
        TranslationValue::Text(name) if !name.is_empty() => Some(initials(name)),
        _ => None,
    }
}

/// One `<li>` per entry of the list at `key`.
pub fn render_list(key: &str, mapping: &TranslationMapping) -> Option<String> {
    match mapping.lookup(key)? {
        TranslationValue::List(items) => Some(
            items
                .iter()
                .map(|item| {
                    format!(
                        "<li class=\"flex items-start gap-2\">\
                         <div class=\"h-1.5 w-1.5 bg-primary rounded-full mt-2 flex-shrink-0\"></div>\
                         <span class=\"text-muted-foreground\">{}</span></li>",
                        escape_html(item)
                    )
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Render a single binding against a mapping.
pub fn render_binding(binding: &Binding, mapping: &TranslationMapping) -> Option<Fragment> {
    match binding.kind {
        BindingKind::Text => render_text(&binding.key, mapping).map(Fragment::Text),
        BindingKind::Placeholder => render_text(&binding.key, mapping).map(Fragment::Placeholder),
        BindingKind::Initials => render_initials(&binding.key, mapping).map(Fragment::Text),
        BindingKind::List => render_list(&binding.key, mapping).map(Fragment::Html),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Keeps bound markup in step with the active language.
pub struct LegacySyncer {
    bindings: Vec<Binding>,
    subtree_roots: Vec<String>,
    fragments: Mutex<BTreeMap<String, Fragment>>,
    subtree_tx: broadcast::Sender<SubtreeUpdate>,
    delay: Duration,
}

impl LegacySyncer {
    pub fn new() -> Self {
        let (subtree_tx, _) = broadcast::channel(SUBTREE_CAPACITY);
        Self {
            bindings: Vec::new(),
            subtree_roots: Vec::new(),
            fragments: Mutex::new(BTreeMap::new()),
            subtree_tx,
            delay: DEFAULT_SUBTREE_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn bind(
        mut self,
        element_id: impl Into<String>,
        kind: BindingKind,
        key: impl Into<String>,
    ) -> Self {
        self.bindings.push(Binding {
            element_id: element_id.into(),
            kind,
            key: key.into(),
        });
        self
    }

    pub fn with_subtree_root(mut self, root_id: impl Into<String>) -> Self {
        self.subtree_roots.push(root_id.into());
        self
    }

    pub fn subscribe_subtrees(&self) -> broadcast::Receiver<SubtreeUpdate> {
        self.subtree_tx.subscribe()
    }

    /// Current fragment for an element, if one has been rendered.
    pub fn fragment(&self, element_id: &str) -> Option<Fragment> {
        self.fragments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(element_id)
            .cloned()
    }

    pub fn fragments(&self) -> BTreeMap<String, Fragment> {
        self.fragments
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-render every binding from the event's catalog. Bindings whose key
    /// is missing keep their previous fragment. Returns how many were rendered.
    pub fn sync(&self, event: &LanguageChanged) -> usize {
        let mut fragments = self.fragments.lock().unwrap_or_else(PoisonError::into_inner);
        let mut rendered = 0;
        for binding in &self.bindings {
            if let Some(fragment) = render_binding(binding, &event.translations) {
                fragments.insert(binding.element_id.clone(), fragment);
                rendered += 1;
            }
        }
        debug!(
            "Legacy markup synced to '{}': {}/{} bindings rendered",
            event.language,
            rendered,
            self.bindings.len()
        );
        rendered
    }

    /// After the configured delay, send one [`SubtreeUpdate`] per subtree root.
    pub fn schedule_subtree_updates(&self, event: &LanguageChanged) -> JoinHandle<()> {
        let tx = self.subtree_tx.clone();
        let roots = self.subtree_roots.clone();
        let delay = self.delay;
        let language = event.language;
        let translations = Arc::clone(&event.translations);

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            for root_id in roots {
                let update = SubtreeUpdate {
                    root_id,
                    language,
                    translations: Arc::clone(&translations),
                };
                if let Err(unsent) = tx.send(update) {
                    debug!("No subtree listeners for '{}'", unsent.0.root_id);
                }
            }
        })
    }

    /// Consume controller notifications until the channel closes.
    pub fn spawn(self: Arc<Self>, mut events: broadcast::Receiver<LanguageChanged>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => {
                        self.sync(&event);
                        self.schedule_subtree_updates(&event);
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Legacy syncer skipped {} language notifications", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for LegacySyncer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn mapping() -> TranslationMapping {
        TranslationMapping::new()
            .with("navHome", "Home")
            .with("contactForm.email", "Email")
            .with("testimonial1Name", "Sarah Chen")
            .with("day1Topics", vec!["Intro", "Tokens & <context>"])
    }

    fn event(mapping: TranslationMapping) -> LanguageChanged {
        LanguageChanged {
            language: Language::English,
            direction: Language::English.direction(),
            translations: Arc::new(mapping),
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Sarah Chen"), "SC");
        assert_eq!(initials("Emily  Johnson"), "EJ");
        assert_eq!(initials("سارة تشين"), "ست");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_render_text_and_missing() {
        assert_eq!(render_text("navHome", &mapping()).as_deref(), Some("Home"));
        assert_eq!(render_text("missing", &mapping()), None);
    }

    #[test]
    fn test_render_list_escapes_items() {
        let html = render_list("day1Topics", &mapping()).unwrap();
        assert_eq!(html.matches("<li ").count(), 2);
        assert!(html.contains("Tokens &amp; &lt;context&gt;"));
        assert!(render_list("navHome", &mapping()).is_none());
    }

    #[test]
    fn test_render_binding_kinds() {
        let placeholder = Binding {
            element_id: "email".into(),
            kind: BindingKind::Placeholder,
            key: "contactForm.email".into(),
        };
        assert_eq!(
            render_binding(&placeholder, &mapping()),
            Some(Fragment::Placeholder("Email".into()))
        );

        let avatar = Binding {
            element_id: "avatar".into(),
            kind: BindingKind::Initials,
            key: "testimonial1Name".into(),
        };
        assert_eq!(
            render_binding(&avatar, &mapping()),
            Some(Fragment::Text("SC".into()))
        );
    }

    #[test]
    fn test_sync_is_idempotent_and_keeps_missing() {
        let syncer = LegacySyncer::new()
            .bind("home", BindingKind::Text, "navHome")
            .bind("ghost", BindingKind::Text, "missing");

        assert_eq!(syncer.sync(&event(mapping())), 1);
        let first = syncer.fragments();
        syncer.sync(&event(mapping()));
        assert_eq!(syncer.fragments(), first);
        assert!(syncer.fragment("ghost").is_none());

        syncer.sync(&event(TranslationMapping::new()));
        assert_eq!(syncer.fragment("home"), Some(Fragment::Text("Home".into())));
    }

    #[tokio::test]
    async fn test_subtree_updates_after_delay() {
        let syncer = LegacySyncer::new()
            .with_delay(Duration::from_millis(10))
            .with_subtree_root("root")
            .with_subtree_root("widget");
        let mut updates = syncer.subscribe_subtrees();

        syncer.schedule_subtree_updates(&event(mapping())).await.unwrap();

        let first = updates.recv().await.unwrap();
        let second = updates.recv().await.unwrap();
        assert_eq!(first.root_id, "root");
        assert_eq!(second.root_id, "widget");
        assert_eq!(second.language, Language::English);
    }

    #[tokio::test]
    async fn test_subtree_updates_without_listeners() {
        let syncer = LegacySyncer::new()
            .with_delay(Duration::from_millis(1))
            .with_subtree_root("root");

        let task = syncer.schedule_subtree_updates(&event(mapping()));

        assert!(task.await.is_ok());
        let mut late = syncer.subscribe_subtrees();
        assert!(late.try_recv().is_err());
    }
}
