use academy_i18n::config::Config;
use academy_i18n::i18n::{
    loader_for_source, BindingKind, FilePreferenceStore, LanguageSwitchController, LegacySyncer,
    MemoryDocument, ToggleOutcome,
};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Keys logged after each apply so the active language is visible at a glance.
const SAMPLE_KEYS: [&str; 3] = ["heroTitle", "navHome", "footerCopyright"];

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("academy_i18n=info".parse()?),
        )
        .init();

    let toggle = std::env::args().any(|arg| arg == "--toggle");

    let config = Config::from_env()?;
    info!("Loading translations from {}", config.translations_source);

    let document = Arc::new(MemoryDocument::with_class_name("min-h-screen bg-background"));
    let controller = LanguageSwitchController::new(
        Arc::from(loader_for_source(&config.translations_source)),
        Arc::new(FilePreferenceStore::new(&config.preference_file)),
        document.clone(),
    )
    .with_load_timeout(config.load_timeout);

    let syncer = Arc::new(
        LegacySyncer::new()
            .with_delay(config.legacy_sync_delay)
            .bind("language-switcher", BindingKind::Text, "languageSwitcher")
            .bind("contact-email", BindingKind::Placeholder, "contactForm.email")
            .bind("testimonial-1-avatar", BindingKind::Initials, "testimonial1Name")
            .bind("day-1-topics", BindingKind::List, "day1Topics")
            .with_subtree_root("root"),
    );
    let sync_task = Arc::clone(&syncer).spawn(controller.subscribe());

    if let Err(e) = controller.initialize().await {
        warn!("Starting without a complete catalog: {}", e);
    }
    log_state(&controller, &document);

    if toggle {
        match controller.toggle().await {
            Ok(ToggleOutcome::Switched(language)) => info!("Switched to {}", language.name()),
            Ok(ToggleOutcome::Ignored) => info!("Toggle ignored, a switch was in progress"),
            Err(e) => warn!("Toggle failed, keeping previous language: {}", e),
        }
        log_state(&controller, &document);
    }

    let metrics = Arc::clone(controller.metrics());

    // Closing the channel ends the syncer task.
    drop(controller);
    let _ = sync_task.await;

    for (element, fragment) in syncer.fragments() {
        info!("{} => {:?}", element, fragment);
    }

    println!("{}", serde_json::to_string_pretty(&metrics.report())?);
    Ok(())
}

fn log_state(controller: &LanguageSwitchController, document: &MemoryDocument) {
    let state = document.state();
    info!(
        "Active language: {} (dir={}, lang={}, class=\"{}\")",
        controller.language(),
        state.dir().unwrap_or("-"),
        state.lang().unwrap_or("-"),
        state.class_name
    );
    for key in SAMPLE_KEYS {
        info!("  {} = {}", key, controller.resolve(key));
    }
}
