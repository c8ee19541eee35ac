//! Audit binary - compares every catalog against the fallback catalog
//!
//! Usage:
//!   cargo run --bin audit
//!
//! Optional:
//! - TRANSLATIONS_SOURCE (defaults to translations)
//!
//! Exits with status 1 when any catalog has errors.

use academy_i18n::config::Config;
use academy_i18n::i18n::{loader_for_source, CatalogAuditor, Language};
use anyhow::{Context, Result};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("audit=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let loader = loader_for_source(&config.translations_source);

    let fallback_language = Language::fallback();
    let fallback = loader
        .load(fallback_language)
        .await
        .with_context(|| format!("Failed to load fallback catalog '{}'", fallback_language))?;

    let mut failed = false;
    for language in Language::ALL {
        let catalog = loader
            .load(language)
            .await
            .with_context(|| format!("Failed to load catalog '{}'", language))?;
        let report = CatalogAuditor::audit(language, &catalog, &fallback);

        info!(
            "{} ({}): {} keys, {} errors, {} warnings",
            language.name(),
            language,
            catalog.flatten().len(),
            report.errors.len(),
            report.warnings.len()
        );
        for warning in &report.warnings {
            warn!("  {}", warning);
        }
        for error in &report.errors {
            println!("ERROR [{}] {}", language, error);
        }
        failed |= report.has_errors();
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}
