use std::sync::Arc;

use anyhow::{Context, Result};
use healthsync_adapters::{non_interactive_consent, SqliteHealthStore};
use healthsync_core::{Config, ConsentPolicy, ConsentPrompt};

use crate::consent::TerminalConsent;

pub fn open_store(config: &Config) -> Result<SqliteHealthStore> {
    let database_path = config.store.database_path();

    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create data directory {}", parent.display()))?;
    }

    SqliteHealthStore::new(&database_path, consent_for(config.store.consent))
        .map_err(|error| anyhow::anyhow!("database access error: {}", error))
}

fn consent_for(policy: ConsentPolicy) -> Arc<dyn ConsentPrompt> {
    match policy {
        ConsentPolicy::Prompt => Arc::new(TerminalConsent),
        other => non_interactive_consent(other),
    }
}

pub fn load_config() -> Config {
    Config::load().unwrap_or_else(|error| {
        eprintln!("Warning: {}, using default configuration", error);
        Config::default()
    })
}
