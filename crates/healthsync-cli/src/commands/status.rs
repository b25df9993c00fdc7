use anyhow::Result;
use healthsync_adapters::SqliteHealthStore;
use healthsync_core::{default_sample_type_set, Access, Config, HealthStore, SampleType};
use serde::Serialize;

use crate::store::{load_config, open_store};

#[derive(Serialize)]
struct StatusOutput {
    store: String,
    available: bool,
    config_path: String,
    database_path: String,
    authorizations: Vec<AuthorizationOutput>,
}

#[derive(Serialize)]
struct AuthorizationOutput {
    sample_type: SampleType,
    share: Option<bool>,
    read: Option<bool>,
}

pub async fn execute(json: bool) -> Result<()> {
    let config = load_config();
    let store = open_store(&config)?;
    let output = collect(&config, &store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_formatted(&output);
    }

    Ok(())
}

fn collect(config: &Config, store: &SqliteHealthStore) -> Result<StatusOutput> {
    let authorizations = default_sample_type_set()
        .iter()
        .map(|sample_type| {
            Ok(AuthorizationOutput {
                sample_type,
                share: store.authorization_status(sample_type, Access::Share)?,
                read: store.authorization_status(sample_type, Access::Read)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StatusOutput {
        store: store.store_name().to_string(),
        available: store.is_available(),
        config_path: Config::config_path().display().to_string(),
        database_path: config.store.database_path().display().to_string(),
        authorizations,
    })
}

fn print_formatted(output: &StatusOutput) {
    if output.available {
        println!("🟢 {} store available", output.store);
    } else {
        println!("⚫ {} store unavailable", output.store);
    }
    println!("   Config: {}", output.config_path);
    println!("   Database: {}", output.database_path);
    println!();
    println!("   {:<16} {:<10} {:<10}", "type", "share", "read");
    for authorization in &output.authorizations {
        println!(
            "   {:<16} {:<10} {:<10}",
            authorization.sample_type.identifier(),
            format_decision(authorization.share),
            format_decision(authorization.read)
        );
    }
}

fn format_decision(decision: Option<bool>) -> &'static str {
    match decision {
        Some(true) => "granted",
        Some(false) => "denied",
        None => "undecided",
    }
}
