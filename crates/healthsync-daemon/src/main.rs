mod actors;
mod startup;

use std::sync::Arc;
use std::time::Duration;

use actors::DisplaySyncActor;
use anyhow::Result;
use healthsync_adapters::{non_interactive_consent, SqliteHealthStore, TracingDisplay};
use healthsync_core::{Config, ConsentPolicy, HealthStore};
use startup::{start_sync, StartupOutcome};
use tokio::sync::broadcast;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("healthsync_daemon=debug".parse()?)
                .add_directive("healthsync=info".parse()?),
        )
        .init();

    info!("healthsync daemon starting");

    let config = Config::load().unwrap_or_else(|error| {
        warn!(%error, "failed to load config, using defaults");
        Config::default()
    });

    let (shutdown_sender, mut shutdown_receiver) = broadcast::channel::<()>(1);
    let sigint_shutdown_sender = shutdown_sender.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("SIGINT received, initiating shutdown");
        sigint_shutdown_sender.send(()).ok();
    });

    let store = create_health_store(&config)?;

    let (display_actor, display_handle) = DisplaySyncActor::new(
        Duration::from_secs(config.display.interval_seconds),
        Arc::new(TracingDisplay),
    );

    let scheduler_task =
        match start_sync(store, &config, display_handle.downgrade(), &shutdown_sender).await {
            StartupOutcome::Unavailable => {
                shutdown_receiver.recv().await.ok();
                info!("healthsync daemon stopped");
                return Ok(());
            }
            StartupOutcome::Denied => None,
            StartupOutcome::Failed(error) => {
                warn!(%error, "authorization failed, skipping queries");
                None
            }
            StartupOutcome::Syncing(task) => Some(task),
        };

    let display_task = tokio::spawn(display_actor.run(shutdown_sender.subscribe()));

    shutdown_receiver.recv().await.ok();
    if let Some(task) = scheduler_task {
        task.await.ok();
    }
    drop(display_handle);
    display_task.await.ok();

    info!("healthsync daemon stopped");
    Ok(())
}

fn create_health_store(config: &Config) -> Result<Arc<dyn HealthStore>> {
    let database_path = config.store.database_path();

    if let Some(parent) = database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if config.store.consent == ConsentPolicy::Prompt {
        warn!("daemon cannot prompt for consent, run `healthsync authorize` to decide undecided types");
    }

    let consent = non_interactive_consent(config.store.consent);
    let store = SqliteHealthStore::new(&database_path, consent)?;
    info!(?database_path, "health store opened");
    Ok(Arc::new(store))
}
