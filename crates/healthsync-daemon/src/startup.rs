use std::sync::Arc;

use healthsync_core::{AuthorizationError, Config, HealthStore, PermissionGateway, QueryService};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::actors::{RefreshSchedulerActor, WeakDisplayHandle};

pub enum StartupOutcome {
    Unavailable,
    Denied,
    Failed(AuthorizationError),
    Syncing(JoinHandle<()>),
}

pub async fn start_sync(
    store: Arc<dyn HealthStore>,
    config: &Config,
    display: WeakDisplayHandle,
    shutdown: &broadcast::Sender<()>,
) -> StartupOutcome {
    if !store.is_available() {
        warn!(store = store.store_name(), "health data unavailable on this device");
        return StartupOutcome::Unavailable;
    }

    let gateway = PermissionGateway::new(Arc::clone(&store));
    let permission = gateway
        .request_permission(config.permissions.share_set(), config.permissions.read_set())
        .await;

    match permission {
        Ok(true) => {
            let queries =
                QueryService::new(store).with_window_hours(config.query.window_hours);
            let scheduler = RefreshSchedulerActor::new(
                Arc::new(queries),
                display,
                config.query.refresh_interval_minutes,
            );
            StartupOutcome::Syncing(tokio::spawn(scheduler.run(shutdown.subscribe())))
        }
        Ok(false) => {
            info!("access denied, display will stay empty");
            StartupOutcome::Denied
        }
        Err(error) => StartupOutcome::Failed(error),
    }
}
