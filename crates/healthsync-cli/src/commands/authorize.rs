use std::sync::Arc;

use anyhow::Result;
use healthsync_core::{AuthorizationError, HealthStore, PermissionGateway};

use crate::store::{load_config, open_store};

pub async fn execute() -> Result<()> {
    let config = load_config();
    let store: Arc<dyn HealthStore> = Arc::new(open_store(&config)?);

    if !store.is_available() {
        println!("⚫ Health data is not available on this device");
        return Ok(());
    }

    let gateway = PermissionGateway::new(store);
    let result = gateway
        .request_permission(config.permissions.share_set(), config.permissions.read_set())
        .await;

    println!("{}", describe(&result));
    if result.is_err() {
        std::process::exit(1);
    }

    Ok(())
}

fn describe(result: &Result<bool, AuthorizationError>) -> String {
    match result {
        Ok(true) => "🟢 Access granted".to_string(),
        Ok(false) => "⚪ Access not granted for every requested type".to_string(),
        Err(error) => format!("Error: {}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_distinguishes_denial_from_error() {
        assert_eq!(describe(&Ok(true)), "🟢 Access granted");
        assert!(describe(&Ok(false)).starts_with("⚪"));
        assert_eq!(
            describe(&Err(AuthorizationError::NothingRequested)),
            format!("Error: {}", AuthorizationError::NothingRequested)
        );
    }
}
