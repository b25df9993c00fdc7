use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::domain::{SampleType, SampleTypeSet};
use crate::ports::{HealthStore, StoreError};
use crate::resolver::default_sample_type_set;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthorizationError {
    #[error("authorization failed: {0}")]
    Store(#[from] StoreError),

    #[error("cannot request access to unsupported sample type {sample_type}")]
    UnsupportedSampleType { sample_type: SampleType },

    #[error("no sample type requested")]
    NothingRequested,

    #[error("authorization request interrupted")]
    Interrupted,
}

pub struct PermissionGateway {
    store: Arc<dyn HealthStore>,
}

impl PermissionGateway {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    /// Starts the consent flow in the background and returns immediately.
    ///
    /// The returned future resolves exactly once: `Ok(false)` is a denial,
    /// not an error.
    pub fn request_permission(
        &self,
        to_share: SampleTypeSet,
        to_read: SampleTypeSet,
    ) -> PermissionRequest {
        let store = Arc::clone(&self.store);
        let (sender, receiver) = oneshot::channel();

        tokio::spawn(async move {
            let result = authorize(store.as_ref(), &to_share, &to_read).await;

            match &result {
                Ok(true) => info!(
                    share_count = to_share.len(),
                    read_count = to_read.len(),
                    "health data access granted"
                ),
                Ok(false) => warn!("display not allowed"),
                Err(error) => warn!(%error, "authorization request failed"),
            }

            if sender.send(result).is_err() {
                debug!("permission requester dropped before completion");
            }
        });

        receiver
            .map(|delivered| delivered.unwrap_or(Err(AuthorizationError::Interrupted)))
            .boxed()
    }

    pub fn request_default_permission(&self) -> PermissionRequest {
        self.request_permission(default_sample_type_set(), default_sample_type_set())
    }
}

async fn authorize(
    store: &dyn HealthStore,
    to_share: &SampleTypeSet,
    to_read: &SampleTypeSet,
) -> Result<bool, AuthorizationError> {
    if to_share.is_empty() && to_read.is_empty() {
        return Err(AuthorizationError::NothingRequested);
    }

    if let Some(sample_type) = to_share
        .iter()
        .chain(to_read.iter())
        .find(|sample_type| !store.supports(*sample_type))
    {
        return Err(AuthorizationError::UnsupportedSampleType { sample_type });
    }

    Ok(store.request_authorization(to_share, to_read).await?)
}

/// Resolves once; a dropped worker reads as [`AuthorizationError::Interrupted`].
pub type PermissionRequest = BoxFuture<'static, Result<bool, AuthorizationError>>;
