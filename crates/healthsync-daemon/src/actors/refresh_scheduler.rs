use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::broadcast;
use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use healthsync_core::{render_samples, ActivityType, QueryOutcome, QueryService, SampleRecord};

use super::WeakDisplayHandle;

/// Queries every activity once after authorization, then on the configured
/// cadence when one is set.
pub struct RefreshSchedulerActor {
    queries: Arc<QueryService>,
    display: WeakDisplayHandle,
    interval: Option<Duration>,
}

impl RefreshSchedulerActor {
    pub fn new(
        queries: Arc<QueryService>,
        display: WeakDisplayHandle,
        refresh_interval_minutes: u64,
    ) -> Self {
        let interval = (refresh_interval_minutes > 0)
            .then(|| Duration::from_secs(refresh_interval_minutes.saturating_mul(60)));

        Self {
            queries,
            display,
            interval,
        }
    }

    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        self.refresh_all().await;

        let Some(interval) = self.interval else {
            info!("periodic refresh disabled");
            return;
        };

        info!(minutes = interval.as_secs() / 60, "periodic refresh scheduled");

        loop {
            tokio::select! {
                _ = sleep(interval) => {
                    self.refresh_all().await;
                }
                _ = shutdown.recv() => {
                    debug!("refresh scheduler shutdown");
                    break;
                }
            }
        }
    }

    pub async fn refresh_all(&self) {
        let mut pending: FuturesUnordered<_> = ActivityType::ALL
            .into_iter()
            .map(|activity| {
                let stream = self.queries.get_data(activity);
                async move { (activity, stream.outcome().await) }
            })
            .collect();

        while let Some((activity, outcome)) = pending.next().await {
            match outcome {
                QueryOutcome::Succeeded(samples) => {
                    display_samples(activity, &samples);
                    if activity == ActivityType::Mindfulness {
                        self.display.publish_meditation(samples).await;
                    }
                }
                QueryOutcome::Failed(error) => {
                    warn!(%error, %activity, "error in {}", activity);
                }
                QueryOutcome::Empty => {
                    debug!(%activity, "no data type available");
                }
            }
        }
    }
}

fn display_samples(activity: ActivityType, samples: &[SampleRecord]) {
    for line in render_samples(samples).lines() {
        info!(%activity, "{}", line);
    }
}
