use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use super::single_shot::{self, SingleShot};
use crate::domain::{
    ActivityType, QueryDescriptor, SampleRecord, SortOrder, StatisticsBucket,
    StatisticsDescriptor, TimeWindow, TimeWindowError,
};
use crate::ports::{HealthStore, StoreError};
use crate::resolver::resolve_supported;

const DEFAULT_WINDOW_HOURS: u32 = 24;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("query execution failed: {0}")]
    Execution(#[from] StoreError),

    #[error("invalid query window: {0}")]
    Window(#[from] TimeWindowError),
}

pub type QueryStream = SingleShot<Vec<SampleRecord>, QueryError>;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Succeeded(Vec<SampleRecord>),
    Failed(QueryError),
    Empty,
}

impl QueryStream {
    pub async fn outcome(self) -> QueryOutcome {
        match self.recv().await {
            Some(Ok(records)) => QueryOutcome::Succeeded(records),
            Some(Err(error)) => QueryOutcome::Failed(error),
            None => QueryOutcome::Empty,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryOptions {
    pub window: Option<TimeWindow>,
    pub limit: usize,
    pub sort: Option<SortOrder>,
}

pub struct QueryService {
    store: Arc<dyn HealthStore>,
    window_hours: u32,
}

impl QueryService {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self {
            store,
            window_hours: DEFAULT_WINDOW_HOURS,
        }
    }

    pub fn with_window_hours(mut self, hours: u32) -> Self {
        if hours > 0 {
            self.window_hours = hours;
        }
        self
    }

    pub fn default_window(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::last_hours(now, self.window_hours).unwrap_or_else(|_| TimeWindow::one_day(now))
    }

    pub fn get_data(&self, activity: ActivityType) -> QueryStream {
        self.get_data_in(activity, self.default_window(Utc::now()))
    }

    pub fn get_data_in(&self, activity: ActivityType, window: TimeWindow) -> QueryStream {
        self.get_data_with(
            activity,
            QueryOptions {
                window: Some(window),
                ..QueryOptions::default()
            },
        )
    }

    pub fn get_all_data(&self, activity: ActivityType) -> QueryStream {
        self.get_data_with(activity, QueryOptions::default())
    }

    /// Issues the query in the background and returns immediately.
    ///
    /// An unsupported sample type yields a stream that completes with neither
    /// value nor error. Every call queries the store independently.
    pub fn get_data_with(&self, activity: ActivityType, options: QueryOptions) -> QueryStream {
        let sample_type = match resolve_supported(self.store.as_ref(), activity) {
            Ok(sample_type) => sample_type,
            Err(error) => {
                warn!(%error, %activity, "skipping query");
                return SingleShot::empty();
            }
        };

        let descriptor = QueryDescriptor {
            sample_type,
            predicate: options.window,
            limit: options.limit,
            sort: options.sort,
        };

        let (completer, stream) = single_shot::channel();
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            let delivered = match store.execute_query(descriptor).await {
                Ok(records) => {
                    debug!(%activity, record_count = records.len(), "query completed");
                    completer.succeed(records)
                }
                Err(error) => {
                    warn!(%error, %activity, "query failed");
                    completer.fail(QueryError::Execution(error))
                }
            };

            if !delivered {
                debug!(%activity, "query consumer dropped before completion");
            }
        });

        stream
    }

    pub async fn daily_step_totals(
        &self,
        now: DateTime<Utc>,
        days: u32,
    ) -> Result<Vec<StatisticsBucket>, QueryError> {
        let sample_type = match resolve_supported(self.store.as_ref(), ActivityType::Steps) {
            Ok(sample_type) => sample_type,
            Err(error) => {
                warn!(%error, "skipping step statistics");
                return Ok(Vec::new());
            }
        };

        let descriptor = StatisticsDescriptor::daily(sample_type, now, days)?;
        let buckets = self.store.execute_statistics(descriptor).await.map_err(|error| {
            warn!(%error, "error in steps");
            QueryError::Execution(error)
        })?;

        debug!(bucket_count = buckets.len(), "step statistics completed");
        Ok(buckets)
    }
}
