use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::debug;

use healthsync_core::{
    Access, ConsentPrompt, HealthStore, QueryDescriptor, SampleId, SampleRecord, SampleType,
    SampleTypeSet, SampleValue, SortOrder, StatisticsBucket, StatisticsDescriptor, StoreError,
};

/// Local health database. Consent decisions are recorded per sample type and
/// access, so the prompt only runs the first time a pair is requested.
pub struct SqliteHealthStore {
    connection: Arc<Mutex<Connection>>,
    consent: Arc<dyn ConsentPrompt>,
}

impl SqliteHealthStore {
    pub fn new(path: &Path, consent: Arc<dyn ConsentPrompt>) -> Result<Self, StoreError> {
        let connection = Connection::open(path).map_err(storage_error)?;
        Self::with_connection(connection, consent)
    }

    pub fn in_memory(consent: Arc<dyn ConsentPrompt>) -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(storage_error)?;
        Self::with_connection(connection, consent)
    }

    fn with_connection(
        connection: Connection,
        consent: Arc<dyn ConsentPrompt>,
    ) -> Result<Self, StoreError> {
        connection
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS samples (
                    id INTEGER PRIMARY KEY,
                    sample_type TEXT NOT NULL,
                    start_at TEXT NOT NULL,
                    end_at TEXT NOT NULL,
                    value_json TEXT NOT NULL,
                    quantity REAL,
                    source TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_samples_type_start
                    ON samples (sample_type, start_at);
                CREATE TABLE IF NOT EXISTS authorizations (
                    sample_type TEXT NOT NULL,
                    access TEXT NOT NULL,
                    granted INTEGER NOT NULL,
                    decided_at TEXT NOT NULL,
                    PRIMARY KEY (sample_type, access)
                );",
            )
            .map_err(storage_error)?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            consent,
        })
    }

    pub fn authorization_status(
        &self,
        sample_type: SampleType,
        access: Access,
    ) -> Result<Option<bool>, StoreError> {
        let connection = self.lock()?;
        recorded_decision(&connection, sample_type, access)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Storage {
            message: "connection lock poisoned".to_string(),
        })
    }

    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &dyn ConsentPrompt) -> Result<T, StoreError> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        let consent = Arc::clone(&self.consent);

        tokio::task::spawn_blocking(move || {
            let connection = connection.lock().map_err(|_| StoreError::Storage {
                message: "connection lock poisoned".to_string(),
            })?;
            operation(&*connection, consent.as_ref())
        })
        .await
        .map_err(|error| StoreError::Storage {
            message: format!("task join error: {}", error),
        })?
    }
}

#[async_trait]
impl HealthStore for SqliteHealthStore {
    fn is_available(&self) -> bool {
        self.connection.lock().is_ok()
    }

    fn supports(&self, _sample_type: SampleType) -> bool {
        true
    }

    async fn request_authorization(
        &self,
        to_share: &SampleTypeSet,
        to_read: &SampleTypeSet,
    ) -> Result<bool, StoreError> {
        let requested: Vec<(SampleType, Access)> = to_share
            .iter()
            .map(|sample_type| (sample_type, Access::Share))
            .chain(to_read.iter().map(|sample_type| (sample_type, Access::Read)))
            .collect();

        self.run_blocking(move |connection, consent| {
            let mut all_granted = true;
            for (sample_type, access) in requested {
                let granted = match recorded_decision(connection, sample_type, access)? {
                    Some(granted) => granted,
                    None => match consent.ask(sample_type, access) {
                        Some(granted) => {
                            record_decision(connection, sample_type, access, granted)?;
                            debug!(%sample_type, access = access.as_str(), granted, "consent recorded");
                            granted
                        }
                        None => {
                            debug!(%sample_type, access = access.as_str(), "consent left undecided");
                            false
                        }
                    },
                };
                all_granted &= granted;
            }
            Ok(all_granted)
        })
        .await
    }

    async fn execute_query(
        &self,
        descriptor: QueryDescriptor,
    ) -> Result<Vec<SampleRecord>, StoreError> {
        self.run_blocking(move |connection, _| {
            if !is_granted(connection, descriptor.sample_type, Access::Read)? {
                debug!(sample_type = %descriptor.sample_type, "read access not granted, hiding samples");
                return Ok(Vec::new());
            }
            select_samples(connection, &descriptor)
        })
        .await
    }

    async fn execute_statistics(
        &self,
        descriptor: StatisticsDescriptor,
    ) -> Result<Vec<StatisticsBucket>, StoreError> {
        self.run_blocking(move |connection, _| {
            if !is_granted(connection, descriptor.sample_type, Access::Read)? {
                return Ok(descriptor.accumulate(std::iter::empty()));
            }

            let mut statement = connection
                .prepare(
                    "SELECT start_at, quantity FROM samples
                     WHERE sample_type = ?1 AND quantity IS NOT NULL
                       AND start_at >= ?2 AND start_at < ?3",
                )
                .map_err(storage_error)?;

            let points = statement
                .query_map(
                    params![
                        descriptor.sample_type.identifier(),
                        format_timestamp(descriptor.window.start()),
                        format_timestamp(descriptor.window.end()),
                    ],
                    |row| {
                        let start: String = row.get(0)?;
                        let quantity: f64 = row.get(1)?;
                        Ok((parse_timestamp(0, &start)?, quantity))
                    },
                )
                .map_err(storage_error)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(storage_error)?;

            Ok(descriptor.accumulate(points))
        })
        .await
    }

    async fn save_sample(&self, record: SampleRecord) -> Result<SampleId, StoreError> {
        self.run_blocking(move |connection, _| {
            if !is_granted(connection, record.sample_type, Access::Share)? {
                return Err(StoreError::NotAuthorized {
                    sample_type: record.sample_type,
                });
            }

            let value_json =
                serde_json::to_string(&record.value).map_err(|error| StoreError::InvalidSample {
                    message: error.to_string(),
                })?;

            connection
                .execute(
                    "INSERT INTO samples (sample_type, start_at, end_at, value_json, quantity, source)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    params![
                        record.sample_type.identifier(),
                        format_timestamp(record.start),
                        format_timestamp(record.end),
                        value_json,
                        record.quantity(),
                        record.source,
                    ],
                )
                .map_err(storage_error)?;

            Ok(connection.last_insert_rowid())
        })
        .await
    }

    fn store_name(&self) -> &'static str {
        "SQLite"
    }
}

fn select_samples(
    connection: &Connection,
    descriptor: &QueryDescriptor,
) -> Result<Vec<SampleRecord>, StoreError> {
    let mut sql = String::from(
        "SELECT id, sample_type, start_at, end_at, value_json, source
         FROM samples WHERE sample_type = ?1",
    );
    let mut values = vec![descriptor.sample_type.identifier().to_string()];

    if let Some(window) = descriptor.predicate {
        sql.push_str(" AND start_at < ?2 AND end_at >= ?3");
        values.push(format_timestamp(window.end()));
        values.push(format_timestamp(window.start()));
    }

    sql.push_str(match descriptor.sort {
        None => " ORDER BY id",
        Some(SortOrder::OldestFirst) => " ORDER BY start_at ASC, id",
        Some(SortOrder::NewestFirst) => " ORDER BY start_at DESC, id",
    });

    if descriptor.limit > 0 {
        sql.push_str(&format!(" LIMIT {}", descriptor.limit));
    }

    let mut statement = connection.prepare(&sql).map_err(storage_error)?;
    let records = statement
        .query_map(params_from_iter(values.iter()), row_to_record)
        .map_err(storage_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(storage_error)?;

    Ok(records)
}

fn row_to_record(row: &rusqlite::Row) -> Result<SampleRecord, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let identifier: String = row.get(1)?;
    let start: String = row.get(2)?;
    let end: String = row.get(3)?;
    let value_json: String = row.get(4)?;
    let source: String = row.get(5)?;

    let sample_type = SampleType::from_identifier(&identifier).ok_or_else(|| {
        conversion_error(
            1,
            StoreError::Storage {
                message: format!("unknown sample type {}", identifier),
            },
        )
    })?;

    let value: SampleValue =
        serde_json::from_str(&value_json).map_err(|error| conversion_error(4, error))?;

    Ok(SampleRecord {
        id: Some(id),
        sample_type,
        start: parse_timestamp(2, &start)?,
        end: parse_timestamp(3, &end)?,
        value,
        source,
    })
}

fn recorded_decision(
    connection: &Connection,
    sample_type: SampleType,
    access: Access,
) -> Result<Option<bool>, StoreError> {
    connection
        .query_row(
            "SELECT granted FROM authorizations WHERE sample_type = ?1 AND access = ?2",
            params![sample_type.identifier(), access.as_str()],
            |row| row.get::<_, bool>(0),
        )
        .optional()
        .map_err(storage_error)
}

fn record_decision(
    connection: &Connection,
    sample_type: SampleType,
    access: Access,
    granted: bool,
) -> Result<(), StoreError> {
    connection
        .execute(
            "INSERT OR REPLACE INTO authorizations (sample_type, access, granted, decided_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                sample_type.identifier(),
                access.as_str(),
                granted,
                format_timestamp(Utc::now()),
            ],
        )
        .map_err(storage_error)?;
    Ok(())
}

fn is_granted(
    connection: &Connection,
    sample_type: SampleType,
    access: Access,
) -> Result<bool, StoreError> {
    Ok(recorded_decision(connection, sample_type, access)?.unwrap_or(false))
}

fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(index: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|instant| instant.with_timezone(&Utc))
        .map_err(|error| conversion_error(index, error))
}

fn conversion_error<E>(index: usize, error: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error))
}

fn storage_error(error: rusqlite::Error) -> StoreError {
    StoreError::Storage {
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consent::FixedConsent;
    use chrono::{Duration, TimeZone};
    use healthsync_core::{default_sample_type_set, SleepStage, TimeWindow};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingConsent {
        grant: Option<bool>,
        calls: AtomicUsize,
    }

    impl ConsentPrompt for CountingConsent {
        fn ask(&self, _sample_type: SampleType, _access: Access) -> Option<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.grant
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, 12, 0, 0).unwrap()
    }

    async fn authorized_store() -> SqliteHealthStore {
        let store = SqliteHealthStore::in_memory(Arc::new(FixedConsent::grant_all())).unwrap();
        store
            .request_authorization(&default_sample_type_set(), &default_sample_type_set())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn consent_is_asked_once_per_pair() {
        let consent = Arc::new(CountingConsent {
            grant: Some(true),
            calls: AtomicUsize::new(0),
        });
        let store = SqliteHealthStore::in_memory(consent.clone()).unwrap();
        let all = default_sample_type_set();

        let first = store.request_authorization(&all, &all).await.unwrap();
        let second = store.request_authorization(&all, &all).await.unwrap();

        assert!(first);
        assert!(second);
        assert_eq!(consent.calls.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn denied_consent_is_remembered() {
        let store = SqliteHealthStore::in_memory(Arc::new(FixedConsent::deny_all())).unwrap();
        let steps: SampleTypeSet = [SampleType::StepCount].into_iter().collect();

        let granted = store
            .request_authorization(&SampleTypeSet::new(), &steps)
            .await
            .unwrap();

        assert!(!granted);
        assert_eq!(
            store
                .authorization_status(SampleType::StepCount, Access::Read)
                .unwrap(),
            Some(false)
        );
        assert_eq!(
            store
                .authorization_status(SampleType::StepCount, Access::Share)
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn undecided_consent_is_asked_again() {
        let consent = Arc::new(CountingConsent {
            grant: None,
            calls: AtomicUsize::new(0),
        });
        let store = SqliteHealthStore::in_memory(consent.clone()).unwrap();
        let sleep: SampleTypeSet = [SampleType::SleepAnalysis].into_iter().collect();

        let first = store
            .request_authorization(&SampleTypeSet::new(), &sleep)
            .await
            .unwrap();
        let second = store
            .request_authorization(&SampleTypeSet::new(), &sleep)
            .await
            .unwrap();

        assert!(!first);
        assert!(!second);
        assert_eq!(consent.calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            store
                .authorization_status(SampleType::SleepAnalysis, Access::Read)
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn save_requires_share_access() {
        let store = SqliteHealthStore::in_memory(Arc::new(FixedConsent::grant_all())).unwrap();

        let result = store
            .save_sample(SampleRecord::mindful_session(now(), now() + Duration::minutes(5)))
            .await;

        assert_eq!(
            result,
            Err(StoreError::NotAuthorized {
                sample_type: SampleType::MindfulSession
            })
        );
    }

    #[tokio::test]
    async fn saved_samples_are_returned_by_query() {
        let store = authorized_store().await;
        let sleep = SampleRecord::sleep(now() - Duration::hours(8), now() - Duration::hours(7), SleepStage::Rem);

        let id = store.save_sample(sleep.clone()).await.unwrap();
        let records = store
            .execute_query(QueryDescriptor::new(SampleType::SleepAnalysis, None))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(id));
        assert_eq!(records[0].value, sleep.value);
        assert_eq!(records[0].start, sleep.start);
        assert_eq!(records[0].end, sleep.end);
    }

    #[tokio::test]
    async fn query_honors_window_sort_and_limit() {
        let store = authorized_store().await;
        for hours_ago in [30, 5, 2, 10] {
            let start = now() - Duration::hours(hours_ago);
            store
                .save_sample(SampleRecord::workout(start, start + Duration::minutes(40), "rowing"))
                .await
                .unwrap();
        }

        let mut descriptor =
            QueryDescriptor::new(SampleType::Workout, Some(TimeWindow::one_day(now())));
        descriptor.sort = Some(SortOrder::NewestFirst);
        descriptor.limit = 2;

        let records = store.execute_query(descriptor).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].start, now() - Duration::hours(2));
        assert_eq!(records[1].start, now() - Duration::hours(5));
    }

    #[tokio::test]
    async fn unauthorized_read_returns_no_samples() {
        struct ShareOnly;

        impl ConsentPrompt for ShareOnly {
            fn ask(&self, _sample_type: SampleType, access: Access) -> Option<bool> {
                Some(access == Access::Share)
            }
        }

        let store = SqliteHealthStore::in_memory(Arc::new(ShareOnly)).unwrap();
        let all = default_sample_type_set();
        let granted = store.request_authorization(&all, &all).await.unwrap();
        store
            .save_sample(SampleRecord::steps(now(), now(), 10.0))
            .await
            .unwrap();

        let records = store
            .execute_query(QueryDescriptor::new(SampleType::StepCount, None))
            .await
            .unwrap();

        assert!(!granted);
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn statistics_bucket_quantities_per_day() {
        let store = authorized_store().await;
        let samples = [
            (now() - Duration::hours(3), 400.0),
            (now() - Duration::hours(1), 600.0),
            (now() - Duration::days(1), 2000.0),
            (now() - Duration::days(10), 9999.0),
        ];
        for (start, count) in samples {
            store
                .save_sample(SampleRecord::steps(start, start + Duration::minutes(30), count))
                .await
                .unwrap();
        }

        let descriptor = StatisticsDescriptor::daily(SampleType::StepCount, now(), 7).unwrap();
        let buckets = store.execute_statistics(descriptor).await.unwrap();

        assert_eq!(buckets.len(), 7);
        assert_eq!(buckets[6].sum, 1000.0);
        assert_eq!(buckets[5].sum, 2000.0);
        assert_eq!(buckets.iter().map(|bucket| bucket.sum).sum::<f64>(), 3000.0);
    }

    #[test]
    fn timestamps_sort_lexicographically() {
        let earlier = format_timestamp(now());
        let later = format_timestamp(now() + Duration::milliseconds(1));

        assert!(earlier < later);
        assert_eq!(earlier, "2026-10-15T12:00:00.000000000Z");
    }

    #[tokio::test]
    async fn sub_millisecond_bounds_survive_save_and_query() {
        let store = authorized_store().await;
        let start = now() + Duration::microseconds(1_500);
        let end = start + Duration::nanoseconds(10 * 60 * 1_000_000_000 + 7);
        let session = SampleRecord::mindful_session(start, end);

        store.save_sample(session.clone()).await.unwrap();
        let records = store
            .execute_query(QueryDescriptor::new(
                SampleType::MindfulSession,
                Some(TimeWindow::new(start, end).unwrap()),
            ))
            .await
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start, start);
        assert_eq!(records[0].end, end);
    }
}
