use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use healthsync_core::{
    HealthStore, QueryDescriptor, SampleId, SampleRecord, SampleType, SampleTypeSet,
    StatisticsBucket, StatisticsDescriptor, StoreError,
};

pub struct InMemoryHealthStore {
    records: Mutex<Vec<SampleRecord>>,
    available: bool,
    unsupported: HashSet<SampleType>,
    grant: bool,
    issued_queries: Mutex<Vec<QueryDescriptor>>,
    authorization_requests: AtomicUsize,
    next_id: AtomicI64,
}

impl InMemoryHealthStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            available: true,
            unsupported: HashSet::new(),
            grant: true,
            issued_queries: Mutex::new(Vec::new()),
            authorization_requests: AtomicUsize::new(0),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn with_records(records: Vec<SampleRecord>) -> Self {
        let store = Self::new();
        store.given_records(records);
        store
    }

    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    pub fn denying_consent(mut self) -> Self {
        self.grant = false;
        self
    }

    pub fn without_support_for(mut self, sample_type: SampleType) -> Self {
        self.unsupported.insert(sample_type);
        self
    }

    pub fn given_records(&self, records: Vec<SampleRecord>) {
        let mut guard = self.records.lock().unwrap();
        *guard = records;
    }

    pub fn issued_queries(&self) -> Vec<QueryDescriptor> {
        self.issued_queries.lock().unwrap().clone()
    }

    pub fn authorization_requests(&self) -> usize {
        self.authorization_requests.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryHealthStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthStore for InMemoryHealthStore {
    fn is_available(&self) -> bool {
        self.available
    }

    fn supports(&self, sample_type: SampleType) -> bool {
        !self.unsupported.contains(&sample_type)
    }

    async fn request_authorization(
        &self,
        _to_share: &SampleTypeSet,
        _to_read: &SampleTypeSet,
    ) -> Result<bool, StoreError> {
        self.authorization_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.grant)
    }

    async fn execute_query(
        &self,
        descriptor: QueryDescriptor,
    ) -> Result<Vec<SampleRecord>, StoreError> {
        self.issued_queries.lock().unwrap().push(descriptor.clone());

        let records = self.records.lock().unwrap();
        let matching = records
            .iter()
            .filter(|record| descriptor.matches(record))
            .cloned()
            .collect();
        Ok(descriptor.finish(matching))
    }

    async fn execute_statistics(
        &self,
        descriptor: StatisticsDescriptor,
    ) -> Result<Vec<StatisticsBucket>, StoreError> {
        let records = self.records.lock().unwrap();
        Ok(descriptor.accumulate(
            records
                .iter()
                .filter(|record| record.sample_type == descriptor.sample_type)
                .filter_map(|record| record.quantity().map(|value| (record.start, value))),
        ))
    }

    async fn save_sample(&self, mut record: SampleRecord) -> Result<SampleId, StoreError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        record.id = Some(id);
        self.records.lock().unwrap().push(record);
        Ok(id)
    }

    fn store_name(&self) -> &'static str {
        "InMemory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use healthsync_core::{ActivityType, QueryOutcome, QueryService, TimeWindow};
    use std::sync::Arc;

    fn mindful(hours_ago: i64) -> SampleRecord {
        let start = Utc::now() - Duration::hours(hours_ago);
        SampleRecord::mindful_session(start, start + Duration::minutes(10))
    }

    #[tokio::test]
    async fn returns_empty_when_no_records() {
        let store = InMemoryHealthStore::new();

        let result = store
            .execute_query(QueryDescriptor::new(SampleType::MindfulSession, None))
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn filters_records_by_window() {
        let recent = mindful(1);
        let store = InMemoryHealthStore::with_records(vec![mindful(48), recent.clone()]);
        let window = TimeWindow::one_day(Utc::now());

        let result = store
            .execute_query(QueryDescriptor::new(SampleType::MindfulSession, Some(window)))
            .await
            .unwrap();

        assert_eq!(result, vec![recent]);
    }

    #[tokio::test]
    async fn saved_records_get_sequential_ids() {
        let store = InMemoryHealthStore::new();

        let first = store.save_sample(mindful(1)).await.unwrap();
        let second = store.save_sample(mindful(2)).await.unwrap();

        assert_eq!((first, second), (1, 2));
    }

    #[tokio::test]
    async fn denial_is_reported_as_false() {
        let store = InMemoryHealthStore::new().denying_consent();

        let granted = store
            .request_authorization(&SampleTypeSet::new(), &SampleTypeSet::new())
            .await
            .unwrap();

        assert!(!granted);
        assert_eq!(store.authorization_requests(), 1);
    }

    #[tokio::test]
    async fn drives_query_service_end_to_end() {
        let store = Arc::new(InMemoryHealthStore::with_records(vec![mindful(1), mindful(2)]));
        let service = QueryService::new(store.clone());

        let outcome = service.get_data(ActivityType::Mindfulness).outcome().await;

        match outcome {
            QueryOutcome::Succeeded(records) => assert_eq!(records.len(), 2),
            other => panic!("expected success, got {:?}", other),
        }
        assert_eq!(store.issued_queries().len(), 1);
    }
}
