use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{
    QueryDescriptor, SampleId, SampleRecord, SampleType, SampleTypeSet, StatisticsBucket,
    StatisticsDescriptor,
};
use crate::ports::{HealthStore, StoreError};

pub struct ScriptedStore {
    pub records: Vec<SampleRecord>,
    pub grant: Result<bool, StoreError>,
    pub query_error: Option<StoreError>,
    pub unsupported: HashSet<SampleType>,
    pub descriptors: Mutex<Vec<QueryDescriptor>>,
    pub authorization_calls: AtomicUsize,
}

impl ScriptedStore {
    pub fn with_records(records: Vec<SampleRecord>) -> Self {
        Self {
            records,
            grant: Ok(true),
            query_error: None,
            unsupported: HashSet::new(),
            descriptors: Mutex::new(Vec::new()),
            authorization_calls: AtomicUsize::new(0),
        }
    }

    pub fn descriptors(&self) -> Vec<QueryDescriptor> {
        self.descriptors.lock().unwrap().clone()
    }

    pub fn authorization_calls(&self) -> usize {
        self.authorization_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthStore for ScriptedStore {
    fn is_available(&self) -> bool {
        true
    }

    fn supports(&self, sample_type: SampleType) -> bool {
        !self.unsupported.contains(&sample_type)
    }

    async fn request_authorization(
        &self,
        _to_share: &SampleTypeSet,
        _to_read: &SampleTypeSet,
    ) -> Result<bool, StoreError> {
        self.authorization_calls.fetch_add(1, Ordering::SeqCst);
        self.grant.clone()
    }

    async fn execute_query(
        &self,
        descriptor: QueryDescriptor,
    ) -> Result<Vec<SampleRecord>, StoreError> {
        self.descriptors.lock().unwrap().push(descriptor.clone());
        if let Some(error) = &self.query_error {
            return Err(error.clone());
        }
        let matching = self
            .records
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
        if let Some(error) = &self.query_error {
            return Err(error.clone());
        }
        Ok(descriptor.accumulate(
            self.records
                .iter()
                .filter(|record| record.sample_type == descriptor.sample_type)
                .filter_map(|record| record.quantity().map(|value| (record.start, value))),
        ))
    }

    async fn save_sample(&self, _record: SampleRecord) -> Result<SampleId, StoreError> {
        Ok(1)
    }

    fn store_name(&self) -> &'static str {
        "Scripted"
    }
}
