use async_trait::async_trait;
use healthsync_core::{
    HealthStore, QueryDescriptor, SampleId, SampleRecord, SampleType, SampleTypeSet,
    StatisticsBucket, StatisticsDescriptor, StoreError,
};

pub struct FailingHealthStore {
    error: StoreError,
}

impl FailingHealthStore {
    pub fn storage_error() -> Self {
        Self {
            error: StoreError::Storage {
                message: "database is locked".to_string(),
            },
        }
    }

    pub fn unavailable() -> Self {
        Self {
            error: StoreError::Unavailable,
        }
    }

    pub fn with_error(error: StoreError) -> Self {
        Self { error }
    }
}

#[async_trait]
impl HealthStore for FailingHealthStore {
    fn is_available(&self) -> bool {
        true
    }

    fn supports(&self, _sample_type: SampleType) -> bool {
        true
    }

    async fn request_authorization(
        &self,
        _to_share: &SampleTypeSet,
        _to_read: &SampleTypeSet,
    ) -> Result<bool, StoreError> {
        Err(self.error.clone())
    }

    async fn execute_query(
        &self,
        _descriptor: QueryDescriptor,
    ) -> Result<Vec<SampleRecord>, StoreError> {
        Err(self.error.clone())
    }

    async fn execute_statistics(
        &self,
        _descriptor: StatisticsDescriptor,
    ) -> Result<Vec<StatisticsBucket>, StoreError> {
        Err(self.error.clone())
    }

    async fn save_sample(&self, _record: SampleRecord) -> Result<SampleId, StoreError> {
        Err(self.error.clone())
    }

    fn store_name(&self) -> &'static str {
        "Failing"
    }
}
