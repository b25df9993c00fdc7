use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    QueryDescriptor, SampleId, SampleRecord, SampleType, SampleTypeSet, StatisticsBucket,
    StatisticsDescriptor,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("health data is not available on this device")]
    Unavailable,

    #[error("not authorized to write {sample_type}")]
    NotAuthorized { sample_type: SampleType },

    #[error("sample type not supported: {sample_type}")]
    UnsupportedSampleType { sample_type: SampleType },

    #[error("invalid sample: {message}")]
    InvalidSample { message: String },

    #[error("storage error: {message}")]
    Storage { message: String },
}

/// Boundary with the platform health-data store.
#[async_trait]
pub trait HealthStore: Send + Sync {
    fn is_available(&self) -> bool;

    fn supports(&self, sample_type: SampleType) -> bool;

    /// Returns whether every requested access ended up granted.
    async fn request_authorization(
        &self,
        to_share: &SampleTypeSet,
        to_read: &SampleTypeSet,
    ) -> Result<bool, StoreError>;

    async fn execute_query(
        &self,
        descriptor: QueryDescriptor,
    ) -> Result<Vec<SampleRecord>, StoreError>;

    async fn execute_statistics(
        &self,
        descriptor: StatisticsDescriptor,
    ) -> Result<Vec<StatisticsBucket>, StoreError>;

    async fn save_sample(&self, record: SampleRecord) -> Result<SampleId, StoreError>;

    fn store_name(&self) -> &'static str;
}
