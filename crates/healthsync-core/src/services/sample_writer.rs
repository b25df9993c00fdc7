use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{SampleId, SampleRecord};
use crate::ports::{HealthStore, StoreError};

pub struct SampleWriter {
    store: Arc<dyn HealthStore>,
}

impl SampleWriter {
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self { store }
    }

    pub async fn save(&self, record: SampleRecord) -> Result<SampleId, StoreError> {
        if record.end < record.start {
            return Err(StoreError::InvalidSample {
                message: format!("{} ends before it starts", record.sample_type),
            });
        }

        if !self.store.supports(record.sample_type) {
            return Err(StoreError::UnsupportedSampleType {
                sample_type: record.sample_type,
            });
        }

        let sample_type = record.sample_type;
        match self.store.save_sample(record).await {
            Ok(id) => {
                info!(%sample_type, id, "sample saved");
                Ok(id)
            }
            Err(error) => {
                warn!(%error, %sample_type, "failed to save sample");
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SampleType;
    use crate::services::test_support::ScriptedStore;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn saves_valid_sample() {
        let writer = SampleWriter::new(Arc::new(ScriptedStore::with_records(Vec::new())));
        let start = Utc::now();

        let id = writer
            .save(SampleRecord::mindful_session(start, start + Duration::minutes(10)))
            .await
            .unwrap();

        assert_eq!(id, 1);
    }

    #[tokio::test]
    async fn rejects_inverted_bounds() {
        let writer = SampleWriter::new(Arc::new(ScriptedStore::with_records(Vec::new())));
        let start = Utc::now();

        let result = writer
            .save(SampleRecord::mindful_session(start, start - Duration::minutes(10)))
            .await;

        assert!(matches!(result, Err(StoreError::InvalidSample { .. })));
    }

    #[tokio::test]
    async fn rejects_unsupported_type() {
        let mut store = ScriptedStore::with_records(Vec::new());
        store.unsupported.insert(SampleType::Workout);
        let writer = SampleWriter::new(Arc::new(store));
        let start = Utc::now();

        let result = writer
            .save(SampleRecord::workout(start, start + Duration::minutes(30), "cycling"))
            .await;

        assert_eq!(
            result,
            Err(StoreError::UnsupportedSampleType {
                sample_type: SampleType::Workout
            })
        );
    }
}
