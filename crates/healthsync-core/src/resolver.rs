use thiserror::Error;

use crate::domain::{ActivityType, SampleType, SampleTypeSet};
use crate::ports::HealthStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("sample type {sample_type} is not available on this store")]
pub struct SampleTypeUnavailable {
    pub sample_type: SampleType,
}

pub fn resolve(activity: ActivityType) -> SampleType {
    match activity {
        ActivityType::Mindfulness => SampleType::MindfulSession,
        ActivityType::Steps => SampleType::StepCount,
        ActivityType::Workout => SampleType::Workout,
        ActivityType::Sleep => SampleType::SleepAnalysis,
    }
}

pub fn default_sample_type_set() -> SampleTypeSet {
    SampleTypeSet::from_activities(ActivityType::ALL)
}

pub fn resolve_supported(
    store: &dyn HealthStore,
    activity: ActivityType,
) -> Result<SampleType, SampleTypeUnavailable> {
    let sample_type = resolve(activity);
    if store.supports(sample_type) {
        Ok(sample_type)
    } else {
        Err(SampleTypeUnavailable { sample_type })
    }
}
