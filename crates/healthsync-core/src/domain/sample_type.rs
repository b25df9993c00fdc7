use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ActivityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SampleType {
    MindfulSession,
    StepCount,
    Workout,
    SleepAnalysis,
}

impl SampleType {
    pub fn identifier(&self) -> &'static str {
        match self {
            SampleType::MindfulSession => "mindful_session",
            SampleType::StepCount => "step_count",
            SampleType::Workout => "workout",
            SampleType::SleepAnalysis => "sleep_analysis",
        }
    }

    pub fn from_identifier(value: &str) -> Option<Self> {
        match value {
            "mindful_session" => Some(SampleType::MindfulSession),
            "step_count" => Some(SampleType::StepCount),
            "workout" => Some(SampleType::Workout),
            "sleep_analysis" => Some(SampleType::SleepAnalysis),
            _ => None,
        }
    }

    pub fn activity(&self) -> ActivityType {
        match self {
            SampleType::MindfulSession => ActivityType::Mindfulness,
            SampleType::StepCount => ActivityType::Steps,
            SampleType::Workout => ActivityType::Workout,
            SampleType::SleepAnalysis => ActivityType::Sleep,
        }
    }
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleTypeSet {
    types: BTreeSet<SampleType>,
}

impl SampleTypeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_activities<I>(activities: I) -> Self
    where
        I: IntoIterator<Item = ActivityType>,
    {
        activities
            .into_iter()
            .map(crate::resolver::resolve)
            .collect()
    }

    pub fn insert(&mut self, sample_type: SampleType) -> bool {
        self.types.insert(sample_type)
    }

    pub fn contains(&self, sample_type: SampleType) -> bool {
        self.types.contains(&sample_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = SampleType> + '_ {
        self.types.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<SampleType> for SampleTypeSet {
    fn from_iter<I: IntoIterator<Item = SampleType>>(iter: I) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}
