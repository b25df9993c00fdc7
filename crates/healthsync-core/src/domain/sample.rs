use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::SampleType;

pub type SampleId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SampleValue {
    Quantity {
        value: f64,
        unit: String,
    },
    Category {
        value: i64,
    },
    Workout {
        activity: String,
        duration_seconds: i64,
        energy_kcal: Option<f64>,
        distance_meters: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepStage {
    InBed,
    Asleep,
    Awake,
    Core,
    Deep,
    Rem,
}

impl SleepStage {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(SleepStage::InBed),
            1 => Some(SleepStage::Asleep),
            2 => Some(SleepStage::Awake),
            3 => Some(SleepStage::Core),
            4 => Some(SleepStage::Deep),
            5 => Some(SleepStage::Rem),
            _ => None,
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            SleepStage::InBed => 0,
            SleepStage::Asleep => 1,
            SleepStage::Awake => 2,
            SleepStage::Core => 3,
            SleepStage::Deep => 4,
            SleepStage::Rem => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SleepStage::InBed => "in bed",
            SleepStage::Asleep => "asleep",
            SleepStage::Awake => "awake",
            SleepStage::Core => "core",
            SleepStage::Deep => "deep",
            SleepStage::Rem => "rem",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub id: Option<SampleId>,
    pub sample_type: SampleType,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub value: SampleValue,
    pub source: String,
}

impl SampleRecord {
    pub fn steps(start: DateTime<Utc>, end: DateTime<Utc>, count: f64) -> Self {
        Self::new(
            SampleType::StepCount,
            start,
            end,
            SampleValue::Quantity {
                value: count,
                unit: "count".to_string(),
            },
        )
    }

    pub fn mindful_session(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(
            SampleType::MindfulSession,
            start,
            end,
            SampleValue::Category { value: 0 },
        )
    }

    pub fn sleep(start: DateTime<Utc>, end: DateTime<Utc>, stage: SleepStage) -> Self {
        Self::new(
            SampleType::SleepAnalysis,
            start,
            end,
            SampleValue::Category {
                value: stage.value(),
            },
        )
    }

    pub fn workout(start: DateTime<Utc>, end: DateTime<Utc>, activity: &str) -> Self {
        let duration_seconds = end.signed_duration_since(start).num_seconds();
        Self::new(
            SampleType::Workout,
            start,
            end,
            SampleValue::Workout {
                activity: activity.to_string(),
                duration_seconds,
                energy_kcal: None,
                distance_meters: None,
            },
        )
    }

    fn new(
        sample_type: SampleType,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        value: SampleValue,
    ) -> Self {
        Self {
            id: None,
            sample_type,
            start,
            end,
            value,
            source: "healthsync".to_string(),
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn quantity(&self) -> Option<f64> {
        match self.value {
            SampleValue::Quantity { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn duration_seconds(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_seconds()
    }
}

impl std::fmt::Display for SampleRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{} - {}] ",
            self.sample_type,
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )?;

        match &self.value {
            SampleValue::Quantity { value, unit } => write!(f, "{} {}", value, unit)?,
            SampleValue::Category { value } => match self.sample_type {
                SampleType::SleepAnalysis => match SleepStage::from_value(*value) {
                    Some(stage) => write!(f, "{}", stage.label())?,
                    None => write!(f, "stage {}", value)?,
                },
                _ => write!(f, "{} min", self.duration_seconds() / 60)?,
            },
            SampleValue::Workout {
                activity,
                duration_seconds,
                energy_kcal,
                distance_meters,
            } => {
                write!(f, "{} {} min", activity, duration_seconds / 60)?;
                if let Some(distance) = distance_meters {
                    write!(f, ", {:.0} m", distance)?;
                }
                if let Some(energy) = energy_kcal {
                    write!(f, ", {:.0} kcal", energy)?;
                }
            }
        }

        write!(f, " ({})", self.source)
    }
}

pub fn render_samples(samples: &[SampleRecord]) -> String {
    let mut lines = Vec::with_capacity(samples.len() + 1);
    lines.push(format!("{} sample(s)", samples.len()));
    lines.extend(samples.iter().map(|sample| format!("  {}", sample)));
    lines.join("\n")
}
