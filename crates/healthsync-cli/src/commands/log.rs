use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{DateTime, Duration, Utc};
use healthsync_core::{ActivityType, SampleRecord, SampleWriter, SleepStage};

use crate::store::{load_config, open_store};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub minutes: u32,
    pub count: Option<f64>,
    pub stage: Option<String>,
    pub kind: String,
}

pub async fn execute(activity: &str, entry: LogEntry) -> Result<()> {
    let Some(activity) = ActivityType::parse(activity) else {
        bail!(
            "unknown activity '{}', expected mindfulness, steps, workout or sleep",
            activity
        );
    };

    let record = build_record(activity, &entry, Utc::now())?;
    let config = load_config();
    let writer = SampleWriter::new(Arc::new(open_store(&config)?));

    match writer.save(record.clone()).await {
        Ok(id) => println!("🟢 Saved #{}: {}", id, record),
        Err(error) => {
            eprintln!("Error: {}", error);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn build_record(
    activity: ActivityType,
    entry: &LogEntry,
    now: DateTime<Utc>,
) -> Result<SampleRecord> {
    if entry.minutes == 0 {
        bail!("--minutes must be positive");
    }
    let start = now - Duration::minutes(i64::from(entry.minutes));

    let record = match activity {
        ActivityType::Mindfulness => SampleRecord::mindful_session(start, now),
        ActivityType::Steps => {
            let Some(count) = entry.count else {
                bail!("--count is required for steps");
            };
            if !count.is_finite() || count < 0.0 {
                bail!("--count must be a finite, non-negative number");
            }
            SampleRecord::steps(start, now, count)
        }
        ActivityType::Sleep => {
            let stage = match entry.stage.as_deref() {
                Some(label) => parse_stage(label)?,
                None => SleepStage::Asleep,
            };
            SampleRecord::sleep(start, now, stage)
        }
        ActivityType::Workout => SampleRecord::workout(start, now, &entry.kind),
    };

    Ok(record)
}

fn parse_stage(label: &str) -> Result<SleepStage> {
    match label.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
        "inbed" => Ok(SleepStage::InBed),
        "asleep" => Ok(SleepStage::Asleep),
        "awake" => Ok(SleepStage::Awake),
        "core" => Ok(SleepStage::Core),
        "deep" => Ok(SleepStage::Deep),
        "rem" => Ok(SleepStage::Rem),
        _ => bail!("unknown sleep stage '{}'", label),
    }
}
