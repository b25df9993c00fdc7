use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use healthsync_core::{QueryService, StatisticsBucket};
use serde::Serialize;

use crate::store::{load_config, open_store};

#[derive(Serialize)]
struct DailyStepsOutput {
    date: String,
    steps: u64,
}

pub async fn execute(days: Option<u32>, json: bool) -> Result<()> {
    let config = load_config();
    let days = days.unwrap_or(config.statistics.step_days);
    let store = Arc::new(open_store(&config)?);
    let service = QueryService::new(store);

    let buckets = service.daily_step_totals(Utc::now(), days).await?;
    let rows = to_rows(&buckets);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_formatted(&rows);
    }

    Ok(())
}

fn to_rows(buckets: &[StatisticsBucket]) -> Vec<DailyStepsOutput> {
    buckets
        .iter()
        .map(|bucket| DailyStepsOutput {
            date: bucket.start.format("%Y-%m-%d").to_string(),
            steps: bucket.sum.max(0.0).round() as u64,
        })
        .collect()
}

fn print_formatted(rows: &[DailyStepsOutput]) {
    if rows.is_empty() {
        println!("⚪ No step statistics available");
        return;
    }

    let total: u64 = rows.iter().map(|row| row.steps).sum();
    let best = rows.iter().map(|row| row.steps).max().unwrap_or(0);

    for row in rows {
        println!("   {}  {:>7}  {}", row.date, row.steps, bar(row.steps, best));
    }
    println!();
    println!("   Total: {} steps", total);
    println!("   Daily average: {} steps", total / rows.len() as u64);
}

fn bar(value: u64, best: u64) -> String {
    const WIDTH: u64 = 30;
    if best == 0 {
        return String::new();
    }
    "█".repeat((value * WIDTH / best) as usize)
}
