use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::Utc;
use healthsync_core::{
    render_samples, ActivityType, QueryOptions, QueryOutcome, QueryService, SampleRecord,
    SortOrder, TimeWindow,
};

use crate::store::{load_config, open_store};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryScope {
    Configured,
    LastHours(u32),
    All,
}

pub async fn execute(
    activity: &str,
    scope: QueryScope,
    limit: usize,
    newest_first: bool,
    json: bool,
) -> Result<()> {
    let Some(activity) = ActivityType::parse(activity) else {
        bail!(
            "unknown activity '{}', expected mindfulness, steps, workout or sleep",
            activity
        );
    };

    let config = load_config();
    let store = Arc::new(open_store(&config)?);
    let service = QueryService::new(store).with_window_hours(config.query.window_hours);

    let options = build_options(&service, scope, limit, newest_first)?;

    match service.get_data_with(activity, options).outcome().await {
        QueryOutcome::Succeeded(samples) => print_samples(activity, &samples, json)?,
        QueryOutcome::Failed(error) => {
            if json {
                println!("{}", serde_json::json!({ "error": error.to_string() }));
            } else {
                eprintln!("Error in {}: {}", activity, error);
            }
            std::process::exit(1);
        }
        QueryOutcome::Empty => {
            if json {
                println!("{}", serde_json::json!({ "error": "data type unavailable" }));
            } else {
                println!("⚪ No {} data type available on this store", activity);
            }
        }
    }

    Ok(())
}

fn build_options(
    service: &QueryService,
    scope: QueryScope,
    limit: usize,
    newest_first: bool,
) -> Result<QueryOptions> {
    let now = Utc::now();
    let window = match scope {
        QueryScope::Configured => Some(service.default_window(now)),
        QueryScope::LastHours(hours) => Some(TimeWindow::last_hours(now, hours)?),
        QueryScope::All => None,
    };

    Ok(QueryOptions {
        window,
        limit,
        sort: Some(if newest_first {
            SortOrder::NewestFirst
        } else {
            SortOrder::OldestFirst
        }),
    })
}

fn print_samples(activity: ActivityType, samples: &[SampleRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(samples)?);
    } else {
        println!("{}: {}", activity, render_samples(samples));
    }
    Ok(())
}
