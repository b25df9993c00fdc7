use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::{SampleRecord, SampleType, TimeWindow, TimeWindowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    OldestFirst,
    NewestFirst,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub sample_type: SampleType,
    pub predicate: Option<TimeWindow>,
    /// 0 means unbounded.
    pub limit: usize,
    pub sort: Option<SortOrder>,
}

impl QueryDescriptor {
    pub fn new(sample_type: SampleType, predicate: Option<TimeWindow>) -> Self {
        Self {
            sample_type,
            predicate,
            limit: 0,
            sort: None,
        }
    }

    pub fn matches(&self, record: &SampleRecord) -> bool {
        record.sample_type == self.sample_type
            && self
                .predicate
                .map_or(true, |window| window.overlaps(record.start, record.end))
    }

    /// Applies sort order and limit to records that already passed `matches`.
    pub fn finish(&self, mut records: Vec<SampleRecord>) -> Vec<SampleRecord> {
        match self.sort {
            Some(SortOrder::OldestFirst) => records.sort_by_key(|record| record.start),
            Some(SortOrder::NewestFirst) => {
                records.sort_by(|left, right| right.start.cmp(&left.start))
            }
            None => {}
        }

        if self.limit > 0 {
            records.truncate(self.limit);
        }

        records
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsDescriptor {
    pub sample_type: SampleType,
    pub window: TimeWindow,
    pub anchor: DateTime<Utc>,
    pub bucket: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsBucket {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub sum: f64,
}

impl StatisticsDescriptor {
    /// `days` one-day buckets anchored at UTC midnight, the last one containing `now`.
    pub fn daily(
        sample_type: SampleType,
        now: DateTime<Utc>,
        days: u32,
    ) -> Result<Self, TimeWindowError> {
        if days == 0 {
            return Err(TimeWindowError::Empty);
        }

        let anchor = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        let start = anchor - Duration::days(i64::from(days) - 1);
        // At exactly midnight `now` opens today's bucket instead of closing yesterday's.
        let end = if now > anchor {
            now
        } else {
            anchor + Duration::days(1)
        };
        let window = TimeWindow::new(start, end)?;

        Ok(Self {
            sample_type,
            window,
            anchor,
            bucket: Duration::days(1),
        })
    }

    pub fn bucket_starts(&self) -> Vec<DateTime<Utc>> {
        if self.bucket <= Duration::zero() {
            return Vec::new();
        }

        let bucket_seconds = self.bucket.num_seconds();
        let offset = (self.window.start() - self.anchor).num_seconds();
        let mut start = self.anchor + Duration::seconds(offset.div_euclid(bucket_seconds) * bucket_seconds);

        let mut starts = Vec::new();
        while start < self.window.end() {
            starts.push(start);
            start += self.bucket;
        }
        starts
    }

    pub fn accumulate<I>(&self, samples: I) -> Vec<StatisticsBucket>
    where
        I: IntoIterator<Item = (DateTime<Utc>, f64)>,
    {
        let mut buckets: Vec<StatisticsBucket> = self
            .bucket_starts()
            .into_iter()
            .map(|start| StatisticsBucket {
                start,
                end: start + self.bucket,
                sum: 0.0,
            })
            .collect();

        for (instant, value) in samples {
            if !self.window.contains(instant) {
                continue;
            }
            if let Some(bucket) = buckets
                .iter_mut()
                .find(|bucket| instant >= bucket.start && instant < bucket.end)
            {
                bucket.sum += value;
            }
        }

        buckets
    }
}
