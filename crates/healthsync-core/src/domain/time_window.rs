use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeWindowError {
    #[error("window start {start} is not before end {end}")]
    Inverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("window length must be positive")]
    Empty,
}

/// Half-open interval `[start, end)` scoping a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeWindowError> {
        if start >= end {
            return Err(TimeWindowError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn one_day(now: DateTime<Utc>) -> Self {
        Self {
            start: now - Duration::hours(24),
            end: now,
        }
    }

    pub fn last_hours(now: DateTime<Utc>, hours: u32) -> Result<Self, TimeWindowError> {
        if hours == 0 {
            return Err(TimeWindowError::Empty);
        }
        Self::new(now - Duration::hours(i64::from(hours)), now)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// A sample spanning `[start, end]` matches when it touches the window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && end >= self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn one_day_window_spans_exactly_24_hours() {
        let instants = [
            at(0),
            at(13),
            Utc.timestamp_opt(0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap(),
        ];

        for now in instants {
            let window = TimeWindow::one_day(now);

            assert_eq!(window.end(), now);
            assert_eq!(window.duration(), Duration::hours(24));
            assert!(window.start() < window.end());
        }
    }

    #[test]
    fn new_rejects_inverted_and_empty_bounds() {
        assert!(matches!(
            TimeWindow::new(at(10), at(9)),
            Err(TimeWindowError::Inverted { .. })
        ));
        assert!(TimeWindow::new(at(10), at(10)).is_err());
        assert!(TimeWindow::new(at(9), at(10)).is_ok());
    }

    #[test]
    fn last_hours_rejects_zero() {
        assert_eq!(TimeWindow::last_hours(at(12), 0), Err(TimeWindowError::Empty));

        let window = TimeWindow::last_hours(at(12), 3).unwrap();
        assert_eq!(window.start(), at(9));
    }

    #[test]
    fn contains_is_half_open() {
        let window = TimeWindow::new(at(8), at(10)).unwrap();

        assert!(window.contains(at(8)));
        assert!(window.contains(at(9)));
        assert!(!window.contains(at(10)));
    }

    #[test]
    fn overlaps_matches_samples_crossing_the_start() {
        let window = TimeWindow::new(at(8), at(10)).unwrap();

        assert!(window.overlaps(at(6), at(9)));
        assert!(window.overlaps(at(9), at(11)));
        assert!(!window.overlaps(at(10), at(11)));
        assert!(!window.overlaps(at(5), at(7)));
    }
}
