mod activity_type;
mod meditation_cache;
mod query;
mod sample;
mod sample_type;
mod time_window;

pub use activity_type::ActivityType;
pub use meditation_cache::MeditationCache;
pub use query::{QueryDescriptor, SortOrder, StatisticsBucket, StatisticsDescriptor};
pub use sample::{render_samples, SampleId, SampleRecord, SampleValue, SleepStage};
pub use sample_type::{SampleType, SampleTypeSet};
pub use time_window::{TimeWindow, TimeWindowError};
