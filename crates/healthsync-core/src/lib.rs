//! HealthSync core library
//!
//! Contains domain types, port definitions (traits) and the query and
//! permission services built on top of them. Store implementations live in
//! `healthsync-adapters`.

pub mod config;
pub mod domain;
pub mod ports;
pub mod resolver;
pub mod services;

pub use config::{Config, ConfigError, ConsentPolicy};
pub use domain::{
    render_samples, ActivityType, MeditationCache, QueryDescriptor, SampleId, SampleRecord,
    SampleType, SampleTypeSet, SampleValue, SleepStage, SortOrder, StatisticsBucket,
    StatisticsDescriptor, TimeWindow, TimeWindowError,
};
pub use ports::{Access, ConsentPrompt, DisplaySink, HealthStore, StoreError};
pub use resolver::{default_sample_type_set, resolve, resolve_supported, SampleTypeUnavailable};
pub use services::{
    AuthorizationError, PermissionGateway, PermissionRequest, QueryError, QueryOptions,
    QueryOutcome, QueryService, QueryStream, SampleWriter, SingleShot,
};
