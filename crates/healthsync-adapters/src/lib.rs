//! HealthSync adapters - Infrastructure implementations
//!
//! This crate contains concrete implementations of the ports defined in
//! healthsync-core: the local SQLite health store, consent policies, the log
//! display surface, and in-memory doubles for tests.

pub mod consent;
pub mod display;
pub mod sqlite;
pub mod testing;

pub use consent::{non_interactive_consent, DeferredConsent, FixedConsent};
pub use display::TracingDisplay;
pub use sqlite::SqliteHealthStore;
pub use testing::{FailingHealthStore, InMemoryHealthStore};
