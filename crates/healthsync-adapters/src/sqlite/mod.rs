mod health_store;

pub use health_store::SqliteHealthStore;
