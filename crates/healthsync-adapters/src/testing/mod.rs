mod failing_store;
mod in_memory_store;

pub use failing_store::FailingHealthStore;
pub use in_memory_store::InMemoryHealthStore;
