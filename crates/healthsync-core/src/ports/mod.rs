mod consent_prompt;
mod display_sink;
mod health_store;

pub use consent_prompt::{Access, ConsentPrompt};
pub use display_sink::DisplaySink;
pub use health_store::{HealthStore, StoreError};
