mod display_sync;
mod refresh_scheduler;

pub use display_sync::{DisplayHandle, DisplaySyncActor, WeakDisplayHandle};
pub use refresh_scheduler::RefreshSchedulerActor;
