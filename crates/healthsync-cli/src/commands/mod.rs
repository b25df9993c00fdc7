mod authorize;
mod log;
mod query;
mod status;
mod steps;

pub use authorize::execute as authorize;
pub use log::{execute as log, LogEntry};
pub use query::{execute as query, QueryScope};
pub use status::execute as status;
pub use steps::execute as steps;
