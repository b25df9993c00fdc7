mod permission_gateway;
mod query_service;
mod sample_writer;
pub mod single_shot;
#[cfg(test)]
mod test_support;

pub use permission_gateway::{AuthorizationError, PermissionGateway, PermissionRequest};
pub use query_service::{QueryError, QueryOptions, QueryOutcome, QueryService, QueryStream};
pub use sample_writer::SampleWriter;
pub use single_shot::{Completer, SingleShot};
