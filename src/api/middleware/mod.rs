pub mod auth;
pub mod request_id;

pub use auth::{BearerAuth, bearer_from_header, strip_bearer};
pub use request_id::{RequestId, RequestIdMiddleware};
