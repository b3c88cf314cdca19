pub mod shared_secret;
pub mod tracing_middleware;

pub use shared_secret::{verify_shared_secret, SECRET_HEADER};
pub use tracing_middleware::{TracingMiddleware, TRACE_ID_HEADER};
