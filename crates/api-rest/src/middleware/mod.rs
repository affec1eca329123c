//! HTTP middleware

pub mod logging;
pub mod timeout;

pub use logging::{logging_middleware, request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use timeout::{timeout_middleware, RequestTimeout};
