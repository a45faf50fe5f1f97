//! HTTP middleware.

mod request_logger;

pub use request_logger::{PageOutcome, RequestKind, RequestLogger};
