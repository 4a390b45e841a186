//! Shared HTTP plumbing

pub mod error;
pub mod fault;
pub mod payload;

pub use error::{not_found, ApiError, ErrorBody};
pub use fault::{fault_middleware, panic_response, FaultDetail};
pub use payload::{PayloadRejection, ValidatedPayload};
