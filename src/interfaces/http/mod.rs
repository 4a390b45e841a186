//! HTTP REST API interfaces
//!
//! - `common`: error body, fault normalisation, body extractor
//! - `modules`: route handlers per resource
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiState};
