//! # Dashboard API
//!
//! REST backend for the thesis dashboard: health, a sample user directory,
//! and a Prometheus scrape endpoint.
//!
//! ## Architecture
//!
//! - **domain**: User entity, errors and the repository trait
//! - **application**: use-case orchestration (`UserService`)
//! - **infrastructure**: concrete user stores (seed, in-memory)
//! - **interfaces**: HTTP router, handlers, middleware
//! - **server**: runtime wiring, tracing setup, graceful shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig, Environment, MetricsMode, StoreMode};
pub use interfaces::http::{create_api_router, ApiState};
pub use server::{init_tracing, ServerHandle};
