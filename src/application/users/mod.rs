//! User directory use-cases

pub mod service;

pub use service::{CreateUser, UserService};
