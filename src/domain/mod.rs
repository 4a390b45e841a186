//! Core entities, errors and repository interfaces.

pub mod error;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use user::{NewUser, User, UserRepository, UserRole};
