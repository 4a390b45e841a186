//! Infrastructure layer: concrete user stores.

pub mod storage;

pub use storage::{build_user_repository, InMemoryUserStore, SeedUserStore};
