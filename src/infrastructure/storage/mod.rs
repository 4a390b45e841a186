//! User store implementations

mod memory;
mod seed;

use std::sync::Arc;

pub use memory::InMemoryUserStore;
pub use seed::{seed_users, SeedUserStore, SEED_CREATED_ID};

use crate::config::StoreMode;
use crate::domain::UserRepository;

/// Pick the store for the configured mode.
pub fn build_user_repository(mode: StoreMode) -> Arc<dyn UserRepository> {
    match mode {
        StoreMode::Seed => Arc::new(SeedUserStore::new()),
        StoreMode::Memory => Arc::new(InMemoryUserStore::new()),
    }
}
