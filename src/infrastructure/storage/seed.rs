//! Read-only seed store
//!
//! Serves the three sample users. Lookup matches only the literal path
//! segment `"1"`, and created users are echoed with a fixed id without
//! being retained.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use tracing::debug;

use crate::domain::{DomainResult, NewUser, User, UserRepository, UserRole};

/// Id given to every user created against the seed store.
pub const SEED_CREATED_ID: u64 = 4;

/// The only identifier the seed store resolves.
const RESOLVABLE_ID: &str = "1";

fn timestamp(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

/// Sample users present at process start.
pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: UserRole::Admin,
            created_at: timestamp(2024, 1, 15, 10, 30),
        },
        User {
            id: 2,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            role: UserRole::User,
            created_at: timestamp(2024, 2, 3, 9, 12),
        },
        User {
            id: 3,
            name: "Charlie".to_string(),
            email: "charlie@example.com".to_string(),
            role: UserRole::User,
            created_at: timestamp(2024, 3, 21, 14, 45),
        },
    ]
}

pub struct SeedUserStore {
    users: Vec<User>,
}

impl SeedUserStore {
    pub fn new() -> Self {
        Self {
            users: seed_users(),
        }
    }
}

impl Default for SeedUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for SeedUserStore {
    async fn list(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.clone())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>> {
        if id != RESOLVABLE_ID {
            return Ok(None);
        }
        Ok(self.users.iter().find(|u| u.id == 1).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> DomainResult<User> {
        debug!(email = %new_user.email, "Seed store echoes created user without retaining it");
        Ok(new_user.with_id(SEED_CREATED_ID))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lists_three_seed_users() {
        let store = SeedUserStore::new();
        let users = store.list().await.unwrap();
        let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, ["Alice", "Bob", "Charlie"]);
        assert_eq!(users[0].role, UserRole::Admin);
        assert_eq!(users[0].created_at.to_rfc3339(), "2024-01-15T10:30:00+00:00");
    }

    #[tokio::test]
    async fn only_literal_one_resolves() {
        let store = SeedUserStore::new();
        assert_eq!(store.find_by_id("1").await.unwrap().unwrap().name, "Alice");

        for id in ["2", "3", "01", " 1", "1.0", "999", "abc", ""] {
            assert!(
                store.find_by_id(id).await.unwrap().is_none(),
                "id {:?} should not resolve",
                id
            );
        }
    }

    #[tokio::test]
    async fn insert_echoes_without_retaining() {
        let store = SeedUserStore::new();
        let new_user = NewUser::new("Test", "t@example.com", None).unwrap();

        let created = store.insert(new_user).await.unwrap();
        assert_eq!(created.id, SEED_CREATED_ID);
        assert_eq!(created.name, "Test");

        let again = store
            .insert(NewUser::new("Other", "o@example.com", None).unwrap())
            .await
            .unwrap();
        assert_eq!(again.id, SEED_CREATED_ID);

        assert_eq!(store.list().await.unwrap().len(), 3);
        assert!(store.find_by_id("4").await.unwrap().is_none());
    }
}
