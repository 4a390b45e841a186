use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::DomainError;

/// User role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    #[default]
    User,
    /// Any other label supplied on create, kept verbatim.
    Other(String),
}

impl UserRole {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for UserRole {
    fn from(label: &str) -> Self {
        match label {
            "admin" => Self::Admin,
            "user" => Self::User,
            other => Self::Other(other.to_string()),
        }
    }
}

/// User model
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A user about to be stored. The store assigns the id.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Build a new user stamped with the current time.
    ///
    /// `name` and `email` must be non-empty; `email` format is not checked.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        role: Option<UserRole>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        let email = email.into();
        if name.is_empty() || email.is_empty() {
            return Err(DomainError::Validation(
                "Name and email are required".to_string(),
            ));
        }

        Ok(Self {
            name,
            email,
            role: role.unwrap_or_default(),
            created_at: Utc::now(),
        })
    }

    pub fn with_id(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_defaults_to_user() {
        let new_user = NewUser::new("Test", "t@example.com", None).unwrap();
        assert_eq!(new_user.role, UserRole::User);
    }

    #[test]
    fn empty_name_or_email_is_rejected() {
        assert!(matches!(
            NewUser::new("", "t@example.com", None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            NewUser::new("Test", "", Some(UserRole::Admin)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn email_format_is_not_checked() {
        let new_user = NewUser::new("Test", "not-an-email", None).unwrap();
        assert_eq!(new_user.email, "not-an-email");
    }

    #[test]
    fn unknown_role_labels_are_kept_verbatim() {
        assert_eq!(UserRole::from("admin"), UserRole::Admin);
        assert_eq!(UserRole::from("user"), UserRole::User);
        assert_eq!(UserRole::from("Admin").as_str(), "Admin");
        assert_eq!(
            UserRole::from("owner"),
            UserRole::Other("owner".to_string())
        );
    }

    #[test]
    fn with_id_keeps_creation_timestamp() {
        let new_user = NewUser::new("Test", "t@example.com", None).unwrap();
        let created_at = new_user.created_at;
        let user = new_user.with_id(7);
        assert_eq!(user.id, 7);
        assert_eq!(user.created_at, created_at);
    }
}
