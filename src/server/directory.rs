use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::Role;

const MAX_TOTAL_USERS: usize = 10_000;

/// Errors reported by a user directory.
///
/// Mirrors the storage layer's error taxonomy so an error mapper can turn them
/// into statuses without inspecting messages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// No user matches the lookup.
    #[error("User not found")]
    NotFound,
    /// A user with the same email already exists in the organization.
    #[error("User already exists")]
    AlreadyExists,
    /// The lookup key or stored record is malformed.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// The backing store could not be reached.
    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// A user as stored by the directory, including the password hash.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRecord {
    /// User id (UUID).
    pub user_id: String,
    /// Organization id (UUID).
    pub org_id: String,
    /// Sign-in email.
    pub email: String,
    /// Role within the organization.
    pub role: Role,
    /// Argon2 hash in PHC string format.
    pub password_hash: String,
}

/// Lookup of users for sign-in.
///
/// Implemented by the storage layer; [`InMemoryDirectory`] serves tests and
/// local tooling.
#[tonic::async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds the user with `email` in the organization named `org_name`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::NotFound`] if no such user exists.
    async fn read_by_email(
        &self,
        email: &str,
        org_name: &str,
    ) -> Result<UserRecord, DirectoryError>;
}

/// Directory held in process memory, keyed by organization name and email.
#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    users: Arc<RwLock<HashMap<(String, String), UserRecord>>>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user to the organization named `org_name`.
    ///
    /// Emails are compared case-insensitively.
    pub async fn insert(&self, org_name: &str, record: UserRecord) -> Result<(), DirectoryError> {
        if record.email.trim().is_empty() || !record.email.contains('@') {
            return Err(DirectoryError::InvalidFormat(format!(
                "'{}' is not an email address",
                record.email
            )));
        }

        let mut users = self.users.write().await;

        if users.len() >= MAX_TOTAL_USERS {
            return Err(DirectoryError::Unavailable(format!(
                "Directory has reached maximum user capacity ({MAX_TOTAL_USERS})"
            )));
        }

        let key = (org_name.to_string(), record.email.to_lowercase());
        if users.contains_key(&key) {
            return Err(DirectoryError::AlreadyExists);
        }

        users.insert(key, record);
        Ok(())
    }

    /// Returns the number of stored users.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[tonic::async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn read_by_email(
        &self,
        email: &str,
        org_name: &str,
    ) -> Result<UserRecord, DirectoryError> {
        let users = self.users.read().await;
        users
            .get(&(org_name.to_string(), email.to_lowercase()))
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(email: &str) -> UserRecord {
        UserRecord {
            user_id: "0b6f1f6e-5b4c-4e9a-9d3e-2f1a7c8b9d01".to_string(),
            org_id: "7d2c3b4a-1e0f-4a9b-8c7d-6e5f4a3b2c1d".to_string(),
            email: email.to_string(),
            role: Role::Viewer,
            password_hash: String::new(),
        }
    }

    #[tokio::test]
    async fn lookup_is_scoped_to_organization() {
        let directory = InMemoryDirectory::new();
        directory
            .insert("acme", record("ada@acme.test"))
            .await
            .unwrap();

        assert!(directory.read_by_email("ADA@acme.test", "acme").await.is_ok());
        assert_eq!(
            directory.read_by_email("ada@acme.test", "globex").await,
            Err(DirectoryError::NotFound)
        );
    }

    #[tokio::test]
    async fn duplicate_and_malformed_inserts_fail() {
        let directory = InMemoryDirectory::new();
        directory
            .insert("acme", record("ada@acme.test"))
            .await
            .unwrap();

        assert_eq!(
            directory.insert("acme", record("Ada@Acme.test")).await,
            Err(DirectoryError::AlreadyExists)
        );
        assert!(matches!(
            directory.insert("acme", record("ada")).await,
            Err(DirectoryError::InvalidFormat(_))
        ));
        assert_eq!(directory.user_count().await, 1);
    }
}
