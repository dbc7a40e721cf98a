//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{PublicUser, User, UserId};
use crate::domain::AuthError;

/// Repository contract for user storage.
///
/// Methods returning [`User`] expose the sensitive record (password hash,
/// lockout state, refresh digest); methods returning [`PublicUser`] expose
/// the public projection only. Callers pick the view explicitly.
///
/// Mutations follow a read-then-write contract with no optimistic
/// concurrency: concurrent updates for the same user may race on the
/// failure counter, which is tracked best-effort.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get the public view of a user by ID
    async fn get(&self, id: &UserId) -> Result<Option<PublicUser>, AuthError>;

    /// Get the full record of a user by ID, including credential fields
    async fn get_with_secrets(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    /// Get the full record of a user by normalized email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, AuthError>;

    /// Update an existing user record as a whole
    async fn update(&self, user: &User) -> Result<User, AuthError>;

    /// Count all users
    async fn count(&self) -> Result<u64, AuthError>;

    /// List public views of all users, newest first
    async fn list(&self) -> Result<Vec<PublicUser>, AuthError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
