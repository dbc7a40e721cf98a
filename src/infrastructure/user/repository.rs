//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{PublicUser, User, UserId, UserRepository};
use crate::domain::AuthError;

/// In-memory implementation of [`UserRepository`]
///
/// The reference backend for tests and embedding without a database.
/// Emails are expected normalized by the caller.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    /// Index for email -> user ID lookup
    email_index: Arc<RwLock<HashMap<String, UserId>>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository with initial users
    pub fn with_users(users: Vec<User>) -> Self {
        let mut users_map = HashMap::new();
        let mut email_map = HashMap::new();

        for user in users {
            email_map.insert(user.email().to_string(), *user.id());
            users_map.insert(*user.id(), user);
        }

        Self {
            users: Arc::new(RwLock::new(users_map)),
            email_index: Arc::new(RwLock::new(email_map)),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<PublicUser>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(id).map(PublicUser::from))
    }

    async fn get_with_secrets(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let email_index = self.email_index.read().await;

        if let Some(user_id) = email_index.get(email) {
            let users = self.users.read().await;
            return Ok(users.get(user_id).cloned());
        }

        Ok(None)
    }

    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        if users.contains_key(user.id()) {
            return Err(AuthError::conflict(format!(
                "User with ID '{}' already exists",
                user.id()
            )));
        }

        if email_index.contains_key(user.email()) {
            return Err(AuthError::conflict("Email is already registered"));
        }

        email_index.insert(user.email().to_string(), *user.id());
        users.insert(*user.id(), user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        let mut email_index = self.email_index.write().await;

        let Some(old_user) = users.get(user.id()) else {
            return Err(AuthError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        };

        // If the email changed, keep the index consistent
        if old_user.email() != user.email() {
            if email_index.contains_key(user.email()) {
                return Err(AuthError::conflict("Email is already registered"));
            }

            email_index.remove(old_user.email());
            email_index.insert(user.email().to_string(), *user.id());
        }

        users.insert(*user.id(), user.clone());

        Ok(user.clone())
    }

    async fn count(&self) -> Result<u64, AuthError> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }

    async fn list(&self) -> Result<Vec<PublicUser>, AuthError> {
        let users = self.users.read().await;

        let mut result: Vec<PublicUser> = users.values().map(PublicUser::from).collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;

    fn create_test_user(name: &str, email: &str) -> User {
        User::new(name, email, "salt:hash", Role::User)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Alice", "alice@example.com");

        repo.create(user.clone()).await.unwrap();

        let public = repo.get(user.id()).await.unwrap().unwrap();
        assert_eq!(public.email, "alice@example.com");

        let full = repo.get_with_secrets(user.id()).await.unwrap().unwrap();
        assert_eq!(full.password_hash(), "salt:hash");
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Alice", "alice@example.com");

        repo.create(user.clone()).await.unwrap();

        let found = repo.get_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id(), user.id());

        let missing = repo.get_by_email("bob@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("Alice", "same@example.com"))
            .await
            .unwrap();

        let result = repo.create(create_test_user("Bob", "same@example.com")).await;
        assert!(matches!(result, Err(AuthError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_persists_credential_fields() {
        let repo = InMemoryUserRepository::new();
        let mut user = create_test_user("Alice", "alice@example.com");

        repo.create(user.clone()).await.unwrap();

        user.set_refresh_token("digest", chrono::Utc::now());
        repo.update(&user).await.unwrap();

        let stored = repo.get_with_secrets(user.id()).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash(), Some("digest"));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("Ghost", "ghost@example.com");

        let result = repo.update(&user).await;
        assert!(matches!(result, Err(AuthError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_count() {
        let repo = InMemoryUserRepository::new();
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(create_test_user("Alice", "alice@example.com"))
            .await
            .unwrap();
        repo.create(create_test_user("Bob", "bob@example.com"))
            .await
            .unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("Alice", "alice@example.com"))
            .await
            .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        repo.create(create_test_user("Bob", "bob@example.com"))
            .await
            .unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].name, "Bob");
        assert_eq!(listed[1].name, "Alice");
    }

    #[tokio::test]
    async fn test_email_exists() {
        let repo = InMemoryUserRepository::new();

        repo.create(create_test_user("Alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(repo.email_exists("alice@example.com").await.unwrap());
        assert!(!repo.email_exists("bob@example.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_with_users() {
        let users = vec![
            create_test_user("Alice", "alice@example.com"),
            create_test_user("Bob", "bob@example.com"),
        ];

        let repo = InMemoryUserRepository::with_users(users);

        assert_eq!(repo.count().await.unwrap(), 2);
        assert!(repo.get_by_email("alice@example.com").await.unwrap().is_some());
    }
}
