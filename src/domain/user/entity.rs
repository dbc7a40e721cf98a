//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::lockout::LockoutUpdate;

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    /// Create a new random user ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from its string form (e.g. a token subject)
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::parse_str(value).ok().map(Self)
    }

    /// Get the inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user
    #[default]
    User,
    /// Administrator
    Admin,
}

impl Role {
    /// Check if this is the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Admin => write!(f, "admin"),
        }
    }
}

/// User record as held by the store
///
/// Carries the password hash, lockout state and the refresh-token digest.
/// Never serialized; callers receive [`PublicUser`] projections instead.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique identifier for the user
    id: UserId,
    /// Display name
    name: String,
    /// Email, stored trimmed and lowercased
    email: String,
    /// Derived password hash in `salt:derivedKeyHex` form
    password_hash: String,
    /// Role of the account
    role: Role,
    /// Consecutive failed login attempts since the last success
    login_failures: u32,
    /// End of the current lock window, if any
    lock_until: Option<DateTime<Utc>>,
    /// Digest of the most recently issued refresh token
    refresh_token_hash: Option<String>,
    /// Absolute expiry of the stored refresh token
    refresh_token_expires_at: Option<DateTime<Utc>>,
    /// Creation timestamp
    created_at: DateTime<Utc>,
    /// Last update timestamp
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh ID and zeroed lockout state
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            login_failures: 0,
            lock_until: None,
            refresh_token_hash: None,
            refresh_token_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn login_failures(&self) -> u32 {
        self.login_failures
    }

    pub fn lock_until(&self) -> Option<DateTime<Utc>> {
        self.lock_until
    }

    pub fn refresh_token_hash(&self) -> Option<&str> {
        self.refresh_token_hash.as_deref()
    }

    pub fn refresh_token_expires_at(&self) -> Option<DateTime<Utc>> {
        self.refresh_token_expires_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Update the password hash
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.touch();
    }

    /// Apply a lockout policy decision to the failure counter and lock window
    pub fn apply_lockout(&mut self, update: &LockoutUpdate) {
        self.login_failures = update.login_failures;
        self.lock_until = update.lock_until;
        self.touch();
    }

    /// Store a rotated refresh-token digest and its absolute expiry.
    ///
    /// The digest and expiry are only ever written together; this and
    /// [`User::clear_refresh_token`] are the sole ways to touch the pair.
    pub fn set_refresh_token(&mut self, digest: impl Into<String>, expires_at: DateTime<Utc>) {
        self.refresh_token_hash = Some(digest.into());
        self.refresh_token_expires_at = Some(expires_at);
        self.touch();
    }

    /// Drop the stored refresh-token digest and expiry
    pub fn clear_refresh_token(&mut self) {
        self.refresh_token_hash = None;
        self.refresh_token_expires_at = None;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Public projection of a user, safe to return to callers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
