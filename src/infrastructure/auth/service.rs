//! Authentication session service
//!
//! Orchestrates password hashing, token signing, the lockout policy and
//! refresh-token rotation against the user repository. A stored refresh
//! token moves from issued to rotated (new pair), revoked (logout) or
//! expired; only the current digest is ever honored.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use crate::config::AuthConfig;
use crate::domain::lockout::LockoutPolicy;
use crate::domain::user::{
    normalize_email, validate_email, validate_name, validate_password, PublicUser, Role, User,
    UserId, UserRepository,
};
use crate::domain::AuthError;
use crate::infrastructure::auth::duration::parse_duration;
use crate::infrastructure::auth::token::{token_digest, TokenCodec, TokenKind};
use crate::infrastructure::crypto::constant_time_eq;
use crate::infrastructure::user::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    /// Requested role; defaults to [`Role::User`]
    pub role: Option<Role>,
}

/// Successful authentication payload
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub access_token: String,
    pub refresh_token: String,
}

/// Authentication and session service
#[derive(Debug)]
pub struct AuthService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    codec: TokenCodec,
    lockout: LockoutPolicy,
    access_ttl_secs: u64,
    refresh_ttl_secs: u64,
}

impl<R: UserRepository, H: PasswordHasher> AuthService<R, H> {
    /// Create a new service from explicit configuration.
    ///
    /// TTL strings are parsed here so a malformed value fails at startup
    /// rather than on the first login.
    pub fn new(repository: Arc<R>, hasher: Arc<H>, config: &AuthConfig) -> Result<Self, AuthError> {
        let access_ttl_secs = parse_duration(&config.access_token_ttl)?;
        let refresh_ttl_secs = parse_duration(&config.refresh_token_ttl)?;

        Ok(Self {
            repository,
            hasher,
            codec: TokenCodec::new(config.token_secret.as_bytes()),
            lockout: LockoutPolicy::new(config.max_login_failures, config.lockout_duration_secs),
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }

    /// Register a new user and open a session.
    ///
    /// The first user ever created may request the admin role; after that,
    /// admin self-registration is rejected.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        validate_name(&request.name).map_err(|e| AuthError::validation(e.to_string()))?;

        let email = normalize_email(&request.email);
        validate_email(&email).map_err(|e| AuthError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| AuthError::validation(e.to_string()))?;

        if self.repository.email_exists(&email).await? {
            return Err(AuthError::conflict("Email is already registered"));
        }

        let role = request.role.unwrap_or_default();
        if role.is_admin() && self.repository.count().await? > 0 {
            return Err(AuthError::forbidden("Admin self-registration is disabled"));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(request.name.trim(), email.as_str(), password_hash, role);
        let mut user = self.repository.create(user).await?;

        info!(user_id = %user.id(), role = %user.role(), "Registered new user");

        self.open_session(&mut user).await
    }

    /// Authenticate with email and password.
    ///
    /// A locked account is rejected before any password work, without
    /// touching the failure counter. Unknown email and wrong password
    /// fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let email = normalize_email(email);

        let Some(mut user) = self.repository.get_by_email(&email).await? else {
            debug!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let now = Utc::now();

        if self.lockout.is_locked(&user, now) {
            warn!(user_id = %user.id(), "Login attempt on locked account");
            return Err(AuthError::AccountLocked);
        }

        if !self.hasher.verify(password, user.password_hash()) {
            let update = self.lockout.on_failure(&user, now);
            let locked = update.lock_until.is_some();

            user.apply_lockout(&update);
            self.repository.update(&user).await?;

            if locked {
                warn!(user_id = %user.id(), "Account locked after repeated login failures");
            } else {
                debug!(
                    user_id = %user.id(),
                    failures = user.login_failures(),
                    "Recorded login failure"
                );
            }

            return Err(AuthError::InvalidCredentials);
        }

        if let Some(update) = self.lockout.on_success(&user) {
            user.apply_lockout(&update);
        }

        debug!(user_id = %user.id(), "Login succeeded");

        self.open_session(&mut user).await
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// The presented token is single-use: rotation overwrites the stored
    /// digest, so replaying it fails the same way as an unknown token.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.codec.verify(refresh_token)?;

        if claims.kind != TokenKind::Refresh {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(user_id) = claims.user_id() else {
            return Err(AuthError::InvalidCredentials);
        };

        let Some(mut user) = self.repository.get_with_secrets(&user_id).await? else {
            return Err(AuthError::InvalidCredentials);
        };

        let now = Utc::now();
        let current = match (user.refresh_token_hash(), user.refresh_token_expires_at()) {
            (Some(stored), Some(expires_at)) if expires_at > now => constant_time_eq(
                stored.as_bytes(),
                token_digest(refresh_token).as_bytes(),
            ),
            _ => false,
        };

        if !current {
            debug!(user_id = %user.id(), "Rejected stale or unknown refresh token");
            return Err(AuthError::InvalidCredentials);
        }

        debug!(user_id = %user.id(), "Rotating refresh token");

        self.open_session(&mut user).await
    }

    /// Invalidate the stored refresh token.
    ///
    /// Access tokens already issued stay valid until their own expiry.
    pub async fn logout(&self, user_id: &UserId) -> Result<(), AuthError> {
        let Some(mut user) = self.repository.get_with_secrets(user_id).await? else {
            return Err(AuthError::not_found(format!("User '{user_id}' not found")));
        };

        user.clear_refresh_token();
        self.repository.update(&user).await?;

        info!(user_id = %user_id, "Logged out");

        Ok(())
    }

    /// Get the public view of a user
    pub async fn get_me(&self, user_id: &UserId) -> Result<PublicUser, AuthError> {
        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| AuthError::not_found(format!("User '{user_id}' not found")))
    }

    /// List public views of all users, newest first
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AuthError> {
        self.repository.list().await
    }

    /// Issue a fresh access+refresh pair and persist the rotated digest.
    ///
    /// Only the digest of the refresh token and its absolute expiry are
    /// stored; the raw token goes to the caller and nowhere else.
    async fn open_session(&self, user: &mut User) -> Result<AuthResponse, AuthError> {
        let access_token =
            self.codec
                .sign(user.id(), user.role(), TokenKind::Access, self.access_ttl_secs)?;
        let refresh_token =
            self.codec
                .sign(user.id(), user.role(), TokenKind::Refresh, self.refresh_ttl_secs)?;

        let expires_at = Utc::now() + Duration::seconds(self.refresh_ttl_secs as i64);
        user.set_refresh_token(token_digest(&refresh_token), expires_at);

        let user = self.repository.update(user).await?;

        Ok(AuthResponse {
            user: PublicUser::from(&user),
            access_token,
            refresh_token,
        })
    }
}
