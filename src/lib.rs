//! Job board authentication subsystem
//!
//! The authentication/session core of the job board backend:
//! - HMAC-signed compact tokens (access + refresh) with a hand-rolled codec
//! - Argon2id password hashing in `salt:derivedKeyHex` form
//! - Login-failure counting with temporary lockout windows
//! - Refresh-token rotation with server-side invalidation
//!
//! Persistence stays behind the [`UserRepository`] contract; the HTTP
//! layer, request validation and the job/application CRUD surface live in
//! the surrounding application, not here.
//!
//! ## Quick start
//!
//! ```ignore
//! use std::sync::Arc;
//! use jobboard_auth::{
//!     AppConfig, Argon2Hasher, AuthService, InMemoryUserRepository, RegisterRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), jobboard_auth::AuthError> {
//!     let config = AppConfig::load()?;
//!
//!     let service = AuthService::new(
//!         Arc::new(InMemoryUserRepository::new()),
//!         Arc::new(Argon2Hasher::new()),
//!         &config.auth,
//!     )?;
//!
//!     let session = service
//!         .register(RegisterRequest {
//!             name: "Alice".into(),
//!             email: "alice@example.com".into(),
//!             password: "Passw0rd!".into(),
//!             role: None,
//!         })
//!         .await?;
//!
//!     let rotated = service.refresh(&session.refresh_token).await?;
//!     service.logout(&rotated.user.id).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{AppConfig, AuthConfig, LogFormat, LoggingConfig};
pub use domain::user::{PublicUser, Role, User, UserId, UserRepository};
pub use domain::{AuthError, LockoutPolicy, LockoutUpdate};
pub use infrastructure::auth::{
    parse_duration, AuthResponse, AuthService, Claims, TokenCodec, TokenKind,
};
pub use infrastructure::logging::init_logging;
pub use infrastructure::user::{Argon2Hasher, InMemoryUserRepository, PasswordHasher};
