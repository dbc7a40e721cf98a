//! Token signing and session orchestration

mod duration;
mod service;
mod token;

pub use duration::parse_duration;
pub use service::{AuthResponse, AuthService, RegisterRequest};
pub use token::{token_digest, Claims, TokenCodec, TokenKind};
