//! HMAC-signed compact token codec
//!
//! Tokens are three URL-safe base64 segments, `header.payload.signature`,
//! signed with HMAC-SHA256 under a process-wide secret. Both access and
//! refresh tokens use this format, distinguished by the `typ` claim.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::user::{Role, UserId};
use crate::domain::AuthError;
use crate::infrastructure::crypto::constant_time_eq;

type HmacSha256 = Hmac<Sha256>;

/// Kind of token carried in the `typ` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented on authenticated requests
    Access,
    /// Long-lived token exchanged for a new pair
    Refresh,
}

/// Claims carried in a token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Role of the subject at signing time
    pub role: Role,
    /// Token kind
    #[serde(rename = "typ")]
    pub kind: TokenKind,
    /// Unique token ID; keeps tokens minted within the same second distinct
    pub jti: String,
    /// Issued at (Unix epoch seconds)
    pub iat: i64,
    /// Expires at (Unix epoch seconds)
    pub exp: i64,
}

impl Claims {
    /// Parse the subject as a user ID
    pub fn user_id(&self) -> Option<UserId> {
        UserId::parse(&self.sub)
    }
}

#[derive(Serialize)]
struct Header {
    alg: &'static str,
    typ: &'static str,
}

/// Signs and verifies compact authentication tokens
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl TokenCodec {
    /// Create a codec signing with the given secret
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Sign a token for a user, valid for `ttl_secs` from now
    pub fn sign(
        &self,
        user_id: &UserId,
        role: Role,
        kind: TokenKind,
        ttl_secs: u64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl_secs as i64,
        };

        self.sign_claims(&claims)
    }

    fn sign_claims(&self, claims: &Claims) -> Result<String, AuthError> {
        let header = serde_json::to_vec(&Header {
            alg: "HS256",
            typ: "JWT",
        })
        .map_err(|e| AuthError::internal(format!("Failed to encode token header: {e}")))?;

        let payload = serde_json::to_vec(claims)
            .map_err(|e| AuthError::internal(format!("Failed to encode token payload: {e}")))?;

        let unsigned = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header),
            URL_SAFE_NO_PAD.encode(payload)
        );
        let signature = self.signature(&unsigned)?;

        Ok(format!("{unsigned}.{signature}"))
    }

    fn signature(&self, unsigned: &str) -> Result<String, AuthError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| AuthError::configuration(format!("Invalid signing secret: {e}")))?;
        mac.update(unsigned.as_bytes());

        Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
    }

    /// Verify a token and return its claims.
    ///
    /// Checks, in order: segment shape, signature (length-checked,
    /// constant-time), payload decodability, and strict expiry.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut segments = token.split('.');
        let (Some(header), Some(payload), Some(signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AuthError::TokenMalformed);
        };

        let unsigned = format!("{header}.{payload}");
        let expected = self.signature(&unsigned)?;

        if !constant_time_eq(signature.as_bytes(), expected.as_bytes()) {
            return Err(AuthError::TokenInvalid);
        }

        let payload_bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|_| AuthError::TokenMalformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload_bytes).map_err(|_| AuthError::TokenMalformed)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }
}

/// SHA-256 hex digest of a token string.
///
/// Refresh tokens are only ever persisted in this form.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
