//! # Access Tokens
//!
//! HS256 tokens issued by `POST /jwt` and verified by the token guard.
//!
//! The caller's payload is signed as-is, except for the reserved claims
//! (`email`, `role`, `iat`, `exp`) which the issuer owns. The role is taken
//! from the stored user at issuance so that read-only guards can trust it
//! without another database round-trip.

use crate::document::Document;
use crate::error::{MarketError, MarketResult};
use crate::role::Role;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

const RESERVED_CLAIMS: [&str; 4] = ["email", "role", "iat", "exp"];

/// Decoded token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Role of the stored user when the token was issued
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Expiry (unix seconds)
    pub exp: i64,

    /// Everything else the caller put in the payload
    #[serde(flatten)]
    pub extra: Document,
}

/// Signs and verifies access tokens with a shared secret
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> MarketResult<Self> {
        if secret.is_empty() {
            return Err(MarketError::Configuration(
                "token secret must not be empty".to_string(),
            ));
        }
        if ttl_secs <= 0 {
            return Err(MarketError::Configuration(format!(
                "token lifetime must be positive, got {}s",
                ttl_secs
            )));
        }

        // Caller payloads may carry `aud`; no audience is enforced.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs,
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a caller payload, stamping the stored role and expiry.
    pub fn issue(&self, mut payload: Document, role: Option<Role>) -> MarketResult<String> {
        let email = payload
            .get("email")
            .and_then(|v| v.as_str())
            .map(String::from);
        for key in RESERVED_CLAIMS {
            payload.remove(key);
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            email,
            role,
            iat: now,
            exp: now + self.ttl_secs,
            extra: payload,
        };

        debug!(email = ?claims.email, role = ?claims.role, "issuing token");

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| MarketError::Internal(format!("failed to sign token: {}", e)))
    }

    /// Verify signature and expiry; any failure is `Unauthorized`.
    pub fn verify(&self, token: &str) -> MarketResult<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("token rejected: {}", e);
                MarketError::unauthorized()
            })
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
