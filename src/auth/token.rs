use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject of the token: the user's id as a hex ObjectId.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and validates HS256 identity tokens.
///
/// Keys are derived once from the configured secret. Tokens are stateless: a
/// token is valid exactly when its signature checks out against this secret and
/// its `exp` has not passed.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired: no grace period past `exp`.
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issues a token for `user_id` that expires 24 hours from now.
    pub fn issue(&self, user_id: ObjectId) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `issued_at`.
    pub fn issue_at(&self, user_id: ObjectId, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let expires_at = issued_at + Duration::hours(TOKEN_TTL_HOURS);
        let claims = Claims {
            sub: user_id.to_hex(),
            iat: issued_at.timestamp().max(0) as usize,
            exp: expires_at.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature and expiry, then resolves the subject to a user id.
    ///
    /// The returned error always says why, for logging. Callers facing the client
    /// must not forward it.
    pub fn validate(&self, token: &str) -> Result<ObjectId, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)?;

        ObjectId::parse_str(&claims.sub)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token subject: {}", e)))
    }
}
