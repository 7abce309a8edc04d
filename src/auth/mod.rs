pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username. At least 3 characters.
    #[validate(length(min = 3))]
    pub username: String,
    /// Must be a valid email address not already registered.
    #[validate(email)]
    pub email: String,
    /// At least 6 characters and at most 72 bytes.
    #[validate(length(min = 6), custom = "validate_password_bytes")]
    pub password: String,
}

/// Represents the payload for a sign-in request.
#[derive(Debug, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(email)]
    pub email: String,
    /// Only presence is checked here; strength rules apply at signup.
    #[validate(length(min = 1), custom = "validate_password_bytes")]
    pub password: String,
}

fn validate_password_bytes(value: &str) -> Result<(), ValidationError> {
    if value.len() > password::MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("too_long"));
    }
    Ok(())
}

/// Response body of a successful signup or signin.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The bearer token for subsequent requests.
    pub token: String,
}
