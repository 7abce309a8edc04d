use crate::error::AppError;
use bcrypt::{hash, verify};

/// Lowest and highest work factors bcrypt accepts.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;
/// bcrypt only reads this many bytes of input; anything longer is refused
/// rather than silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// bcrypt hashing with a fixed work factor.
///
/// Every digest embeds its own random salt, so hashing the same password twice
/// yields different digests that both verify.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        check_length(password)?;
        hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// A malformed stored digest is an internal error, not a mismatch.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, AppError> {
        check_length(password)?;
        verify(password, digest)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }
}

fn check_length(password: &str) -> Result<(), AppError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}
