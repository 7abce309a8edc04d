use chrono::{DateTime, Utc};
use bson::oid::ObjectId;

/// A registered account as held by the credential store.
///
/// Only the bcrypt digest of the password is ever kept. `User` is deliberately
/// not `Serialize`: it never leaves the server.
#[derive(Debug, Clone)]
pub struct User {
    pub id: ObjectId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to persist a new account. The store assigns the id and timestamps.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl User {
    pub fn new(input: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            username: input.username,
            email: input.email,
            password_hash: input.password_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
