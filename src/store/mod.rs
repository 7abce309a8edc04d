//! Persistence boundary for users and to-dos.
//!
//! Handlers depend only on the [`UserStore`] and [`TodoStore`] traits. Every to-do
//! operation takes the caller's id alongside the to-do id and implementations must
//! filter on both, so a to-do owned by someone else behaves exactly like a missing one.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::oid::ObjectId;
use std::fmt;

use crate::models::{NewUser, Todo, User};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Failures reported by a store implementation.
#[derive(Debug)]
pub enum StoreError {
    /// A unique constraint was violated; carries the offending key.
    DuplicateKey(String),
    /// Any other driver or connectivity failure.
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::DuplicateKey(key) => write!(f, "duplicate key: {}", key),
            StoreError::Backend(msg) => write!(f, "store backend error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up an account by its (exact) email address.
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Looks up an account by its (exact) username.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Persists a new account. Fails with [`StoreError::DuplicateKey`] if the email
    /// or the username is taken.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All to-dos owned by `owner`, oldest first. Empty when there are none.
    async fn list_todos(&self, owner: ObjectId) -> StoreResult<Vec<Todo>>;

    async fn insert_todo(&self, todo: Todo) -> StoreResult<Todo>;

    async fn find_todo(&self, id: ObjectId, owner: ObjectId) -> StoreResult<Option<Todo>>;

    /// Sets the completion flag and bumps `updated_at` in one atomic step,
    /// returning the updated document. `None` if no to-do matches `(id, owner)`.
    async fn set_completed(
        &self,
        id: ObjectId,
        owner: ObjectId,
        is_completed: bool,
    ) -> StoreResult<Option<Todo>>;

    /// Returns `false` if no to-do matched `(id, owner)`.
    async fn delete_todo(&self, id: ObjectId, owner: ObjectId) -> StoreResult<bool>;
}
