use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{StoreError, StoreResult, TodoStore, UserStore};
use crate::models::{NewUser, Todo, User};

/// In-process store with the same semantics as [`super::MongoStore`].
///
/// Each mutation happens under a single write lock, which gives the same
/// per-document atomicity the document store provides.
pub struct MemoryStore {
    users: RwLock<HashMap<ObjectId, User>>,
    todos: RwLock<HashMap<ObjectId, Todo>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            todos: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateKey(user.email));
        }
        if users.values().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateKey(user.username));
        }
        let user = User::new(user);
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn list_todos(&self, owner: ObjectId) -> StoreResult<Vec<Todo>> {
        let todos = self.todos.read().await;
        let mut owned: Vec<Todo> = todos
            .values()
            .filter(|t| t.user_id == owner)
            .cloned()
            .collect();
        // ObjectIds are generated in increasing order within a process.
        owned.sort_by_key(|t| t.id);
        Ok(owned)
    }

    async fn insert_todo(&self, todo: Todo) -> StoreResult<Todo> {
        let mut todos = self.todos.write().await;
        if todos.contains_key(&todo.id) {
            return Err(StoreError::DuplicateKey(todo.id.to_hex()));
        }
        todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn find_todo(&self, id: ObjectId, owner: ObjectId) -> StoreResult<Option<Todo>> {
        let todos = self.todos.read().await;
        Ok(todos.get(&id).filter(|t| t.user_id == owner).cloned())
    }

    async fn set_completed(
        &self,
        id: ObjectId,
        owner: ObjectId,
        is_completed: bool,
    ) -> StoreResult<Option<Todo>> {
        let mut todos = self.todos.write().await;
        match todos.get_mut(&id) {
            Some(todo) if todo.user_id == owner => {
                todo.is_completed = is_completed;
                todo.updated_at = Utc::now();
                Ok(Some(todo.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_todo(&self, id: ObjectId, owner: ObjectId) -> StoreResult<bool> {
        let mut todos = self.todos.write().await;
        match todos.get(&id) {
            Some(todo) if todo.user_id == owner => {
                todos.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
