use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{ClientOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{StoreError, StoreResult, TodoStore, UserStore};
use crate::models::{NewUser, Todo, User};

const USERS: &str = "users";
const TODOS: &str = "todos";
/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    username: String,
    email: String,
    password_hash: String,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TodoDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    user_id: ObjectId,
    title: String,
    is_completed: bool,
    created_at: bson::DateTime,
    updated_at: bson::DateTime,
}

impl From<User> for UserDocument {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: bson::DateTime::from_chrono(user.created_at),
            updated_at: bson::DateTime::from_chrono(user.updated_at),
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id,
            username: doc.username,
            email: doc.email,
            password_hash: doc.password_hash,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

impl From<Todo> for TodoDocument {
    fn from(todo: Todo) -> Self {
        Self {
            id: todo.id,
            user_id: todo.user_id,
            title: todo.title,
            is_completed: todo.is_completed,
            created_at: bson::DateTime::from_chrono(todo.created_at),
            updated_at: bson::DateTime::from_chrono(todo.updated_at),
        }
    }
}

impl From<TodoDocument> for Todo {
    fn from(doc: TodoDocument) -> Self {
        Self {
            id: doc.id,
            user_id: doc.user_id,
            title: doc.title,
            is_completed: doc.is_completed,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

impl From<MongoError> for StoreError {
    fn from(error: MongoError) -> Self {
        if let ErrorKind::Write(WriteFailure::WriteError(write_error)) = error.kind.as_ref() {
            if write_error.code == DUPLICATE_KEY_CODE {
                return StoreError::DuplicateKey(write_error.message.clone());
            }
        }
        StoreError::Backend(error.to_string())
    }
}

/// MongoDB-backed store holding the `users` and `todos` collections.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects, verifies the server answers a `ping`, and ensures the unique
    /// indexes on `users.email` and `users.username` exist.
    ///
    /// `timeout` bounds both connection establishment and server selection, so
    /// no store call waits indefinitely for an unreachable server.
    pub async fn connect(uri: &str, database: &str, timeout: Duration) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some("todoforge".to_string());
        options.connect_timeout = Some(timeout);
        options.server_selection_timeout = Some(timeout);

        let client = Client::with_options(options)?;
        let store = Self {
            db: client.database(database),
        };

        store.db.run_command(doc! { "ping": 1 }).await?;
        store.ensure_indexes().await?;
        log::info!("Connected to MongoDB database '{}'", database);

        Ok(store)
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_email).await?;

        let unique_username = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users().create_index(unique_username).await?;

        let by_owner = IndexModel::builder().keys(doc! { "userId": 1 }).build();
        self.todos().create_index(by_owner).await?;
        Ok(())
    }

    fn users(&self) -> Collection<UserDocument> {
        self.db.collection(USERS)
    }

    fn todos(&self) -> Collection<TodoDocument> {
        self.db.collection(TODOS)
    }
}

#[async_trait]
impl UserStore for MongoStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let found = self.users().find_one(doc! { "email": email }).await?;
        Ok(found.map(User::from))
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let found = self.users().find_one(doc! { "username": username }).await?;
        Ok(found.map(User::from))
    }

    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let user = User::new(user);
        self.users().insert_one(UserDocument::from(user.clone())).await?;
        Ok(user)
    }
}

#[async_trait]
impl TodoStore for MongoStore {
    async fn list_todos(&self, owner: ObjectId) -> StoreResult<Vec<Todo>> {
        let cursor = self
            .todos()
            .find(doc! { "userId": owner })
            .sort(doc! { "_id": 1 })
            .await?;
        let docs: Vec<TodoDocument> = cursor.try_collect().await?;
        Ok(docs.into_iter().map(Todo::from).collect())
    }

    async fn insert_todo(&self, todo: Todo) -> StoreResult<Todo> {
        let document = TodoDocument::from(todo);
        self.todos().insert_one(&document).await?;
        // Round-trip through the document so timestamps carry the stored precision.
        Ok(Todo::from(document))
    }

    async fn find_todo(&self, id: ObjectId, owner: ObjectId) -> StoreResult<Option<Todo>> {
        let found = self
            .todos()
            .find_one(doc! { "_id": id, "userId": owner })
            .await?;
        Ok(found.map(Todo::from))
    }

    async fn set_completed(
        &self,
        id: ObjectId,
        owner: ObjectId,
        is_completed: bool,
    ) -> StoreResult<Option<Todo>> {
        let updated = self
            .todos()
            .find_one_and_update(
                doc! { "_id": id, "userId": owner },
                doc! {
                    "$set": {
                        "isCompleted": is_completed,
                        "updatedAt": bson::DateTime::now(),
                    }
                },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(Todo::from))
    }

    async fn delete_todo(&self, id: ObjectId, owner: ObjectId) -> StoreResult<bool> {
        let result = self
            .todos()
            .delete_one(doc! { "_id": id, "userId": owner })
            .await?;
        Ok(result.deleted_count > 0)
    }
}
