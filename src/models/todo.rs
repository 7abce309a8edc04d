use chrono::{DateTime, Utc};
use bson::{oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A to-do item as returned by the API.
///
/// Serializes to `{id, userId, title, isCompleted, createdAt, updatedAt}` with both
/// identifiers rendered as 24-character hex strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier of the to-do.
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub id: ObjectId,
    /// Owning user. Fixed at creation.
    #[serde(serialize_with = "serialize_object_id_as_hex_string")]
    pub user_id: ObjectId,
    pub title: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates an open to-do owned by `owner`, stamped with the current time.
    pub fn new(title: String, owner: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            user_id: owner,
            title,
            is_completed: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `POST /api/todos`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    /// Must contain at least one non-whitespace character.
    #[validate(length(min = 1), custom = "validate_not_blank")]
    pub title: String,
}

/// Body of `PATCH /api/todos/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}
