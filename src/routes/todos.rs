use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use bson::oid::ObjectId;
use serde_json::json;
use validator::Validate;

use super::JsonObject;
use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{CreateTodoRequest, Todo, UpdateTodoRequest},
    state::AppState,
};

const TODO_NOT_FOUND: &str = "Todo not found";

fn parse_todo_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::ValidationError("Invalid todo ID".into()))
}

/// Lists the authenticated user's to-dos, oldest first.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Todo` objects; `[]` when the user has none.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `500 Internal Server Error`: Store failure.
#[get("")]
pub async fn list_todos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let todos = state.todos.list_todos(user.id()).await?;
    Ok(HttpResponse::Ok().json(todos))
}

/// Creates a to-do owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: non-blank string.
///
/// ## Responses:
/// - `201 Created`: The new `Todo`, with `isCompleted: false`.
/// - `400 Bad Request`: Missing, empty or blank title.
/// - `401 Unauthorized`: Missing or invalid token.
/// - `500 Internal Server Error`: Store failure.
#[post("")]
pub async fn create_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_data: JsonObject<CreateTodoRequest>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;

    let todo = Todo::new(todo_data.into_inner().title, user.id());
    let created = state.todos.insert_todo(todo).await?;
    log::debug!("User {} created todo {}", user.id(), created.id);

    Ok(HttpResponse::Created().json(created))
}

/// Retrieves one of the authenticated user's to-dos.
///
/// ## Responses:
/// - `200 OK`: The `Todo`.
/// - `400 Bad Request`: `id` is not a valid identifier.
/// - `404 Not Found`: No such to-do, or it belongs to another user.
#[get("/{id}")]
pub async fn get_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo_id = parse_todo_id(&todo_id)?;

    match state.todos.find_todo(todo_id, user.id()).await? {
        Some(todo) => Ok(HttpResponse::Ok().json(todo)),
        None => Err(AppError::NotFound(TODO_NOT_FOUND.into())),
    }
}

/// Sets the completion flag of one of the authenticated user's to-dos.
///
/// Setting the flag to its current value succeeds and only refreshes `updatedAt`.
///
/// ## Request Body:
/// - `isCompleted`: boolean, required.
///
/// ## Responses:
/// - `200 OK`: The updated `Todo`.
/// - `400 Bad Request`: Invalid `id` or body.
/// - `404 Not Found`: No such to-do, or it belongs to another user.
/// - `500 Internal Server Error`: Store failure.
#[patch("/{id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
    todo_data: JsonObject<UpdateTodoRequest>,
) -> Result<impl Responder, AppError> {
    let todo_id = parse_todo_id(&todo_id)?;

    let updated = state
        .todos
        .set_completed(todo_id, user.id(), todo_data.is_completed)
        .await?
        .ok_or_else(|| AppError::NotFound(TODO_NOT_FOUND.into()))?;

    Ok(HttpResponse::Ok().json(updated))
}

/// Permanently deletes one of the authenticated user's to-dos.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Todo deleted successfully"}`.
/// - `400 Bad Request`: Invalid `id`.
/// - `404 Not Found`: No such to-do, or it belongs to another user.
/// - `500 Internal Server Error`: Store failure.
#[delete("/{id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    todo_id: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let todo_id = parse_todo_id(&todo_id)?;

    if !state.todos.delete_todo(todo_id, user.id()).await? {
        return Err(AppError::NotFound(TODO_NOT_FOUND.into()));
    }
    log::debug!("User {} deleted todo {}", user.id(), todo_id);

    Ok(HttpResponse::Ok().json(json!({ "message": "Todo deleted successfully" })))
}
