use actix_web::{post, web, HttpResponse, Responder};
use validator::Validate;

use super::JsonObject;
use crate::{
    auth::{AuthResponse, SigninRequest, SignupRequest},
    error::AppError,
    models::NewUser,
    state::AppState,
};

/// Same message for an unknown email and a wrong password.
const INVALID_CREDENTIALS: &str = "Invalid credentials";
const USER_EXISTS: &str = "User already exists";

/// Register a new user
///
/// Creates the account and returns a token, so the client is signed in
/// immediately.
///
/// ## Responses:
/// - `201 Created`: `{"message", "token"}`.
/// - `400 Bad Request`: Malformed body, or username/email/password fails validation.
/// - `409 Conflict`: The email or the username is already registered.
/// - `500 Internal Server Error`: Store, hashing or signing failure.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    signup_data: JsonObject<SignupRequest>,
) -> Result<impl Responder, AppError> {
    signup_data.validate()?;
    let SignupRequest {
        username,
        email,
        password,
    } = signup_data.into_inner();

    if state.users.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict(USER_EXISTS.into()));
    }
    if state.users.find_user_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict(USER_EXISTS.into()));
    }

    let password_hash = state.hasher.hash(&password)?;

    // A concurrent signup for the same email or username loses here on a unique index.
    let user = state
        .users
        .insert_user(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;
    log::info!("Registered user {}", user.id);

    let token = state.tokens.issue(user.id)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User created successfully".into(),
        token,
    }))
}

/// Sign in an existing user
///
/// ## Responses:
/// - `200 OK`: `{"message", "token"}`.
/// - `400 Bad Request`: Malformed body, invalid email format, or a password over 72 bytes.
/// - `401 Unauthorized`: `{"error": "Invalid credentials"}` for an unknown email or a wrong password alike.
/// - `500 Internal Server Error`: Store, hashing or signing failure.
#[post("/signin")]
pub async fn signin(
    state: web::Data<AppState>,
    signin_data: JsonObject<SigninRequest>,
) -> Result<impl Responder, AppError> {
    signin_data.validate()?;

    let user = match state.users.find_user_by_email(&signin_data.email).await? {
        Some(user) => user,
        None => {
            log::debug!("Sign-in rejected: unknown email");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }
    };

    if !state
        .hasher
        .verify(&signin_data.password, &user.password_hash)?
    {
        log::debug!("Sign-in rejected for user {}: wrong password", user.id);
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = state.tokens.issue(user.id)?;
    log::info!("User {} signed in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
    }))
}
