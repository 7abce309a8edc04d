#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{http::header, test, web, App};
use serde_json::json;
use std::sync::Arc;

use todoforge::auth::{AuthResponse, PasswordHasher, TokenService};
use todoforge::routes;
use todoforge::store::MemoryStore;
use todoforge::AppState;

pub const JWT_SECRET: &str = "integration_test_secret";

/// State backed by a fresh in-memory store; bcrypt runs at its minimum cost.
pub fn test_state() -> (web::Data<AppState>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = web::Data::new(AppState::new(
        store.clone(),
        store.clone(),
        TokenService::new(JWT_SECRET),
        PasswordHasher::new(4),
    ));
    (state, store)
}

pub async fn init_app(
    state: web::Data<AppState>,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(App::new().configure(routes::configure(state))).await
}

/// Signs a user up and returns the issued token, panicking on any other outcome.
pub async fn signup(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    username: &str,
    email: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/api/auth/signup")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        actix_web::http::StatusCode::CREATED,
        "Signup failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );

    let auth: AuthResponse =
        serde_json::from_slice(&body).expect("Failed to parse signup response JSON");
    auth.token
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
