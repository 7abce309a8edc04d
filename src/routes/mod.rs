pub mod auth;
pub mod health;
pub mod json;
pub mod todos;

use actix_web::{error, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;
use crate::state::AppState;

/// Registers every route, the shared state and the JSON body rules.
///
/// Signup and signin stay outside the auth gate; every `/api/todos` route is
/// behind it.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let gate = AuthMiddleware::new(state.tokens.clone());

        cfg.app_data(state)
            .app_data(json_config())
            .service(health::health)
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .service(auth::signup)
                            .service(auth::signin),
                    )
                    .service(
                        web::scope("/todos")
                            .wrap(gate)
                            .service(todos::list_todos)
                            .service(todos::create_todo)
                            .service(todos::get_todo)
                            .service(todos::update_todo)
                            .service(todos::delete_todo),
                    ),
            );
    }
}

pub use json::JsonObject;

/// Malformed or incomplete JSON bodies become 400s with the usual `{"error"}` body.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: error::JsonPayloadError, _req: &HttpRequest| {
        AppError::ValidationError(err.to_string()).into()
    })
}
