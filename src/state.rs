use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::store::{TodoStore, UserStore};

/// Shared application state, built once at startup and handed to actix-web as
/// `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub tokens: Arc<TokenService>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        todos: Arc<dyn TodoStore>,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> Self {
        Self {
            users,
            todos,
            tokens: Arc::new(tokens),
            hasher,
        }
    }
}
