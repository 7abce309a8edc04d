use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use bson::oid::ObjectId;
use std::future::{ready, Ready};

use crate::error::AppError;

/// The identity resolved by `AuthMiddleware`, taken by handlers as a parameter.
///
/// Only the middleware creates one, after a successful token validation. On a
/// route without the middleware the extractor fails with 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub ObjectId);

impl AuthenticatedUser {
    pub fn id(&self) -> ObjectId {
        self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().copied() {
            Some(user) => ready(Ok(user)),
            None => {
                log::error!("AuthenticatedUser requested on ungated route {}", req.path());
                ready(Err(AppError::Unauthorized("Unauthorized".to_string()).into()))
            }
        }
    }
}
