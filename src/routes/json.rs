use actix_web::dev::Payload;
use actix_web::{web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::ops::Deref;

use crate::error::AppError;

/// JSON body extractor that only accepts an object.
///
/// serde lets a derived struct deserialize from a positional array, so
/// `["alice", "a@x.com", "secret1"]` would pass as a signup. The body is read as
/// a map first and only then converted into `T`. Size limits and the error
/// handler come from the registered `JsonConfig`, like `web::Json`.
#[derive(Debug)]
pub struct JsonObject<T>(pub T);

impl<T> JsonObject<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for JsonObject<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: DeserializeOwned + 'static> FromRequest for JsonObject<T> {
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let object = web::Json::<Map<String, Value>>::from_request(req, payload);

        Box::pin(async move {
            let web::Json(fields) = object.await?;
            serde_json::from_value(Value::Object(fields))
                .map(JsonObject)
                .map_err(|e| AppError::ValidationError(format!("Invalid request body: {}", e)).into())
        })
    }
}
