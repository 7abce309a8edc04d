#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "Authentication (bcrypt password hashing, HS256 tokens, the bearer-token gate),"]
#![doc = "owner-scoped to-do handlers, the document-store boundary and error handling for"]
#![doc = "the todoforge service. The binary (`main.rs`) wires these together from configuration."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AppError;
pub use state::AppState;
