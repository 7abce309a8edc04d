pub mod todo;
pub mod user;

pub use todo::{CreateTodoRequest, Todo, UpdateTodoRequest};
pub use user::{NewUser, User};
