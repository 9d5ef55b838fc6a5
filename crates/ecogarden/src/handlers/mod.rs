pub mod advice;
pub mod error;
pub mod health;
pub mod users;
pub mod weather;

pub use error::AppError;
