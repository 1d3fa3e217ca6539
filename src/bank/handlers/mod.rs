//! HTTP handlers.
//!
//! Every handler reads its collaborators from request extensions and returns
//! `Result<_, ApiError>` so errors always leave as `{"error": ...}`.

pub mod accounts;
pub mod health;
pub mod login;
pub mod transfers;

pub use self::health::health;
pub use self::login::login;
pub use self::transfers::transfer;

use crate::bank::error::ApiError;
use axum::http::{Method, Uri};

const NAME_MAX: usize = 50;

/// Names must be non-blank and fit the `VARCHAR(50)` columns.
pub fn valid_name(name: &str) -> bool {
    !name.trim().is_empty() && name.chars().count() <= NAME_MAX
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("no route for {}", uri.path()))
}

pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method.to_string())
}
