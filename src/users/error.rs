use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Email is already registered")]
    DuplicateEmail,

    #[error("{0}")]
    Validation(String),

    #[error("Old password is required")]
    MissingOldPassword,

    #[error("Password is incorrect")]
    IncorrectPassword,

    /// Data access or hashing failure. Carries only a fixed, caller-safe message;
    /// the cause is logged where it happens.
    #[error("{0}")]
    Store(&'static str),
}

pub type UserResult<T> = Result<T, UserError>;

impl UserError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::Validation(_) => StatusCode::BAD_REQUEST,
            UserError::DuplicateEmail
            | UserError::MissingOldPassword
            | UserError::IncorrectPassword
            | UserError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
