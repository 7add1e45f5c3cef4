use crate::state::AppState;
use axum::Router;

mod dto;
pub mod error;
mod extractors;
pub mod handlers;
#[cfg(test)]
pub mod memory;
mod password;
pub mod repo;
pub mod repo_types;
pub mod services;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
