pub mod activation;
mod dto;
pub mod handlers;
pub mod modification;
pub mod repo;
pub mod repo_types;
pub mod schedule;
pub mod template;

pub use repo_types::{Plan, PlanStatus};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
