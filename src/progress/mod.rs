pub mod handlers;
mod repo;
pub mod repo_types;
pub mod services;

pub use repo_types::{Progress, ProgressStatus};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
