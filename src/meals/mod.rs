mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod transitions;

pub use repo_types::{Consumption, Meal, MealStatus};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
