mod dto;
pub mod handlers;
mod repo;
pub mod repo_types;
pub mod transitions;

pub use repo_types::{ExerciseEntry, Workout, WorkoutStatus};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
