use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::plans::repo::resolve_current_plan;
use crate::plans::schedule::{day_date, estimated_duration_minutes, week_of_day, NewWorkout};
use crate::state::AppState;
use crate::workouts::dto::{
    CompleteWorkoutRequest, ExerciseLogRequest, HistoryQuery, SkipWorkoutRequest,
};
use crate::workouts::repo_types::{ExerciseEntry, Workout};
use crate::workouts::transitions;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workouts/daily/:day_number", get(get_daily_workout))
        .route("/workouts/weekly/:week_number", get(get_weekly_workouts))
        .route("/workouts/history", get(get_history))
        .route("/workouts/:id/start", post(start_workout))
        .route("/workouts/:id/complete", post(complete_workout))
        .route("/workouts/:id/skip", post(skip_workout))
        .route("/workouts/:id/exercises/:index", patch(log_exercise))
}

/// GET /workouts/daily/:day_number
///
/// Looks up the instance for the given global day of the current plan,
/// materializing it from the template on first access.
#[instrument(skip(state))]
async fn get_daily_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(day_number): Path<i32>,
) -> ApiResult<Json<Workout>> {
    if day_number < 1 {
        return Err(ApiError::validation("Invalid day number"));
    }

    let plan = resolve_current_plan(&state.db, user_id).await?;

    if let Some(workout) = Workout::find_by_day(&state.db, user_id, plan.id, day_number).await? {
        return Ok(Json(workout));
    }

    let day = plan
        .workout_template
        .0
        .day_for(day_number)
        .ok_or_else(|| ApiError::not_found("No workout planned for this day"))?;

    let anchor = plan.anchor_date(OffsetDateTime::now_utc().date());
    let new = NewWorkout {
        day_number,
        week_number: week_of_day(day_number),
        date: day_date(anchor, day_number),
        exercises: day.exercises.iter().map(ExerciseEntry::from_template).collect(),
        duration_minutes: estimated_duration_minutes(&day.exercises),
        notes: format!("Week {} - {} workout", week_of_day(day_number), day.day_name),
    };
    let workout = Workout::insert_one(&state.db, user_id, plan.id, &new).await?;
    Ok(Json(workout))
}

/// GET /workouts/weekly/:week_number
#[instrument(skip(state))]
async fn get_weekly_workouts(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(week_number): Path<i32>,
) -> ApiResult<Json<Vec<Workout>>> {
    if week_number < 1 {
        return Err(ApiError::validation("Invalid week number"));
    }
    let plan = resolve_current_plan(&state.db, user_id).await?;
    let workouts = Workout::list_week(&state.db, user_id, plan.id, week_number).await?;
    Ok(Json(workouts))
}

/// GET /workouts/history?start_date&end_date&limit
#[instrument(skip(state))]
async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<Json<Vec<Workout>>> {
    let workouts =
        Workout::history(&state.db, user_id, q.start_date, q.end_date, q.limit).await?;
    Ok(Json(workouts))
}

/// POST /workouts/:id/start
#[instrument(skip(state))]
async fn start_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Workout>> {
    let workout = fetch(&state, user_id, id).await?;
    let workout = transitions::start(workout)?;
    Workout::save(&state.db, &workout).await?;
    Ok(Json(workout))
}

/// POST /workouts/:id/complete
#[instrument(skip(state, body))]
async fn complete_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteWorkoutRequest>,
) -> ApiResult<Json<Workout>> {
    let workout = fetch(&state, user_id, id).await?;
    let summary = transitions::CompletionSummary {
        duration_minutes: body.duration_minutes,
        calories_burned: body.calories_burned,
        difficulty_rating: body.difficulty_rating,
        notes: body.notes,
    };
    let workout = transitions::complete(workout, summary, OffsetDateTime::now_utc())?;
    Workout::save(&state.db, &workout).await?;
    Ok(Json(workout))
}

/// POST /workouts/:id/skip
#[instrument(skip(state, body))]
async fn skip_workout(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SkipWorkoutRequest>,
) -> ApiResult<Json<Workout>> {
    let workout = fetch(&state, user_id, id).await?;
    let workout = transitions::skip(workout, body.notes)?;
    Workout::save(&state.db, &workout).await?;
    Ok(Json(workout))
}

/// PATCH /workouts/:id/exercises/:index
#[instrument(skip(state, body))]
async fn log_exercise(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(body): Json<ExerciseLogRequest>,
) -> ApiResult<Json<Workout>> {
    let workout = fetch(&state, user_id, id).await?;
    let log = transitions::ExerciseLog {
        completed_sets: body.completed_sets,
        weight: body.weight,
        notes: body.notes,
    };
    let workout = transitions::log_exercise(workout, index, log)?;
    Workout::save(&state.db, &workout).await?;
    Ok(Json(workout))
}

async fn fetch(state: &AppState, user_id: Uuid, workout_id: Uuid) -> ApiResult<Workout> {
    Workout::find_by_id(&state.db, user_id, workout_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Workout not found"))
}
