use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::ai::{generate_or_fallback, PlanRequest};
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::meals::Meal;
use crate::plans::activation::{activate_plan, upcoming_schedule, ActivationSummary};
use crate::plans::dto::{
    DaySchedule, GeneratePlanRequest, ModifyPlanRequest, ModifyPlanResponse, ModifySummaryTotals,
    PlanHistoryResponse, ScheduleQuery, ScheduleResponse, ScheduleSummary, WeekHistory,
};
use crate::plans::modification::modify_plan;
use crate::plans::repo_types::Plan;
use crate::state::AppState;
use crate::users::User;
use crate::workouts::Workout;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans/generate", post(generate))
        .route("/plans/current", get(get_current_plan))
        .route("/plans", get(list_plans))
        .route("/plans/:id/activate", post(activate))
        .route("/plans/:id", put(modify))
        .route("/plans/:id/history", get(get_plan_history))
        .route("/schedule", get(get_schedule))
}

/// POST /plans/generate
///
/// Asks the generator for a template and persists it as a draft plan. A
/// generator failure is recovered with the canned template rather than
/// surfaced to the user.
#[instrument(skip(state, body))]
async fn generate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(body): Json<GeneratePlanRequest>,
) -> ApiResult<(StatusCode, Json<Plan>)> {
    if body.goal.is_empty() {
        return Err(ApiError::validation("goal must not be empty"));
    }
    if body.duration_weeks < 1 {
        return Err(ApiError::validation("duration_weeks must be at least 1"));
    }

    User::get_or_create(&state.db, user_id).await?;

    let request = PlanRequest {
        goal: body.goal.clone(),
        duration_weeks: body.duration_weeks,
        difficulty: body.difficulty.clone(),
        focus_areas: body.focus_areas.clone(),
        equipment: body.equipment.clone(),
    };
    let template = generate_or_fallback(state.generator.as_ref(), &request).await;

    let plan = Plan::insert_draft(
        &state.db,
        user_id,
        &body.goal,
        body.duration_weeks,
        &body.difficulty,
        &body.focus_areas,
        &body.equipment,
        &template,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// GET /plans/current
///
/// The plan the user's pointer references, falling back to the most recent
/// one.
#[instrument(skip(state))]
async fn get_current_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Plan>> {
    let user = User::get_or_create(&state.db, user_id).await?;

    let mut plan = None;
    if let Some(plan_id) = user.current_plan_id {
        plan = Plan::find_owned(&state.db, plan_id, user_id).await?;
    }
    if plan.is_none() {
        plan = Plan::latest_for_user(&state.db, user_id).await?;
    }

    let plan = plan
        .ok_or_else(|| ApiError::not_found("No plan found. Please generate a new plan first."))?;
    Ok(Json(plan))
}

/// GET /plans
#[instrument(skip(state))]
async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> ApiResult<Json<Vec<Plan>>> {
    let plans = Plan::list_for_user(&state.db, user_id).await?;
    Ok(Json(plans))
}

/// POST /plans/:id/activate
#[instrument(skip(state))]
async fn activate(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<ActivationSummary>> {
    let summary = activate_plan(&state.db, user_id, plan_id).await?;
    Ok(Json(summary))
}

/// PUT /plans/:id
#[instrument(skip(state, body))]
async fn modify(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plan_id): Path<Uuid>,
    Json(body): Json<ModifyPlanRequest>,
) -> ApiResult<Json<ModifyPlanResponse>> {
    let modifications = modify_plan(&state.db, user_id, plan_id, &body.modifications).await?;
    let summary = ModifySummaryTotals {
        total_workouts_modified: modifications.workouts.updated + modifications.workouts.created,
        total_meals_modified: modifications.meals.updated + modifications.meals.created,
    };
    Ok(Json(ModifyPlanResponse { modifications, summary }))
}

/// GET /plans/:id/history
#[instrument(skip(state))]
async fn get_plan_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(plan_id): Path<Uuid>,
) -> ApiResult<Json<PlanHistoryResponse>> {
    let plan = Plan::find_owned(&state.db, plan_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Plan not found"))?;

    let workouts = Workout::list_for_plan(&state.db, user_id, plan.id).await?;
    let meals = Meal::list_for_plan(&state.db, user_id, plan.id).await?;

    let mut history_by_week: BTreeMap<i32, WeekHistory> = BTreeMap::new();
    for workout in workouts {
        history_by_week
            .entry(workout.week_number)
            .or_default()
            .workouts
            .push(workout);
    }
    for meal in meals {
        history_by_week
            .entry(meal.week_number)
            .or_default()
            .meals
            .push(meal);
    }
    Ok(Json(PlanHistoryResponse { history_by_week }))
}

/// GET /schedule?days=7
///
/// Upcoming instances grouped by calendar date. An empty window is a valid
/// answer, not an error.
#[instrument(skip(state))]
async fn get_schedule(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<ScheduleQuery>,
) -> ApiResult<Json<ScheduleResponse>> {
    if q.days < 0 {
        return Err(ApiError::validation("days must not be negative"));
    }
    let (workouts, meals) = upcoming_schedule(&state.db, user_id, q.days).await?;

    let summary = ScheduleSummary {
        total_workouts: workouts.len(),
        total_meals: meals.len(),
        days_requested: q.days,
    };

    let mut schedule_by_date: BTreeMap<String, DaySchedule> = BTreeMap::new();
    for workout in workouts {
        schedule_by_date
            .entry(workout.workout_date.to_string())
            .or_default()
            .workouts
            .push(workout);
    }
    for meal in meals {
        schedule_by_date
            .entry(meal.meal_date.to_string())
            .or_default()
            .meals
            .push(meal);
    }

    Ok(Json(ScheduleResponse { schedule_by_date, summary }))
}
