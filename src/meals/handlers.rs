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
use crate::meals::dto::{ConsumeMealRequest, MealHistoryQuery, SkipMealRequest, UpdateMealRequest};
use crate::meals::repo_types::Meal;
use crate::meals::transitions;
use crate::plans::repo::resolve_current_plan;
use crate::plans::schedule::{day_date, week_of_day, NewMeal};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/meals/daily/:day_number", get(get_daily_meals))
        .route("/meals/weekly/:week_number", get(get_weekly_meals))
        .route("/meals/history", get(get_history))
        .route("/meals/:id/prepare", post(prepare_meal))
        .route("/meals/:id/consume", post(consume_meal))
        .route("/meals/:id/skip", post(skip_meal))
        .route("/meals/:id", patch(update_meal))
}

/// GET /meals/daily/:day_number
///
/// All meal instances for the given global day of the current plan. When the
/// day was never materialized, instances are created from the daily template
/// on the spot.
#[instrument(skip(state))]
async fn get_daily_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(day_number): Path<i32>,
) -> ApiResult<Json<Vec<Meal>>> {
    if day_number < 1 {
        return Err(ApiError::validation("Invalid day number"));
    }

    let plan = resolve_current_plan(&state.db, user_id).await?;

    let meals = Meal::list_day(&state.db, user_id, plan.id, day_number).await?;
    if !meals.is_empty() {
        return Ok(Json(meals));
    }

    let anchor = plan.anchor_date(OffsetDateTime::now_utc().date());
    let date = day_date(anchor, day_number);
    let week_number = week_of_day(day_number);

    let mut created = Vec::new();
    for (slot, meal_data) in plan.meal_template.0.daily_template.meals.populated() {
        let new = NewMeal {
            day_number,
            week_number,
            date,
            slot,
            meal_data: meal_data.clone(),
        };
        created.push(Meal::insert_one(&state.db, user_id, plan.id, &new).await?);
    }
    Ok(Json(created))
}

/// GET /meals/weekly/:week_number
#[instrument(skip(state))]
async fn get_weekly_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(week_number): Path<i32>,
) -> ApiResult<Json<Vec<Meal>>> {
    if week_number < 1 {
        return Err(ApiError::validation("Invalid week number"));
    }
    let plan = resolve_current_plan(&state.db, user_id).await?;
    let meals = Meal::list_week(&state.db, user_id, plan.id, week_number).await?;
    Ok(Json(meals))
}

/// GET /meals/history?start_date&end_date&meal_type&limit
#[instrument(skip(state))]
async fn get_history(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<MealHistoryQuery>,
) -> ApiResult<Json<Vec<Meal>>> {
    let meals = Meal::history(
        &state.db,
        user_id,
        q.start_date,
        q.end_date,
        q.meal_type,
        q.limit,
    )
    .await?;
    Ok(Json(meals))
}

/// POST /meals/:id/prepare
#[instrument(skip(state))]
async fn prepare_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Meal>> {
    let meal = fetch(&state, user_id, id).await?;
    let meal = transitions::prepare(meal, OffsetDateTime::now_utc())?;
    Meal::save(&state.db, &meal).await?;
    Ok(Json(meal))
}

/// POST /meals/:id/consume
#[instrument(skip(state, body))]
async fn consume_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ConsumeMealRequest>,
) -> ApiResult<Json<Meal>> {
    let meal = fetch(&state, user_id, id).await?;
    let input = transitions::ConsumptionInput {
        calories_consumed: body.calories_consumed,
        protein_consumed: body.protein_consumed,
        carbs_consumed: body.carbs_consumed,
        fats_consumed: body.fats_consumed,
        portion_eaten: body.portion_eaten,
        notes: body.notes,
    };
    let meal = transitions::consume(meal, input, body.rating, OffsetDateTime::now_utc())?;
    Meal::save(&state.db, &meal).await?;
    Ok(Json(meal))
}

/// POST /meals/:id/skip
#[instrument(skip(state, body))]
async fn skip_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SkipMealRequest>,
) -> ApiResult<Json<Meal>> {
    let meal = fetch(&state, user_id, id).await?;
    let meal = transitions::skip(meal, body.notes)?;
    Meal::save(&state.db, &meal).await?;
    Ok(Json(meal))
}

/// PATCH /meals/:id (notes and rating only)
#[instrument(skip(state, body))]
async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealRequest>,
) -> ApiResult<Json<Meal>> {
    let mut meal = fetch(&state, user_id, id).await?;
    if let Some(rating) = body.rating {
        if !(1..=5).contains(&rating) {
            return Err(ApiError::validation("rating must be between 1 and 5"));
        }
        meal.rating = Some(rating);
    }
    if body.notes.is_some() {
        meal.notes = body.notes;
    }
    Meal::save(&state.db, &meal).await?;
    Ok(Json(meal))
}

async fn fetch(state: &AppState, user_id: Uuid, meal_id: Uuid) -> ApiResult<Meal> {
    Meal::find_by_id(&state.db, user_id, meal_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meal not found"))
}
