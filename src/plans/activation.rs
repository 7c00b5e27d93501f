use serde::Serialize;
use sqlx::PgPool;
use time::{Date, Duration, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::meals::Meal;
use crate::plans::repo_types::{Plan, PlanStatus};
use crate::plans::schedule::{materialize, plan_start_date};
use crate::users::User;
use crate::workouts::Workout;

#[derive(Debug, Serialize)]
pub struct ActivationSummary {
    pub workouts_created: usize,
    pub meals_created: usize,
    pub start_date: Date,
}

/// Activation is one-shot: a plan that is already active must not be
/// activated again.
pub fn ensure_activatable(plan: &Plan) -> ApiResult<()> {
    if plan.status == PlanStatus::Active {
        return Err(ApiError::conflict("Plan is already active"));
    }
    Ok(())
}

/// The materializer requires template weeks and the daily meal template;
/// fail before any write when either is missing.
pub fn ensure_complete_template(plan: &Plan) -> ApiResult<()> {
    if plan.workout_template.0.weeks.is_empty() {
        return Err(ApiError::validation(
            "Invalid plan structure - missing workout or meal data",
        ));
    }
    Ok(())
}

/// Turn a draft plan into the user's active plan: materialize the full
/// instance set, persist it, flip the plan status and move the user's
/// current-plan pointer, all inside one transaction. A failure part-way
/// leaves nothing behind; a retried activation starts clean.
pub async fn activate_plan(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
) -> ApiResult<ActivationSummary> {
    let plan = Plan::find_owned(db, plan_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Plan not found"))?;

    ensure_activatable(&plan)?;
    ensure_complete_template(&plan)?;

    let start_date = plan_start_date(OffsetDateTime::now_utc().date());
    let schedule = materialize(&plan.workout_template.0, &plan.meal_template.0, start_date);

    let mut tx = db.begin().await?;
    Workout::insert_bulk(&mut tx, user_id, plan_id, &schedule.workouts).await?;
    Meal::insert_bulk(&mut tx, user_id, plan_id, &schedule.meals).await?;
    Plan::mark_active(&mut *tx, plan_id, start_date).await?;
    User::set_current_plan(&mut *tx, user_id, plan_id).await?;
    tx.commit().await?;

    info!(
        %user_id,
        %plan_id,
        workouts = schedule.workouts.len(),
        meals = schedule.meals.len(),
        %start_date,
        "plan activated"
    );

    Ok(ActivationSummary {
        workouts_created: schedule.workouts.len(),
        meals_created: schedule.meals.len(),
        start_date,
    })
}

/// Windowed read of upcoming instances: [today .. today + days], whole
/// calendar days. An empty result is not an error.
pub async fn upcoming_schedule(
    db: &PgPool,
    user_id: Uuid,
    days: i64,
) -> ApiResult<(Vec<Workout>, Vec<Meal>)> {
    let from = OffsetDateTime::now_utc().date();
    let to = from + Duration::days(days);

    let workouts = Workout::list_in_range(db, user_id, from, to).await?;
    let meals = Meal::list_in_range(db, user_id, from, to).await?;
    Ok((workouts, meals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::template::{
        DailyMealTemplate, DailyMeals, MealData, MealTemplate, PlanTemplate, WorkoutTemplate,
    };
    use sqlx::types::Json;
    use time::macros::datetime;

    fn meal(name: &str) -> MealData {
        MealData {
            name: name.into(),
            calories: 400,
            protein: 20,
            carbs: 40,
            fats: 10,
            ingredients: vec!["oats".into()],
            prep_time_minutes: 10,
            instructions: None,
        }
    }

    fn plan_with(status: PlanStatus, template: PlanTemplate) -> Plan {
        let now = datetime!(2026-08-03 12:00 UTC);
        Plan {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            status,
            goal: "muscle_gain".into(),
            duration_weeks: 1,
            difficulty: "beginner".into(),
            focus_areas: vec![],
            equipment: vec![],
            start_date: None,
            workout_template: Json(template.workout),
            meal_template: Json(template.meal),
            created_at: now,
            updated_at: now,
        }
    }

    fn empty_template() -> PlanTemplate {
        PlanTemplate {
            workout: WorkoutTemplate { weeks: vec![], notes: None },
            meal: MealTemplate {
                daily_template: DailyMealTemplate {
                    total_calories: 1800,
                    total_protein: 120,
                    total_carbs: 180,
                    total_fats: 60,
                    meals: DailyMeals {
                        breakfast: meal("breakfast"),
                        morning_snack: meal("snack"),
                        lunch: meal("lunch"),
                        afternoon_snack: meal("snack"),
                        dinner: meal("dinner"),
                        evening_snack: None,
                    },
                },
                weekly_variations: vec![],
                notes: None,
            },
        }
    }

    #[test]
    fn active_plans_cannot_be_activated_again() {
        let plan = plan_with(PlanStatus::Active, empty_template());
        let err = ensure_activatable(&plan).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn draft_plans_pass_the_activation_guard() {
        let plan = plan_with(PlanStatus::Draft, empty_template());
        assert!(ensure_activatable(&plan).is_ok());
    }

    #[test]
    fn templates_without_weeks_are_rejected_before_any_write() {
        let plan = plan_with(PlanStatus::Draft, empty_template());
        let err = ensure_complete_template(&plan).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
