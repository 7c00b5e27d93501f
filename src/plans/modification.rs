use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::meals::Meal;
use crate::plans::repo_types::{Plan, PlanStatus};
use crate::plans::schedule::{
    day_date, estimated_duration_minutes, week_of_day, NewMeal, NewWorkout,
};
use crate::plans::template::{ExerciseTemplate, MealData, MealSlot};
use crate::workouts::{ExerciseEntry, Workout};

/// Replacement exercise list for one workout day, addressed by its natural
/// key.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkoutEdit {
    pub week_number: i32,
    pub day_number: i32,
    pub exercises: Vec<ExerciseTemplate>,
}

/// Replacement meal data for one (day, slot), addressed by its natural key.
#[derive(Debug, Clone, Deserialize)]
pub struct MealEdit {
    pub week_number: i32,
    pub day_number: i32,
    pub meal_type: MealSlot,
    pub meal_data: MealData,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanModifications {
    #[serde(default)]
    pub workouts: Vec<WorkoutEdit>,
    #[serde(default)]
    pub meals: Vec<MealEdit>,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct ModificationCounts {
    pub updated: u32,
    pub created: u32,
}

#[derive(Debug, Serialize)]
pub struct ModificationSummary {
    pub workouts: ModificationCounts,
    pub meals: ModificationCounts,
}

/// Only active plans can be modified; drafts have nothing materialized and
/// archived plans are read-only.
pub fn ensure_modifiable(plan: &Plan) -> ApiResult<()> {
    if plan.status != PlanStatus::Active {
        return Err(ApiError::validation("Can only modify active plans"));
    }
    Ok(())
}

/// Reject malformed edits before touching any instance.
pub fn validate(mods: &PlanModifications) -> ApiResult<()> {
    if mods.workouts.is_empty() && mods.meals.is_empty() {
        return Err(ApiError::validation(
            "No modifications provided. Please specify workouts and/or meals to modify.",
        ));
    }
    for edit in &mods.workouts {
        if edit.week_number < 1 {
            return Err(ApiError::validation("workout modification: missing or invalid week_number"));
        }
        if edit.day_number < 1 {
            return Err(ApiError::validation("workout modification: missing or invalid day_number"));
        }
        if edit.exercises.is_empty() {
            return Err(ApiError::validation("workout modification: exercises must not be empty"));
        }
    }
    for edit in &mods.meals {
        if edit.week_number < 1 {
            return Err(ApiError::validation("meal modification: missing or invalid week_number"));
        }
        if edit.day_number < 1 {
            return Err(ApiError::validation("meal modification: missing or invalid day_number"));
        }
    }
    Ok(())
}

/// Upsert the edited instances of an active plan. Each edit stands alone: a
/// failing edit is logged and skipped, the rest still land. Returns how many
/// instances were updated in place vs newly created.
pub async fn modify_plan(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    mods: &PlanModifications,
) -> ApiResult<ModificationSummary> {
    validate(mods)?;

    let plan = Plan::find_owned(db, plan_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Plan not found or does not belong to user"))?;
    ensure_modifiable(&plan)?;

    let anchor = plan.anchor_date(OffsetDateTime::now_utc().date());

    let mut workouts = ModificationCounts::default();
    for edit in &mods.workouts {
        match apply_workout_edit(db, user_id, plan_id, anchor, edit).await {
            Ok(true) => workouts.updated += 1,
            Ok(false) => workouts.created += 1,
            Err(e) => warn!(
                error = %e,
                week = edit.week_number,
                day = edit.day_number,
                "workout edit failed, continuing"
            ),
        }
    }

    let mut meals = ModificationCounts::default();
    for edit in &mods.meals {
        match apply_meal_edit(db, user_id, plan_id, anchor, edit).await {
            Ok(true) => meals.updated += 1,
            Ok(false) => meals.created += 1,
            Err(e) => warn!(
                error = %e,
                week = edit.week_number,
                day = edit.day_number,
                slot = edit.meal_type.as_str(),
                "meal edit failed, continuing"
            ),
        }
    }

    info!(
        %user_id,
        %plan_id,
        workouts_updated = workouts.updated,
        workouts_created = workouts.created,
        meals_updated = meals.updated,
        meals_created = meals.created,
        "plan modified"
    );

    Ok(ModificationSummary { workouts, meals })
}

/// Ok(true) = updated in place, Ok(false) = created.
async fn apply_workout_edit(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    anchor: Date,
    edit: &WorkoutEdit,
) -> anyhow::Result<bool> {
    let exercises: Vec<ExerciseEntry> =
        edit.exercises.iter().map(ExerciseEntry::from_template).collect();
    let duration = estimated_duration_minutes(&edit.exercises);

    let existing =
        Workout::find_by_week_day(db, user_id, plan_id, edit.week_number, edit.day_number).await?;

    match existing {
        Some(workout) => {
            // The exercise set itself changed, so per-exercise completion
            // counters start over; date and status stay as they are.
            let notes = format!(
                "Modified workout - Week {}, Day {}",
                edit.week_number, edit.day_number
            );
            Workout::replace_content(db, workout.id, &exercises, duration, &notes).await?;
            Ok(true)
        }
        None => {
            let new = NewWorkout {
                day_number: edit.day_number,
                week_number: week_of_day(edit.day_number),
                date: day_date(anchor, edit.day_number),
                exercises,
                duration_minutes: duration,
                notes: format!(
                    "Created workout - Week {}, Day {}",
                    edit.week_number, edit.day_number
                ),
            };
            Workout::insert_one(db, user_id, plan_id, &new).await?;
            Ok(false)
        }
    }
}

async fn apply_meal_edit(
    db: &PgPool,
    user_id: Uuid,
    plan_id: Uuid,
    anchor: Date,
    edit: &MealEdit,
) -> anyhow::Result<bool> {
    let existing = Meal::find_by_natural_key(
        db,
        user_id,
        plan_id,
        edit.week_number,
        edit.day_number,
        edit.meal_type,
    )
    .await?;

    match existing {
        Some(meal) => {
            let notes = format!(
                "Modified meal - Week {}, Day {}, {}",
                edit.week_number,
                edit.day_number,
                edit.meal_type.as_str()
            );
            Meal::replace_content(db, meal.id, &edit.meal_data, &notes).await?;
            Ok(true)
        }
        None => {
            let new = NewMeal {
                day_number: edit.day_number,
                week_number: week_of_day(edit.day_number),
                date: day_date(anchor, edit.day_number),
                slot: edit.meal_type,
                meal_data: edit.meal_data.clone(),
            };
            Meal::insert_one(db, user_id, plan_id, &new).await?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn exercise() -> ExerciseTemplate {
        ExerciseTemplate {
            name: "Lunges".into(),
            sets: 3,
            reps: "10 each leg".into(),
            rest_seconds: 45,
            muscle_groups: vec!["quadriceps".into()],
        }
    }

    fn meal_data() -> MealData {
        MealData {
            name: "Baked Fish with Quinoa".into(),
            calories: 420,
            protein: 30,
            carbs: 35,
            fats: 12,
            ingredients: vec!["white fish fillet".into()],
            prep_time_minutes: 30,
            instructions: None,
        }
    }

    #[test]
    fn empty_modifications_are_rejected() {
        let err = validate(&PlanModifications::default()).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn workout_edit_requires_exercises() {
        let mods = PlanModifications {
            workouts: vec![WorkoutEdit {
                week_number: 2,
                day_number: 10,
                exercises: vec![],
            }],
            meals: vec![],
        };
        let err = validate(&mods).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("exercises"));
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        let mods = PlanModifications {
            workouts: vec![],
            meals: vec![MealEdit {
                week_number: 1,
                day_number: 0,
                meal_type: MealSlot::Lunch,
                meal_data: meal_data(),
            }],
        };
        let err = validate(&mods).unwrap_err();
        assert!(err.to_string().contains("day_number"));
    }

    #[test]
    fn well_formed_edits_pass_validation() {
        let mods = PlanModifications {
            workouts: vec![WorkoutEdit {
                week_number: 2,
                day_number: 10,
                exercises: vec![exercise()],
            }],
            meals: vec![MealEdit {
                week_number: 1,
                day_number: 3,
                meal_type: MealSlot::Dinner,
                meal_data: meal_data(),
            }],
        };
        assert!(validate(&mods).is_ok());
    }

    #[test]
    fn created_instances_recompute_week_and_anchor_dates() {
        // Week 2, day 10 lands 9 days after the plan anchor and in week 2
        // regardless of what the edit claims.
        assert_eq!(week_of_day(10), 2);
        assert_eq!(day_date(date!(2026 - 08 - 03), 10), date!(2026 - 08 - 12));
    }
}
