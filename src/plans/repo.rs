use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use time::Date;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::plans::repo_types::Plan;
use crate::plans::template::PlanTemplate;
use crate::users::User;

impl Plan {
    /// Look up a plan by id, scoped to its owner. A plan belonging to someone
    /// else is indistinguishable from a missing one.
    pub async fn find_owned(
        db: &PgPool,
        plan_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, user_id, status, goal, duration_weeks, difficulty,
                   focus_areas, equipment, start_date, workout_template, meal_template,
                   created_at, updated_at
            FROM plans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(plan_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    pub async fn latest_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Plan>> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, user_id, status, goal, duration_weeks, difficulty,
                   focus_areas, equipment, start_date, workout_template, meal_template,
                   created_at, updated_at
            FROM plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(plan)
    }

    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Plan>> {
        let plans = sqlx::query_as::<_, Plan>(
            r#"
            SELECT id, user_id, status, goal, duration_weeks, difficulty,
                   focus_areas, equipment, start_date, workout_template, meal_template,
                   created_at, updated_at
            FROM plans
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(plans)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_draft(
        db: &PgPool,
        user_id: Uuid,
        goal: &str,
        duration_weeks: i32,
        difficulty: &str,
        focus_areas: &[String],
        equipment: &[String],
        template: &PlanTemplate,
    ) -> anyhow::Result<Plan> {
        let plan = sqlx::query_as::<_, Plan>(
            r#"
            INSERT INTO plans
                (user_id, goal, duration_weeks, difficulty, focus_areas, equipment,
                 workout_template, meal_template)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, status, goal, duration_weeks, difficulty,
                      focus_areas, equipment, start_date, workout_template, meal_template,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(goal)
        .bind(duration_weeks)
        .bind(difficulty)
        .bind(focus_areas)
        .bind(equipment)
        .bind(Json(&template.workout))
        .bind(Json(&template.meal))
        .fetch_one(db)
        .await?;
        Ok(plan)
    }

    /// Flip to active and pin the resolved start date.
    pub async fn mark_active<'e, E: PgExecutor<'e>>(
        executor: E,
        plan_id: Uuid,
        start_date: Date,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE plans
            SET status = 'active', start_date = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(plan_id)
        .bind(start_date)
        .execute(executor)
        .await?;
        Ok(())
    }
}

/// Resolve "the" plan for paths that take no explicit plan id: follow the
/// user's current-plan pointer, read it once, and pass the result down as
/// context.
pub async fn resolve_current_plan(db: &PgPool, user_id: Uuid) -> ApiResult<Plan> {
    let user = User::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let plan_id = user.current_plan_id.ok_or_else(|| {
        ApiError::validation("No active plan found. Please confirm a plan first.")
    })?;

    let plan = Plan::find_owned(db, plan_id, user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Active plan not found"))?;
    Ok(plan)
}
