use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::progress::repo_types::Progress;

impl Progress {
    pub async fn find_in_progress(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Option<Progress>> {
        let record = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, user_id, plan_id, day_number, status, completed_at, created_at, updated_at
            FROM progress
            WHERE user_id = $1 AND plan_id = $2 AND status = 'in_progress'
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_optional(db)
        .await?;
        Ok(record)
    }

    /// Create day 1 unless an in-progress record already exists; either way
    /// return the record that holds the cursor. The partial unique index
    /// makes the concurrent first-access race converge on a single row.
    pub async fn get_or_create_current(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Progress> {
        let inserted = sqlx::query_as::<_, Progress>(
            r#"
            INSERT INTO progress (user_id, plan_id, day_number, status)
            VALUES ($1, $2, 1, 'in_progress')
            ON CONFLICT (user_id, plan_id) WHERE status = 'in_progress' DO NOTHING
            RETURNING id, user_id, plan_id, day_number, status, completed_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_optional(db)
        .await?;

        if let Some(record) = inserted {
            return Ok(record);
        }

        let existing = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, user_id, plan_id, day_number, status, completed_at, created_at, updated_at
            FROM progress
            WHERE user_id = $1 AND plan_id = $2 AND status = 'in_progress'
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_one(db)
        .await?;
        Ok(existing)
    }

    /// Mark the in-progress record completed; None when there is nothing to
    /// complete.
    pub async fn complete_current<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Option<Progress>> {
        let record = sqlx::query_as::<_, Progress>(
            r#"
            UPDATE progress
            SET status = 'completed', completed_at = now(), updated_at = now()
            WHERE user_id = $1 AND plan_id = $2 AND status = 'in_progress'
            RETURNING id, user_id, plan_id, day_number, status, completed_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_optional(executor)
        .await?;
        Ok(record)
    }

    pub async fn insert_in_progress<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        plan_id: Uuid,
        day_number: i32,
    ) -> anyhow::Result<Progress> {
        let record = sqlx::query_as::<_, Progress>(
            r#"
            INSERT INTO progress (user_id, plan_id, day_number, status)
            VALUES ($1, $2, $3, 'in_progress')
            RETURNING id, user_id, plan_id, day_number, status, completed_at,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(day_number)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    /// Full append-only trail, day order.
    pub async fn list_history(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Vec<Progress>> {
        let records = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, user_id, plan_id, day_number, status, completed_at, created_at, updated_at
            FROM progress
            WHERE user_id = $1 AND plan_id = $2
            ORDER BY day_number, created_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(records)
    }
}
