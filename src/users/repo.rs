use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::users::repo_types::User;

impl User {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, current_plan_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Provision the row for an identity-service user id if it does not exist
    /// yet, then return it.
    pub async fn get_or_create(db: &PgPool, id: Uuid) -> anyhow::Result<User> {
        sqlx::query(
            r#"
            INSERT INTO users (id)
            VALUES ($1)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, current_plan_id, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Point the user at their newly activated plan. Only activation calls
    /// this.
    pub async fn set_current_plan<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET current_plan_id = $2
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .execute(executor)
        .await?;
        Ok(())
    }
}
