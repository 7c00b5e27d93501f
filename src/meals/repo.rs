use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::meals::repo_types::Meal;
use crate::plans::schedule::NewMeal;
use crate::plans::template::MealSlot;

impl Meal {
    /// Bulk-insert materialized meals; natural-key conflicts are skipped so
    /// activation retries stay duplicate-free.
    pub async fn insert_bulk(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        plan_id: Uuid,
        meals: &[NewMeal],
    ) -> anyhow::Result<()> {
        for m in meals {
            sqlx::query(
                r#"
                INSERT INTO meals
                    (user_id, plan_id, day_number, week_number, meal_date, slot, status, meal_data)
                VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
                ON CONFLICT (user_id, plan_id, week_number, day_number, slot) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(plan_id)
            .bind(m.day_number)
            .bind(m.week_number)
            .bind(m.date)
            .bind(m.slot)
            .bind(Json(&m.meal_data))
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    pub async fn insert_one(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        m: &NewMeal,
    ) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals
                (user_id, plan_id, day_number, week_number, meal_date, slot, status, meal_data)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7)
            RETURNING id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                      meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(m.day_number)
        .bind(m.week_number)
        .bind(m.date)
        .bind(m.slot)
        .bind(Json(&m.meal_data))
        .fetch_one(db)
        .await?;
        Ok(meal)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        meal_id: Uuid,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(meal_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    pub async fn find_by_natural_key(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        week_number: i32,
        day_number: i32,
        slot: MealSlot,
    ) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE user_id = $1 AND plan_id = $2 AND week_number = $3 AND day_number = $4
              AND slot = $5
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(week_number)
        .bind(day_number)
        .bind(slot)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    pub async fn list_day(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        day_number: i32,
    ) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE user_id = $1 AND plan_id = $2 AND day_number = $3
            ORDER BY slot
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(day_number)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn list_week(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        week_number: i32,
    ) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE user_id = $1 AND plan_id = $2 AND week_number = $3
            ORDER BY day_number, slot
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(week_number)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn list_for_plan(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE user_id = $1 AND plan_id = $2
            ORDER BY week_number, day_number, slot
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn list_in_range(
        db: &PgPool,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE user_id = $1 AND meal_date >= $2 AND meal_date <= $3
            ORDER BY meal_date, slot
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        from: Option<Date>,
        to: Option<Date>,
        slot: Option<MealSlot>,
        limit: i64,
    ) -> anyhow::Result<Vec<Meal>> {
        let meals = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, meal_date, slot, status,
                   meal_data, consumption, prep_started_at, consumed_at, notes, rating,
                   created_at, updated_at
            FROM meals
            WHERE user_id = $1
              AND ($2::date IS NULL OR meal_date >= $2)
              AND ($3::date IS NULL OR meal_date <= $3)
              AND ($4::meal_slot IS NULL OR slot = $4)
            ORDER BY meal_date DESC, slot
            LIMIT $5
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(slot)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(meals)
    }

    /// Replace the meal snapshot wholesale (plan modification). Date and
    /// status stay untouched.
    pub async fn replace_content(
        db: &PgPool,
        meal_id: Uuid,
        meal_data: &crate::plans::template::MealData,
        notes: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE meals
            SET meal_data = $2, notes = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(meal_id)
        .bind(Json(meal_data))
        .bind(notes)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Persist the mutable fields after a state transition or detail update.
    pub async fn save(db: &PgPool, m: &Meal) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE meals
            SET status = $2, consumption = $3, prep_started_at = $4, consumed_at = $5,
                notes = $6, rating = $7, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(m.id)
        .bind(m.status)
        .bind(&m.consumption)
        .bind(m.prep_started_at)
        .bind(m.consumed_at)
        .bind(&m.notes)
        .bind(m.rating)
        .execute(db)
        .await?;
        Ok(())
    }
}
