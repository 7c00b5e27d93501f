use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};
use time::Date;
use uuid::Uuid;

use crate::plans::schedule::NewWorkout;
use crate::workouts::repo_types::Workout;

impl Workout {
    /// Bulk-insert materialized workouts. Conflicts on the natural key are
    /// skipped so a retried activation never duplicates instances.
    pub async fn insert_bulk(
        tx: &mut Transaction<'_, Postgres>,
        user_id: Uuid,
        plan_id: Uuid,
        workouts: &[NewWorkout],
    ) -> anyhow::Result<()> {
        for w in workouts {
            sqlx::query(
                r#"
                INSERT INTO workouts
                    (user_id, plan_id, day_number, week_number, workout_date, status,
                     exercises, duration_minutes, notes)
                VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8)
                ON CONFLICT (user_id, plan_id, week_number, day_number) DO NOTHING
                "#,
            )
            .bind(user_id)
            .bind(plan_id)
            .bind(w.day_number)
            .bind(w.week_number)
            .bind(w.date)
            .bind(Json(&w.exercises))
            .bind(w.duration_minutes)
            .bind(&w.notes)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// Create a single instance outside activation (modification upsert,
    /// materialize-on-demand reads).
    pub async fn insert_one(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        w: &NewWorkout,
    ) -> anyhow::Result<Workout> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            INSERT INTO workouts
                (user_id, plan_id, day_number, week_number, workout_date, status,
                 exercises, duration_minutes, notes)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8)
            RETURNING id, user_id, plan_id, day_number, week_number, workout_date, status,
                      exercises, duration_minutes, calories_burned, difficulty_rating,
                      notes, completed_at, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(w.day_number)
        .bind(w.week_number)
        .bind(w.date)
        .bind(Json(&w.exercises))
        .bind(w.duration_minutes)
        .bind(&w.notes)
        .fetch_one(db)
        .await?;
        Ok(workout)
    }

    pub async fn find_by_id(
        db: &PgPool,
        user_id: Uuid,
        workout_id: Uuid,
    ) -> anyhow::Result<Option<Workout>> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(workout_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(workout)
    }

    pub async fn find_by_week_day(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        week_number: i32,
        day_number: i32,
    ) -> anyhow::Result<Option<Workout>> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE user_id = $1 AND plan_id = $2 AND week_number = $3 AND day_number = $4
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(week_number)
        .bind(day_number)
        .fetch_optional(db)
        .await?;
        Ok(workout)
    }

    pub async fn find_by_day(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        day_number: i32,
    ) -> anyhow::Result<Option<Workout>> {
        let workout = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE user_id = $1 AND plan_id = $2 AND day_number = $3
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(day_number)
        .fetch_optional(db)
        .await?;
        Ok(workout)
    }

    pub async fn list_week(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
        week_number: i32,
    ) -> anyhow::Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE user_id = $1 AND plan_id = $2 AND week_number = $3
            ORDER BY day_number
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .bind(week_number)
        .fetch_all(db)
        .await?;
        Ok(workouts)
    }

    pub async fn list_for_plan(
        db: &PgPool,
        user_id: Uuid,
        plan_id: Uuid,
    ) -> anyhow::Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE user_id = $1 AND plan_id = $2
            ORDER BY week_number, day_number
            "#,
        )
        .bind(user_id)
        .bind(plan_id)
        .fetch_all(db)
        .await?;
        Ok(workouts)
    }

    pub async fn list_in_range(
        db: &PgPool,
        user_id: Uuid,
        from: Date,
        to: Date,
    ) -> anyhow::Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE user_id = $1 AND workout_date >= $2 AND workout_date <= $3
            ORDER BY workout_date, day_number
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await?;
        Ok(workouts)
    }

    pub async fn history(
        db: &PgPool,
        user_id: Uuid,
        from: Option<Date>,
        to: Option<Date>,
        limit: i64,
    ) -> anyhow::Result<Vec<Workout>> {
        let workouts = sqlx::query_as::<_, Workout>(
            r#"
            SELECT id, user_id, plan_id, day_number, week_number, workout_date, status,
                   exercises, duration_minutes, calories_burned, difficulty_rating,
                   notes, completed_at, created_at, updated_at
            FROM workouts
            WHERE user_id = $1
              AND ($2::date IS NULL OR workout_date >= $2)
              AND ($3::date IS NULL OR workout_date <= $3)
            ORDER BY workout_date DESC
            LIMIT $4
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(db)
        .await?;
        Ok(workouts)
    }

    /// Replace the exercise list in place (plan modification). Date and
    /// status stay untouched.
    pub async fn replace_content(
        db: &PgPool,
        workout_id: Uuid,
        exercises: &[crate::workouts::repo_types::ExerciseEntry],
        duration_minutes: i32,
        notes: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE workouts
            SET exercises = $2, duration_minutes = $3, notes = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(workout_id)
        .bind(Json(exercises))
        .bind(duration_minutes)
        .bind(notes)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Persist the mutable fields after a state transition or per-exercise
    /// log update.
    pub async fn save(db: &PgPool, w: &Workout) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE workouts
            SET status = $2, exercises = $3, duration_minutes = $4, calories_burned = $5,
                difficulty_rating = $6, notes = $7, completed_at = $8, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(w.id)
        .bind(w.status)
        .bind(&w.exercises)
        .bind(w.duration_minutes)
        .bind(w.calories_burned)
        .bind(w.difficulty_rating)
        .bind(&w.notes)
        .bind(w.completed_at)
        .execute(db)
        .await?;
        Ok(())
    }
}
