use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::plans::template::ExerciseTemplate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "workout_status", rename_all = "snake_case")]
pub enum WorkoutStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// Snapshot of one exercise on a materialized day. `completed_sets`, `weight`
/// and `notes` are the mutable per-set log; everything else is copied from
/// the template and never recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    pub sets: i32,
    pub reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    pub rest_seconds: i32,
    pub muscle_groups: Vec<String>,
    pub completed_sets: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseEntry {
    pub fn from_template(t: &ExerciseTemplate) -> Self {
        Self {
            name: t.name.clone(),
            sets: t.sets,
            reps: t.reps.clone(),
            weight: None,
            rest_seconds: t.rest_seconds,
            muscle_groups: t.muscle_groups.clone(),
            completed_sets: 0,
            notes: None,
        }
    }
}

/// A dated workout instance. Keyed by (user, plan, week, day); `day_number`
/// is the 1-based global index across the whole plan.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub day_number: i32,
    pub week_number: i32,
    pub workout_date: Date,
    pub status: WorkoutStatus,
    pub exercises: Json<Vec<ExerciseEntry>>,
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub difficulty_rating: Option<i32>,
    pub notes: Option<String>,
    pub completed_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
