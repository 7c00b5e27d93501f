use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::plans::template::{MealTemplate, WorkoutTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "plan_status", rename_all = "snake_case")]
pub enum PlanStatus {
    Draft,
    Active,
    Archived,
}

/// A coaching plan. Templates are immutable once created; `start_date` is
/// resolved at activation and anchors every date computed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Plan {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: PlanStatus,
    pub goal: String,
    pub duration_weeks: i32,
    pub difficulty: String,
    pub focus_areas: Vec<String>,
    pub equipment: Vec<String>,
    pub start_date: Option<Date>,
    pub workout_template: Json<WorkoutTemplate>,
    pub meal_template: Json<MealTemplate>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Plan {
    /// Date anchor for instance-date computation. Active plans carry their
    /// resolved start date; `today` stands in for plans activated before the
    /// start date was recorded, which keeps such dates approximate.
    pub fn anchor_date(&self, today: Date) -> Date {
        self.start_date.unwrap_or(today)
    }
}
