use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::plans::template::{MealData, MealSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "meal_status", rename_all = "snake_case")]
pub enum MealStatus {
    Pending,
    Prepared,
    Consumed,
    Skipped,
}

/// What was actually eaten, recorded on the transition to consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consumption {
    pub calories_consumed: i32,
    pub protein_consumed: i32,
    pub carbs_consumed: i32,
    pub fats_consumed: i32,
    /// Percentage of the planned portion, 0-100.
    pub portion_eaten: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A dated meal instance. Keyed by (user, plan, week, day, slot);
/// `meal_data` is a snapshot of the template at materialization time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub plan_id: Uuid,
    pub day_number: i32,
    pub week_number: i32,
    pub meal_date: Date,
    pub slot: MealSlot,
    pub status: MealStatus,
    pub meal_data: Json<MealData>,
    pub consumption: Option<Json<Consumption>>,
    pub prep_started_at: Option<OffsetDateTime>,
    pub consumed_at: Option<OffsetDateTime>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
