use serde::Deserialize;
use time::Date;

use crate::plans::template::MealSlot;

#[derive(Debug, Deserialize)]
pub struct ConsumeMealRequest {
    pub calories_consumed: Option<i32>,
    pub protein_consumed: Option<i32>,
    pub carbs_consumed: Option<i32>,
    pub fats_consumed: Option<i32>,
    pub portion_eaten: Option<i32>,
    pub notes: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct SkipMealRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMealRequest {
    pub notes: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct MealHistoryQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub meal_type: Option<MealSlot>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    30
}
