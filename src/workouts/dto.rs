use serde::Deserialize;
use time::Date;

#[derive(Debug, Deserialize)]
pub struct CompleteWorkoutRequest {
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub difficulty_rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SkipWorkoutRequest {
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExerciseLogRequest {
    pub completed_sets: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    30
}
