use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::meals::Meal;
use crate::plans::modification::{ModificationSummary, PlanModifications};
use crate::workouts::Workout;

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub goal: String,
    #[serde(default = "default_duration_weeks")]
    pub duration_weeks: i32,
    pub difficulty: String,
    #[serde(default)]
    pub focus_areas: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
}

fn default_duration_weeks() -> i32 {
    8
}

#[derive(Debug, Deserialize)]
pub struct ModifyPlanRequest {
    pub modifications: PlanModifications,
}

#[derive(Debug, Serialize)]
pub struct ModifyPlanResponse {
    pub modifications: ModificationSummary,
    pub summary: ModifySummaryTotals,
}

#[derive(Debug, Serialize)]
pub struct ModifySummaryTotals {
    pub total_workouts_modified: u32,
    pub total_meals_modified: u32,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    7
}

/// One calendar day of the upcoming window.
#[derive(Debug, Default, Serialize)]
pub struct DaySchedule {
    pub workouts: Vec<Workout>,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    pub schedule_by_date: BTreeMap<String, DaySchedule>,
    pub summary: ScheduleSummary,
}

#[derive(Debug, Serialize)]
pub struct ScheduleSummary {
    pub total_workouts: usize,
    pub total_meals: usize,
    pub days_requested: i64,
}

/// Every instance of a plan, grouped by week: the implicit modification
/// history.
#[derive(Debug, Default, Serialize)]
pub struct WeekHistory {
    pub workouts: Vec<Workout>,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct PlanHistoryResponse {
    pub history_by_week: BTreeMap<i32, WeekHistory>,
}
