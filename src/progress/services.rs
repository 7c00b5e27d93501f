use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::plans::repo::resolve_current_plan;
use crate::plans::repo_types::{Plan, PlanStatus};
use crate::progress::repo_types::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    Forward,
    Backward,
}

/// Day 1 is the floor; the cursor never goes below it.
pub fn shifted_day(current: i32, direction: ShiftDirection) -> ApiResult<i32> {
    let new_day = match direction {
        ShiftDirection::Forward => current + 1,
        ShiftDirection::Backward => current - 1,
    };
    if new_day < 1 {
        return Err(ApiError::validation("Cannot move to day 0 or less."));
    }
    Ok(new_day)
}

/// The cursor only exists for an active plan.
async fn resolve_active_plan(db: &PgPool, user_id: Uuid) -> ApiResult<Plan> {
    let plan = resolve_current_plan(db, user_id).await?;
    if plan.status != PlanStatus::Active {
        return Err(ApiError::validation(
            "Active plan not found. Please confirm a plan first.",
        ));
    }
    Ok(plan)
}

/// The in-progress day for the user's active plan; first access creates
/// day 1.
pub async fn current_day(db: &PgPool, user_id: Uuid) -> ApiResult<Progress> {
    let plan = resolve_active_plan(db, user_id).await?;
    let record = Progress::get_or_create_current(db, user_id, plan.id).await?;
    Ok(record)
}

/// Complete the in-progress day and move the cursor to the next one.
pub async fn complete_today(db: &PgPool, user_id: Uuid) -> ApiResult<Progress> {
    let plan = resolve_active_plan(db, user_id).await?;

    let mut tx = db.begin().await?;
    let completed = Progress::complete_current(&mut *tx, user_id, plan.id)
        .await?
        .ok_or_else(|| ApiError::not_found("No in-progress day to complete."))?;
    let next =
        Progress::insert_in_progress(&mut *tx, user_id, plan.id, completed.day_number + 1).await?;
    tx.commit().await?;

    info!(%user_id, plan_id = %plan.id, day = completed.day_number, "day completed");
    Ok(next)
}

/// Move the cursor one day in either direction. The current record is
/// completed rather than rewritten, so going backward mints a fresh record
/// and the history keeps growing.
pub async fn shift_day(
    db: &PgPool,
    user_id: Uuid,
    direction: ShiftDirection,
) -> ApiResult<Progress> {
    let plan = resolve_active_plan(db, user_id).await?;

    let current = Progress::find_in_progress(db, user_id, plan.id)
        .await?
        .ok_or_else(|| ApiError::not_found("No current day found."))?;
    let new_day = shifted_day(current.day_number, direction)?;

    let mut tx = db.begin().await?;
    Progress::complete_current(&mut *tx, user_id, plan.id)
        .await?
        .ok_or_else(|| ApiError::not_found("No current day found."))?;
    let record = Progress::insert_in_progress(&mut *tx, user_id, plan.id, new_day).await?;
    tx.commit().await?;

    info!(%user_id, plan_id = %plan.id, from = current.day_number, to = new_day, "day shifted");
    Ok(record)
}

/// Every record ever minted for the plan, day order.
pub async fn history(db: &PgPool, user_id: Uuid) -> ApiResult<Vec<Progress>> {
    let plan = resolve_active_plan(db, user_id).await?;
    let records = Progress::list_history(db, user_id, plan.id).await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_advances_by_one() {
        assert_eq!(shifted_day(3, ShiftDirection::Forward).unwrap(), 4);
    }

    #[test]
    fn backward_from_day_two_reaches_day_one() {
        assert_eq!(shifted_day(2, ShiftDirection::Backward).unwrap(), 1);
    }

    #[test]
    fn backward_from_day_one_is_rejected() {
        let err = shifted_day(1, ShiftDirection::Backward).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn direction_parses_from_path_segments() {
        let forward: ShiftDirection = serde_json::from_str("\"forward\"").unwrap();
        let backward: ShiftDirection = serde_json::from_str("\"backward\"").unwrap();
        assert_eq!(forward, ShiftDirection::Forward);
        assert_eq!(backward, ShiftDirection::Backward);
    }
}
