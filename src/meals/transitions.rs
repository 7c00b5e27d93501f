use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::meals::repo_types::{Consumption, Meal, MealStatus};

/// Consumption as reported by the client; anything omitted falls back to the
/// planned values.
#[derive(Debug, Default, Clone)]
pub struct ConsumptionInput {
    pub calories_consumed: Option<i32>,
    pub protein_consumed: Option<i32>,
    pub carbs_consumed: Option<i32>,
    pub fats_consumed: Option<i32>,
    pub portion_eaten: Option<i32>,
    pub notes: Option<String>,
}

/// pending -> prepared
pub fn prepare(mut m: Meal, now: OffsetDateTime) -> ApiResult<Meal> {
    match m.status {
        MealStatus::Pending => {
            m.status = MealStatus::Prepared;
            m.prep_started_at = Some(now);
            Ok(m)
        }
        other => Err(invalid_transition("prepare", other)),
    }
}

/// pending | prepared -> consumed. Records actual consumption, defaulting
/// each macro to the planned value and the portion to 100%.
pub fn consume(
    mut m: Meal,
    input: ConsumptionInput,
    rating: Option<i32>,
    now: OffsetDateTime,
) -> ApiResult<Meal> {
    match m.status {
        MealStatus::Pending | MealStatus::Prepared => {}
        other => return Err(invalid_transition("consume", other)),
    }
    let portion = input.portion_eaten.unwrap_or(100);
    if !(0..=100).contains(&portion) {
        return Err(ApiError::validation("portion_eaten must be between 0 and 100"));
    }
    if let Some(r) = rating {
        if !(1..=5).contains(&r) {
            return Err(ApiError::validation("rating must be between 1 and 5"));
        }
    }

    let planned = &m.meal_data.0;
    m.consumption = Some(sqlx::types::Json(Consumption {
        calories_consumed: input.calories_consumed.unwrap_or(planned.calories),
        protein_consumed: input.protein_consumed.unwrap_or(planned.protein),
        carbs_consumed: input.carbs_consumed.unwrap_or(planned.carbs),
        fats_consumed: input.fats_consumed.unwrap_or(planned.fats),
        portion_eaten: portion,
        notes: input.notes,
    }));
    m.status = MealStatus::Consumed;
    m.consumed_at = Some(now);
    if rating.is_some() {
        m.rating = rating;
    }
    Ok(m)
}

/// pending | prepared -> skipped
pub fn skip(mut m: Meal, notes: Option<String>) -> ApiResult<Meal> {
    match m.status {
        MealStatus::Pending | MealStatus::Prepared => {}
        other => return Err(invalid_transition("skip", other)),
    }
    m.status = MealStatus::Skipped;
    if notes.is_some() {
        m.notes = notes;
    }
    Ok(m)
}

fn invalid_transition(action: &str, status: MealStatus) -> ApiError {
    ApiError::conflict(format!("Cannot {action} a meal in state {status:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::template::{MealData, MealSlot};
    use sqlx::types::Json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn meal(status: MealStatus) -> Meal {
        let now = datetime!(2026-08-03 08:00 UTC);
        Meal {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            day_number: 1,
            week_number: 1,
            meal_date: now.date(),
            slot: MealSlot::Breakfast,
            status,
            meal_data: Json(MealData {
                name: "Mediterranean Oatmeal Bowl".into(),
                calories: 350,
                protein: 12,
                carbs: 55,
                fats: 10,
                ingredients: vec!["rolled oats".into(), "almonds".into()],
                prep_time_minutes: 8,
                instructions: None,
            }),
            consumption: None,
            prep_started_at: None,
            consumed_at: None,
            notes: None,
            rating: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn prepare_sets_status_and_timestamp() {
        let now = datetime!(2026-08-03 08:15 UTC);
        let m = prepare(meal(MealStatus::Pending), now).unwrap();
        assert_eq!(m.status, MealStatus::Prepared);
        assert_eq!(m.prep_started_at, Some(now));
    }

    #[test]
    fn prepare_rejects_consumed() {
        let err = prepare(meal(MealStatus::Consumed), datetime!(2026-08-03 08:15 UTC))
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn consume_defaults_to_planned_macros_and_full_portion() {
        let now = datetime!(2026-08-03 09:00 UTC);
        let m = consume(meal(MealStatus::Prepared), ConsumptionInput::default(), None, now)
            .unwrap();
        assert_eq!(m.status, MealStatus::Consumed);
        assert_eq!(m.consumed_at, Some(now));
        let c = m.consumption.unwrap().0;
        assert_eq!(c.calories_consumed, 350);
        assert_eq!(c.protein_consumed, 12);
        assert_eq!(c.portion_eaten, 100);
    }

    #[test]
    fn consume_keeps_reported_values() {
        let input = ConsumptionInput {
            calories_consumed: Some(200),
            portion_eaten: Some(50),
            notes: Some("half portion".into()),
            ..Default::default()
        };
        let m = consume(
            meal(MealStatus::Pending),
            input,
            Some(4),
            datetime!(2026-08-03 09:00 UTC),
        )
        .unwrap();
        let c = m.consumption.unwrap().0;
        assert_eq!(c.calories_consumed, 200);
        assert_eq!(c.portion_eaten, 50);
        assert_eq!(m.rating, Some(4));
    }

    #[test]
    fn consume_rejects_bad_portion() {
        let input = ConsumptionInput {
            portion_eaten: Some(140),
            ..Default::default()
        };
        let err = consume(
            meal(MealStatus::Pending),
            input,
            None,
            datetime!(2026-08-03 09:00 UTC),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn skip_rejects_already_consumed() {
        let err = skip(meal(MealStatus::Consumed), None).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
