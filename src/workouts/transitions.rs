use time::OffsetDateTime;

use crate::error::{ApiError, ApiResult};
use crate::workouts::repo_types::{Workout, WorkoutStatus};

#[derive(Debug, Default, Clone)]
pub struct CompletionSummary {
    pub duration_minutes: Option<i32>,
    pub calories_burned: Option<i32>,
    pub difficulty_rating: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ExerciseLog {
    pub completed_sets: Option<i32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// pending -> in_progress
pub fn start(mut w: Workout) -> ApiResult<Workout> {
    match w.status {
        WorkoutStatus::Pending => {
            w.status = WorkoutStatus::InProgress;
            Ok(w)
        }
        other => Err(invalid_transition("start", other)),
    }
}

/// pending | in_progress -> completed. Marks every exercise fully done and
/// records the summary the user reported.
pub fn complete(
    mut w: Workout,
    summary: CompletionSummary,
    now: OffsetDateTime,
) -> ApiResult<Workout> {
    match w.status {
        WorkoutStatus::Pending | WorkoutStatus::InProgress => {}
        other => return Err(invalid_transition("complete", other)),
    }
    if let Some(rating) = summary.difficulty_rating {
        if !(1..=10).contains(&rating) {
            return Err(ApiError::validation("difficulty_rating must be between 1 and 10"));
        }
    }

    w.status = WorkoutStatus::Completed;
    w.completed_at = Some(now);
    for exercise in w.exercises.0.iter_mut() {
        exercise.completed_sets = exercise.sets;
    }
    if summary.duration_minutes.is_some() {
        w.duration_minutes = summary.duration_minutes;
    }
    if summary.calories_burned.is_some() {
        w.calories_burned = summary.calories_burned;
    }
    if summary.difficulty_rating.is_some() {
        w.difficulty_rating = summary.difficulty_rating;
    }
    if summary.notes.is_some() {
        w.notes = summary.notes;
    }
    Ok(w)
}

/// pending | in_progress -> skipped
pub fn skip(mut w: Workout, notes: Option<String>) -> ApiResult<Workout> {
    match w.status {
        WorkoutStatus::Pending | WorkoutStatus::InProgress => {}
        other => return Err(invalid_transition("skip", other)),
    }
    w.status = WorkoutStatus::Skipped;
    if notes.is_some() {
        w.notes = notes;
    }
    Ok(w)
}

/// Record progress on one exercise. Completed sets are clamped to the
/// planned set count.
pub fn log_exercise(mut w: Workout, index: usize, log: ExerciseLog) -> ApiResult<Workout> {
    let exercise = w
        .exercises
        .0
        .get_mut(index)
        .ok_or_else(|| ApiError::validation("Exercise index out of range"))?;

    if let Some(completed) = log.completed_sets {
        if completed < 0 {
            return Err(ApiError::validation("completed_sets must not be negative"));
        }
        exercise.completed_sets = completed.min(exercise.sets);
    }
    if log.weight.is_some() {
        exercise.weight = log.weight;
    }
    if log.notes.is_some() {
        exercise.notes = log.notes;
    }
    Ok(w)
}

fn invalid_transition(action: &str, status: WorkoutStatus) -> ApiError {
    ApiError::conflict(format!("Cannot {action} a workout in state {status:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workouts::repo_types::ExerciseEntry;
    use sqlx::types::Json;
    use time::macros::datetime;
    use uuid::Uuid;

    fn workout(status: WorkoutStatus) -> Workout {
        let now = datetime!(2026-08-03 12:00 UTC);
        Workout {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: Uuid::new_v4(),
            day_number: 1,
            week_number: 1,
            workout_date: now.date(),
            status,
            exercises: Json(vec![ExerciseEntry {
                name: "Push-ups".into(),
                sets: 3,
                reps: "8-12".into(),
                weight: None,
                rest_seconds: 60,
                muscle_groups: vec!["chest".into()],
                completed_sets: 1,
                notes: None,
            }]),
            duration_minutes: Some(22),
            calories_burned: None,
            difficulty_rating: None,
            notes: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn start_moves_pending_to_in_progress() {
        let w = start(workout(WorkoutStatus::Pending)).unwrap();
        assert_eq!(w.status, WorkoutStatus::InProgress);
    }

    #[test]
    fn start_rejects_completed() {
        let err = start(workout(WorkoutStatus::Completed)).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn complete_fills_all_sets_and_timestamps() {
        let now = datetime!(2026-08-03 18:30 UTC);
        let summary = CompletionSummary {
            duration_minutes: Some(45),
            calories_burned: Some(300),
            difficulty_rating: Some(7),
            notes: Some("felt strong".into()),
        };
        let w = complete(workout(WorkoutStatus::InProgress), summary, now).unwrap();
        assert_eq!(w.status, WorkoutStatus::Completed);
        assert_eq!(w.completed_at, Some(now));
        assert_eq!(w.exercises.0[0].completed_sets, 3);
        assert_eq!(w.duration_minutes, Some(45));
        assert_eq!(w.difficulty_rating, Some(7));
    }

    #[test]
    fn complete_rejects_out_of_scale_rating() {
        let summary = CompletionSummary {
            difficulty_rating: Some(11),
            ..Default::default()
        };
        let err = complete(
            workout(WorkoutStatus::Pending),
            summary,
            datetime!(2026-08-03 18:30 UTC),
        )
        .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn skip_rejects_already_skipped() {
        let err = skip(workout(WorkoutStatus::Skipped), None).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[test]
    fn log_exercise_clamps_to_planned_sets() {
        let log = ExerciseLog {
            completed_sets: Some(10),
            weight: Some(40.0),
            notes: None,
        };
        let w = log_exercise(workout(WorkoutStatus::InProgress), 0, log).unwrap();
        assert_eq!(w.exercises.0[0].completed_sets, 3);
        assert_eq!(w.exercises.0[0].weight, Some(40.0));
    }

    #[test]
    fn log_exercise_rejects_bad_index() {
        let err = log_exercise(workout(WorkoutStatus::Pending), 5, ExerciseLog::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
