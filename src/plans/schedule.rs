use time::{Date, Duration};

use crate::plans::template::{ExerciseTemplate, MealData, MealSlot, MealTemplate, WorkoutTemplate};
use crate::workouts::repo_types::ExerciseEntry;

/// Start on the next Monday on or after `today`; today counts if it already
/// is a Monday. Dates are whole calendar days, so day boundaries do not move
/// with the time of invocation.
pub fn plan_start_date(today: Date) -> Date {
    let days_past_monday = i64::from(today.weekday().number_days_from_monday());
    if days_past_monday == 0 {
        today
    } else {
        today + Duration::days(7 - days_past_monday)
    }
}

/// `day_number` is 1-based and global across the plan.
pub fn day_date(start: Date, day_number: i32) -> Date {
    start + Duration::days(i64::from(day_number) - 1)
}

/// week_number = ceil(day_number / 7)
pub fn week_of_day(day_number: i32) -> i32 {
    (day_number + 6) / 7
}

/// Estimate: 2 minutes per set plus 10 minutes warm-up/cool-down.
pub fn estimated_duration_minutes(exercises: &[ExerciseTemplate]) -> i32 {
    let set_minutes: i32 = exercises.iter().map(|e| e.sets * 2).sum();
    set_minutes + 10
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorkout {
    pub day_number: i32,
    pub week_number: i32,
    pub date: Date,
    pub exercises: Vec<ExerciseEntry>,
    pub duration_minutes: i32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub day_number: i32,
    pub week_number: i32,
    pub date: Date,
    pub slot: MealSlot,
    pub meal_data: MealData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterializedSchedule {
    pub workouts: Vec<NewWorkout>,
    pub meals: Vec<NewMeal>,
}

/// Expand a plan's templates into the full dated instance set. Pure: no I/O,
/// and the same template + start date always yields the same content, so a
/// retried activation re-derives an identical schedule.
pub fn materialize(
    workout_template: &WorkoutTemplate,
    meal_template: &MealTemplate,
    start: Date,
) -> MaterializedSchedule {
    let mut workouts = Vec::new();
    let mut meals = Vec::new();
    let daily = &meal_template.daily_template.meals;

    for week in &workout_template.weeks {
        for day in &week.days {
            if day.is_rest_day {
                continue;
            }
            let day_number = (week.week - 1) * 7 + day.day;
            workouts.push(NewWorkout {
                day_number,
                week_number: week.week,
                date: day_date(start, day_number),
                exercises: day.exercises.iter().map(ExerciseEntry::from_template).collect(),
                duration_minutes: estimated_duration_minutes(&day.exercises),
                notes: format!("Week {} - {} workout", week.week, day.day_name),
            });
        }

        // Meals cover every calendar day of the week, rest days included.
        for day in 1..=7 {
            let day_number = (week.week - 1) * 7 + day;
            let date = day_date(start, day_number);
            for (slot, meal_data) in daily.populated() {
                meals.push(NewMeal {
                    day_number,
                    week_number: week.week,
                    date,
                    slot,
                    meal_data: meal_data.clone(),
                });
            }
        }
    }

    MaterializedSchedule { workouts, meals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plans::template::{
        DailyMealTemplate, DailyMeals, WorkoutDayTemplate, WorkoutWeekTemplate,
    };
    use time::macros::date;
    use time::Weekday;

    fn exercise(sets: i32) -> ExerciseTemplate {
        ExerciseTemplate {
            name: "Push-ups".into(),
            sets,
            reps: "8-12".into(),
            rest_seconds: 60,
            muscle_groups: vec!["chest".into()],
        }
    }

    fn meal(name: &str) -> MealData {
        MealData {
            name: name.into(),
            calories: 400,
            protein: 20,
            carbs: 40,
            fats: 10,
            ingredients: vec!["oats".into()],
            prep_time_minutes: 10,
            instructions: None,
        }
    }

    fn meal_template() -> MealTemplate {
        MealTemplate {
            daily_template: DailyMealTemplate {
                total_calories: 1800,
                total_protein: 120,
                total_carbs: 180,
                total_fats: 60,
                meals: DailyMeals {
                    breakfast: meal("breakfast"),
                    morning_snack: meal("morning snack"),
                    lunch: meal("lunch"),
                    afternoon_snack: meal("afternoon snack"),
                    dinner: meal("dinner"),
                    evening_snack: None,
                },
            },
            weekly_variations: vec![],
            notes: None,
        }
    }

    fn one_week_template() -> WorkoutTemplate {
        WorkoutTemplate {
            weeks: vec![WorkoutWeekTemplate {
                week: 1,
                focus: "Foundation".into(),
                days: vec![
                    WorkoutDayTemplate {
                        day: 1,
                        day_name: "Monday".into(),
                        is_rest_day: false,
                        exercises: vec![exercise(3), exercise(3)],
                    },
                    WorkoutDayTemplate {
                        day: 2,
                        day_name: "Tuesday".into(),
                        is_rest_day: true,
                        exercises: vec![],
                    },
                ],
            }],
            notes: None,
        }
    }

    #[test]
    fn start_date_is_today_on_a_monday() {
        let monday = date!(2026 - 08 - 03);
        assert_eq!(monday.weekday(), Weekday::Monday);
        assert_eq!(plan_start_date(monday), monday);
    }

    #[test]
    fn start_date_rolls_forward_to_next_monday() {
        let tuesday = date!(2026 - 08 - 04);
        let sunday = date!(2026 - 08 - 09);
        assert_eq!(plan_start_date(tuesday), date!(2026 - 08 - 10));
        assert_eq!(plan_start_date(sunday), date!(2026 - 08 - 10));
    }

    #[test]
    fn week_of_day_matches_the_numbering_convention() {
        assert_eq!(week_of_day(7), 1);
        assert_eq!(week_of_day(8), 2);
        assert_eq!(week_of_day(10), 2);
    }

    #[test]
    fn duration_is_ten_plus_two_per_set() {
        assert_eq!(
            estimated_duration_minutes(&[exercise(3), exercise(3), exercise(3)]),
            28
        );
        assert_eq!(estimated_duration_minutes(&[]), 10);
    }

    #[test]
    fn materialization_is_deterministic() {
        let start = date!(2026 - 08 - 03);
        let workout = one_week_template();
        let meal = meal_template();
        assert_eq!(
            materialize(&workout, &meal, start),
            materialize(&workout, &meal, start)
        );
    }

    #[test]
    fn one_week_plan_end_to_end() {
        let start = date!(2026 - 08 - 03);
        let schedule = materialize(&one_week_template(), &meal_template(), start);

        // Rest day produces no workout.
        assert_eq!(schedule.workouts.len(), 1);
        let w = &schedule.workouts[0];
        assert_eq!(w.day_number, 1);
        assert_eq!(w.week_number, 1);
        assert_eq!(w.date, start);
        assert_eq!(w.duration_minutes, 22);
        assert!(w.exercises.iter().all(|e| e.completed_sets == 0));

        // 7 days x 5 populated slots.
        assert_eq!(schedule.meals.len(), 35);
        let last = schedule.meals.last().unwrap();
        assert_eq!(last.day_number, 7);
        assert_eq!(last.date, date!(2026 - 08 - 09));
    }

    #[test]
    fn second_week_dates_are_offset_by_seven_days() {
        let mut template = one_week_template();
        template.weeks.push(WorkoutWeekTemplate {
            week: 2,
            focus: "Build".into(),
            days: vec![WorkoutDayTemplate {
                day: 3,
                day_name: "Wednesday".into(),
                is_rest_day: false,
                exercises: vec![exercise(4)],
            }],
        });

        let start = date!(2026 - 08 - 03);
        let schedule = materialize(&template, &meal_template(), start);

        let week2 = schedule.workouts.iter().find(|w| w.week_number == 2).unwrap();
        assert_eq!(week2.day_number, 10);
        assert_eq!(week2.date, date!(2026 - 08 - 12));
        assert_eq!(week_of_day(week2.day_number), 2);
        assert_eq!(schedule.meals.len(), 70);
    }
}
