use serde::{Deserialize, Serialize};

/// Abstract weekly structure produced by the plan generator. Pure data: the
/// materializer in `schedule.rs` is the only thing that interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTemplate {
    pub name: String,
    pub sets: i32,
    pub reps: String,
    pub rest_seconds: i32,
    pub muscle_groups: Vec<String>,
}

/// One day inside a template week. `day` is the 1..7 position within the
/// week, not the global day number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDayTemplate {
    pub day: i32,
    pub day_name: String,
    #[serde(default)]
    pub is_rest_day: bool,
    #[serde(default)]
    pub exercises: Vec<ExerciseTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutWeekTemplate {
    pub week: i32,
    pub focus: String,
    pub days: Vec<WorkoutDayTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub weeks: Vec<WorkoutWeekTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WorkoutTemplate {
    /// Template day for a global day number, or None for rest days and days
    /// the template never scheduled.
    pub fn day_for(&self, day_number: i32) -> Option<&WorkoutDayTemplate> {
        let week = (day_number + 6) / 7;
        let position = (day_number - 1) % 7 + 1;
        self.weeks
            .iter()
            .find(|w| w.week == week)?
            .days
            .iter()
            .find(|d| d.day == position && !d.is_rest_day)
    }
}

/// A single meal as planned: name, macro targets, ingredients, prep time.
/// Doubles as the snapshot copied onto materialized meal instances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealData {
    pub name: String,
    pub calories: i32,
    pub protein: i32,
    pub carbs: i32,
    pub fats: i32,
    pub ingredients: Vec<String>,
    pub prep_time_minutes: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// The six canonical meal slots. The daily template only populates the first
/// five; `evening_snack` is optional by convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "meal_slot", rename_all = "snake_case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

impl MealSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning_snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon_snack",
            MealSlot::Dinner => "dinner",
            MealSlot::EveningSnack => "evening_snack",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMeals {
    pub breakfast: MealData,
    pub morning_snack: MealData,
    pub lunch: MealData,
    pub afternoon_snack: MealData,
    pub dinner: MealData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening_snack: Option<MealData>,
}

impl DailyMeals {
    pub fn slot(&self, slot: MealSlot) -> Option<&MealData> {
        match slot {
            MealSlot::Breakfast => Some(&self.breakfast),
            MealSlot::MorningSnack => Some(&self.morning_snack),
            MealSlot::Lunch => Some(&self.lunch),
            MealSlot::AfternoonSnack => Some(&self.afternoon_snack),
            MealSlot::Dinner => Some(&self.dinner),
            MealSlot::EveningSnack => self.evening_snack.as_ref(),
        }
    }

    /// Populated (slot, meal) pairs in canonical slot order.
    pub fn populated(&self) -> impl Iterator<Item = (MealSlot, &MealData)> {
        [
            MealSlot::Breakfast,
            MealSlot::MorningSnack,
            MealSlot::Lunch,
            MealSlot::AfternoonSnack,
            MealSlot::Dinner,
            MealSlot::EveningSnack,
        ]
        .into_iter()
        .filter_map(|s| self.slot(s).map(|m| (s, m)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMealTemplate {
    pub total_calories: i32,
    pub total_protein: i32,
    pub total_carbs: i32,
    pub total_fats: i32,
    pub meals: DailyMeals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealTemplate {
    pub daily_template: DailyMealTemplate,
    #[serde(default)]
    pub weekly_variations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The two halves a generator must always return together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTemplate {
    pub workout: WorkoutTemplate,
    pub meal: MealTemplate,
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn daily() -> DailyMeals {
        DailyMeals {
            breakfast: meal("breakfast"),
            morning_snack: meal("morning snack"),
            lunch: meal("lunch"),
            afternoon_snack: meal("afternoon snack"),
            dinner: meal("dinner"),
            evening_snack: None,
        }
    }

    #[test]
    fn five_slots_populated_by_convention() {
        let slots: Vec<MealSlot> = daily().populated().map(|(s, _)| s).collect();
        assert_eq!(slots.len(), 5);
        assert!(!slots.contains(&MealSlot::EveningSnack));
    }

    #[test]
    fn evening_snack_shows_up_when_present() {
        let mut meals = daily();
        meals.evening_snack = Some(meal("evening snack"));
        assert_eq!(meals.populated().count(), 6);
    }

    #[test]
    fn day_for_maps_global_day_to_week_position() {
        let template = WorkoutTemplate {
            weeks: vec![
                WorkoutWeekTemplate {
                    week: 1,
                    focus: "base".into(),
                    days: vec![WorkoutDayTemplate {
                        day: 1,
                        day_name: "Monday".into(),
                        is_rest_day: false,
                        exercises: vec![],
                    }],
                },
                WorkoutWeekTemplate {
                    week: 2,
                    focus: "build".into(),
                    days: vec![
                        WorkoutDayTemplate {
                            day: 3,
                            day_name: "Wednesday".into(),
                            is_rest_day: false,
                            exercises: vec![],
                        },
                        WorkoutDayTemplate {
                            day: 4,
                            day_name: "Thursday".into(),
                            is_rest_day: true,
                            exercises: vec![],
                        },
                    ],
                },
            ],
            notes: None,
        };

        // Global day 10 is week 2, position 3.
        assert!(template.day_for(10).is_some());
        // Rest days are never returned.
        assert!(template.day_for(11).is_none());
        // Days the template never scheduled.
        assert!(template.day_for(5).is_none());
    }

    #[test]
    fn meal_slot_serializes_snake_case() {
        let json = serde_json::to_string(&MealSlot::MorningSnack).unwrap();
        assert_eq!(json, "\"morning_snack\"");
    }
}
