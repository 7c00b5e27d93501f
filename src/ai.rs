use axum::async_trait;
use tracing::warn;

use crate::plans::template::{
    DailyMealTemplate, DailyMeals, ExerciseTemplate, MealData, MealTemplate, PlanTemplate,
    WorkoutDayTemplate, WorkoutTemplate, WorkoutWeekTemplate,
};

/// Goal metadata handed to the generator.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    pub goal: String,
    pub duration_weeks: i32,
    pub difficulty: String,
    pub focus_areas: Vec<String>,
    pub equipment: Vec<String>,
}

/// Boundary to the generative model. Implementations own prompting, response
/// parsing and whatever cleanup the model's output needs; callers only ever
/// see a structured template or an error.
#[async_trait]
pub trait PlanGenerator: Send + Sync {
    async fn generate(&self, request: &PlanRequest) -> anyhow::Result<PlanTemplate>;
}

/// Default generator: always answers with the canned template. Stands in
/// until a model-backed implementation is wired up, and doubles as the test
/// double.
pub struct CannedPlanGenerator;

#[async_trait]
impl PlanGenerator for CannedPlanGenerator {
    async fn generate(&self, _request: &PlanRequest) -> anyhow::Result<PlanTemplate> {
        Ok(fallback_template())
    }
}

/// Ask the generator for a template; substitute the canned fallback when the
/// call fails or comes back structurally unusable. Availability wins over
/// fidelity here: the user always gets a plan.
pub async fn generate_or_fallback(
    generator: &dyn PlanGenerator,
    request: &PlanRequest,
) -> PlanTemplate {
    match generator.generate(request).await {
        Ok(template) if !template.workout.weeks.is_empty() => template,
        Ok(_) => {
            warn!(goal = %request.goal, "generator returned an empty template, using fallback");
            fallback_template()
        }
        Err(e) => {
            warn!(error = %e, goal = %request.goal, "plan generation failed, using fallback");
            fallback_template()
        }
    }
}

/// Schema-valid single-week starter plan: bodyweight work plus a
/// Mediterranean daily menu.
pub fn fallback_template() -> PlanTemplate {
    let workout = WorkoutTemplate {
        weeks: vec![WorkoutWeekTemplate {
            week: 1,
            focus: "Foundation Building".into(),
            days: vec![
                WorkoutDayTemplate {
                    day: 1,
                    day_name: "Monday".into(),
                    is_rest_day: false,
                    exercises: vec![
                        exercise("Push-ups", 3, "8-12", 60, &["chest", "triceps", "shoulders"]),
                        exercise(
                            "Bodyweight Squats",
                            3,
                            "12-15",
                            45,
                            &["quadriceps", "glutes", "hamstrings"],
                        ),
                        exercise("Plank", 3, "30-60 seconds", 30, &["core", "shoulders"]),
                    ],
                },
                WorkoutDayTemplate {
                    day: 2,
                    day_name: "Tuesday".into(),
                    is_rest_day: true,
                    exercises: vec![],
                },
                WorkoutDayTemplate {
                    day: 3,
                    day_name: "Wednesday".into(),
                    is_rest_day: false,
                    exercises: vec![
                        exercise(
                            "Lunges",
                            3,
                            "10 each leg",
                            45,
                            &["quadriceps", "glutes", "hamstrings"],
                        ),
                        exercise("Mountain Climbers", 3, "20", 30, &["core", "shoulders", "legs"]),
                    ],
                },
            ],
        }],
        notes: Some(
            "Fallback plan - start with bodyweight exercises and progress gradually".into(),
        ),
    };

    let meal = MealTemplate {
        daily_template: DailyMealTemplate {
            total_calories: 1800,
            total_protein: 120,
            total_carbs: 180,
            total_fats: 60,
            meals: DailyMeals {
                breakfast: meal_data(
                    "Mediterranean Oatmeal Bowl",
                    350,
                    12,
                    55,
                    10,
                    &["rolled oats", "almonds", "dates", "cinnamon", "greek yogurt"],
                    8,
                ),
                morning_snack: meal_data(
                    "Mixed Nuts and Fruit",
                    180,
                    6,
                    15,
                    12,
                    &["almonds", "walnuts", "apple"],
                    2,
                ),
                lunch: meal_data(
                    "Grilled Chicken with Couscous",
                    480,
                    35,
                    45,
                    15,
                    &["chicken breast", "couscous", "mixed vegetables", "olive oil"],
                    25,
                ),
                afternoon_snack: meal_data(
                    "Hummus with Vegetables",
                    140,
                    6,
                    16,
                    8,
                    &["chickpea hummus", "cucumber", "carrots", "bell peppers"],
                    3,
                ),
                dinner: meal_data(
                    "Baked Fish with Quinoa",
                    420,
                    30,
                    35,
                    12,
                    &["white fish fillet", "quinoa", "roasted vegetables"],
                    30,
                ),
                evening_snack: None,
            },
        },
        weekly_variations: vec![
            "Replace fish with lentils 2x per week".into(),
            "Swap couscous for bulgur wheat occasionally".into(),
        ],
        notes: Some("Adjust portions based on activity level and progress.".into()),
    };

    PlanTemplate { workout, meal }
}

fn exercise(
    name: &str,
    sets: i32,
    reps: &str,
    rest_seconds: i32,
    muscle_groups: &[&str],
) -> ExerciseTemplate {
    ExerciseTemplate {
        name: name.into(),
        sets,
        reps: reps.into(),
        rest_seconds,
        muscle_groups: muscle_groups.iter().map(|s| s.to_string()).collect(),
    }
}

fn meal_data(
    name: &str,
    calories: i32,
    protein: i32,
    carbs: i32,
    fats: i32,
    ingredients: &[&str],
    prep_time_minutes: i32,
) -> MealData {
    MealData {
        name: name.into(),
        calories,
        protein,
        carbs,
        fats,
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        prep_time_minutes,
        instructions: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PlanRequest {
        PlanRequest {
            goal: "muscle_gain".into(),
            duration_weeks: 8,
            difficulty: "beginner".into(),
            focus_areas: vec![],
            equipment: vec![],
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl PlanGenerator for FailingGenerator {
        async fn generate(&self, _request: &PlanRequest) -> anyhow::Result<PlanTemplate> {
            anyhow::bail!("model unavailable")
        }
    }

    struct EmptyGenerator;

    #[async_trait]
    impl PlanGenerator for EmptyGenerator {
        async fn generate(&self, _request: &PlanRequest) -> anyhow::Result<PlanTemplate> {
            let mut t = fallback_template();
            t.workout.weeks.clear();
            Ok(t)
        }
    }

    #[test]
    fn fallback_template_is_structurally_complete() {
        let t = fallback_template();
        assert!(!t.workout.weeks.is_empty());
        // All five canonical slots populated, evening snack absent.
        assert_eq!(t.meal.daily_template.meals.populated().count(), 5);
        // Rest days carry no exercises.
        for week in &t.workout.weeks {
            for day in &week.days {
                if day.is_rest_day {
                    assert!(day.exercises.is_empty());
                }
            }
        }
    }

    #[tokio::test]
    async fn generator_failure_falls_back_to_the_canned_template() {
        let template = generate_or_fallback(&FailingGenerator, &request()).await;
        assert_eq!(template, fallback_template());
    }

    #[tokio::test]
    async fn structurally_empty_response_falls_back_too() {
        let template = generate_or_fallback(&EmptyGenerator, &request()).await;
        assert!(!template.workout.weeks.is_empty());
    }

    #[tokio::test]
    async fn canned_generator_always_succeeds() {
        let template = CannedPlanGenerator.generate(&request()).await.unwrap();
        assert!(!template.workout.weeks.is_empty());
    }
}
