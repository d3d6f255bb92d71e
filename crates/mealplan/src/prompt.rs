use chrono::NaiveDate;

use crate::{MEAL_CALORIES, Meal, Preferences};

pub const SYSTEM_INSTRUCTION: &str = "You are a precise meal plan generator that MUST:
1. Generate meal plans exactly matching the requested JSON structure
2. Use only real, specific meal names and descriptions
3. Use actual calorie numbers within the specified range
4. Include realistic ingredients with quantities
5. Provide clear, step-by-step cooking instructions
6. Never use placeholder values
7. Never add extra fields to the JSON structure";

/// System instruction and user prompt for one generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

fn example_meal() -> Meal {
    Meal {
        name: "Breakfast: Oatmeal with Fruit".to_owned(),
        description: "Hot oatmeal topped with fresh berries and honey".to_owned(),
        calories: 400,
        ingredients: vec![
            "1 cup oats".to_owned(),
            "1 cup milk".to_owned(),
            "1/2 cup mixed berries".to_owned(),
            "1 tbsp honey".to_owned(),
        ],
        instructions: vec![
            "Bring milk to a boil".to_owned(),
            "Add oats and cook for 5 minutes".to_owned(),
            "Top with berries and honey".to_owned(),
        ],
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "None".to_owned()
    } else {
        items.join(", ")
    }
}

/// Builds the generation prompt. Pure: same preferences and date, same prompt.
pub fn build_prompt(preferences: &Preferences, today: NaiveDate) -> Prompt {
    let meals_per_day = preferences.meals_per_day();
    let calories_per_meal = preferences.calories_per_meal();
    let calorie_goal = preferences.calorie_goal;
    let min_calories = MEAL_CALORIES.start();
    let max_calories = MEAL_CALORIES.end();
    let example = serde_json::to_string_pretty(&example_meal()).unwrap_or_default();

    let mut context = format!(
        "Dietary restrictions: {}\nAllergies: {}",
        list_or_none(&preferences.dietary_restrictions),
        list_or_none(&preferences.allergies),
    );

    if !preferences.cuisine_preferences.is_empty() {
        context.push_str(&format!(
            "\nPreferred cuisines: {}",
            preferences.cuisine_preferences.join(", ")
        ));
    }

    if let Some(prep_time) = preferences.meal_prep_time {
        context.push_str(&format!(
            "\nMaximum preparation time per meal: {}",
            prep_time.describe()
        ));
    }

    let user = format!(
        r#"Create a meal plan with exactly {meals_per_day} meals totaling {calorie_goal} calories.

{context}

STRICT REQUIREMENTS:
1. Return a single JSON object with exactly this structure (no extra fields):
{{
  "date": "{today}",
  "meals": [
    {{
      "name": "Must start with meal type (Breakfast:/Lunch:/Dinner:) followed by the specific meal name",
      "description": "Detailed description of the meal",
      "calories": Must be a number between {min_calories} and {max_calories},
      "ingredients": ["3-8 specific ingredients with quantities"],
      "instructions": ["2-5 specific cooking steps"]
    }}
  ],
  "totalCalories": Must equal {calorie_goal}
}}

2. Each meal should be around {calories_per_meal} calories (±200)
3. DO NOT include any placeholder values like "number" or "text"
4. DO NOT include any fields not shown in the structure above
5. Ensure all JSON syntax is valid with proper quotes and brackets

Here's a correctly formatted example meal:
{example}"#,
        today = today.format("%Y-%m-%d"),
    );

    Prompt {
        system: SYSTEM_INSTRUCTION.to_owned(),
        user,
    }
}
