use serde_json::Value;

use crate::{
    GenerationError, MEAL_CALORIES, MIN_INGREDIENTS, MIN_INSTRUCTIONS, Meal, MealType,
    MealViolation,
};

/// Checks the parsed model output against the meal plan rules and converts it
/// into typed meals.
///
/// The meal count must match exactly. Meals are checked in order; the first
/// meal with any violation fails the whole plan, reporting every rule that
/// meal broke.
pub fn validate_meal_plan(value: &Value, meals_per_day: u32) -> Result<Vec<Meal>, GenerationError> {
    let meals = value
        .get("meals")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            GenerationError::Schema("Missing or invalid 'meals' array in response".to_owned())
        })?;

    if meals.len() != meals_per_day as usize {
        return Err(GenerationError::Schema(format!(
            "Expected {} meals, got {}",
            meals_per_day,
            meals.len()
        )));
    }

    meals
        .iter()
        .enumerate()
        .map(|(index, meal)| {
            let violations = meal_violations(meal);
            if !violations.is_empty() {
                tracing::warn!(meal = index + 1, ?violations, "Generated meal failed validation");
                return Err(GenerationError::MealValidation {
                    meal: index + 1,
                    violations,
                });
            }

            Ok(to_meal(meal))
        })
        .collect()
}

pub fn meal_violations(meal: &Value) -> Vec<MealViolation> {
    let mut violations = vec![];

    let has_prefix = meal
        .get("name")
        .and_then(Value::as_str)
        .and_then(MealType::from_name)
        .is_some();

    if !has_prefix {
        violations.push(MealViolation::NamePrefix);
    }

    match meal.get("calories").and_then(Value::as_f64) {
        None => violations.push(MealViolation::CaloriesNotNumeric),
        Some(calories)
            if calories < f64::from(*MEAL_CALORIES.start())
                || calories > f64::from(*MEAL_CALORIES.end()) =>
        {
            violations.push(MealViolation::CaloriesOutOfRange)
        }
        Some(_) => {}
    }

    if list_len(meal, "ingredients") < MIN_INGREDIENTS {
        violations.push(MealViolation::TooFewIngredients);
    }

    if list_len(meal, "instructions") < MIN_INSTRUCTIONS {
        violations.push(MealViolation::TooFewInstructions);
    }

    violations
}

fn list_len(meal: &Value, field: &str) -> usize {
    meal.get(field)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.to_owned(),
        Some(other) => other.to_string(),
    }
}

fn text_list(meal: &Value, field: &str) -> Vec<String> {
    meal.get(field)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|item| text(Some(item))).collect())
        .unwrap_or_default()
}

/// Only called on meals without violations.
fn to_meal(meal: &Value) -> Meal {
    let calories = meal
        .get("calories")
        .and_then(Value::as_f64)
        .map_or(0, |c| c.round() as u32);

    Meal {
        name: text(meal.get("name")),
        description: text(meal.get("description")),
        calories,
        ingredients: text_list(meal, "ingredients"),
        instructions: text_list(meal, "instructions"),
    }
}
