use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Meal, MealPlan};

/// Finalizes validated meals into a plan.
///
/// The total is always recomputed and the date always set to the request
/// date; whatever the model reported for either is ignored.
pub fn assemble_meal_plan(meals: Vec<Meal>, date: NaiveDate) -> MealPlan {
    let total_calories = meals.iter().map(|meal| meal.calories).sum();

    MealPlan {
        id: Uuid::new_v4(),
        date,
        meals,
        total_calories,
    }
}
