/// Meal plan generation API
///
/// JSON endpoint that turns dietary preferences into a validated meal plan
/// using the configured completion service.
use std::collections::HashMap;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use nutriplan_mealplan::{MealPlan, Preferences};
use validator::Validate;

use crate::error::ApiError;
use crate::routes::AppState;

/// POST /api/meal-plan route handler
///
/// # Returns
/// - 200 OK: the generated meal plan
/// - 400 Bad Request: ValidationFailed with camelCase field-level messages
/// - 4xx: InvalidRequestBody when the body is not a Preferences document
/// - 500 Internal Server Error: generation or validation of the plan failed
#[tracing::instrument(skip_all)]
pub async fn generate_meal_plan(
    State(state): State<AppState>,
    payload: Result<Json<Preferences>, JsonRejection>,
) -> Result<Json<MealPlan>, ApiError> {
    let Json(preferences) = payload?;

    tracing::info!(
        calorie_goal = preferences.calorie_goal,
        "Meal plan generation requested"
    );

    if let Err(validation_errors) = preferences.validate() {
        let field_errors: HashMap<String, String> = validation_errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let error_message = errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string());
                (camel_case(field), error_message)
            })
            .collect();

        return Err(ApiError::ValidationFailed(field_errors));
    }

    let today = Utc::now().date_naive();
    let plan = state.generator.generate(&preferences, today).await?;

    Ok(Json(plan))
}

/// Maps a Rust field name to its wire name, e.g. `calorie_goal` -> `calorieGoal`.
fn camel_case(field: &str) -> String {
    let mut parts = field.split('_');
    let mut name = parts.next().unwrap_or_default().to_owned();

    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }

    name
}
