use axum::{
    Router,
    routing::{get, post},
};
use nutriplan_mealplan::MealPlanGenerator;

mod health;
mod meal_plan;

pub use health::health;
pub use meal_plan::generate_meal_plan;

#[derive(Clone)]
pub struct AppState {
    pub generator: MealPlanGenerator,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        // Health check endpoint (no state required)
        .route("/health", get(health))
        .route("/api/meal-plan", post(generate_meal_plan))
        .with_state(app_state)
}
