use std::sync::Arc;

use chrono::NaiveDate;
use nutriplan_llm::{ChatMessage, ChatRequest, CompletionClient};

use crate::{
    GenerationError, GenerationFailure, MealPlan, Preferences, assemble_meal_plan, build_prompt,
    normalize_response, parse_lenient, validate_meal_plan,
};

pub const DEFAULT_MODEL: &str = "microsoft/phi-3-medium-128k-instruct:free";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

#[derive(Clone, Debug, PartialEq)]
pub struct GenerationSettings {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Turns preferences into a validated meal plan via a completion service.
///
/// Stateless apart from the shared client: concurrent calls are independent.
#[derive(Clone)]
pub struct MealPlanGenerator {
    client: Arc<dyn CompletionClient>,
    settings: GenerationSettings,
}

impl MealPlanGenerator {
    pub fn new(client: Arc<dyn CompletionClient>, settings: GenerationSettings) -> Self {
        Self { client, settings }
    }

    #[tracing::instrument(skip_all, fields(meals_per_day = preferences.meals_per_day(), today = %today))]
    pub async fn generate(
        &self,
        preferences: &Preferences,
        today: NaiveDate,
    ) -> Result<MealPlan, GenerationFailure> {
        let prompt = build_prompt(preferences, today);

        let request = ChatRequest {
            model: self.settings.model.to_owned(),
            messages: vec![
                ChatMessage::system(prompt.system),
                ChatMessage::user(prompt.user),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let content = self
            .client
            .complete(&request)
            .await
            .map_err(GenerationError::from)?;

        tracing::debug!(length = content.len(), "Model responded, validating");

        match process_response(&content, preferences.meals_per_day(), today) {
            Ok(plan) => {
                tracing::info!(
                    plan_id = %plan.id,
                    total_calories = plan.total_calories,
                    "Meal plan generated"
                );
                Ok(plan)
            }
            Err(error) => {
                tracing::error!(error = %error, raw_content = %content, "Error parsing meal plan");
                Err(GenerationFailure::with_raw(error, content))
            }
        }
    }
}

/// Normalizes, parses, validates and assembles a raw model answer.
pub fn process_response(
    content: &str,
    meals_per_day: u32,
    today: NaiveDate,
) -> Result<MealPlan, GenerationError> {
    let normalized = normalize_response(content)?;
    let value = parse_lenient(normalized)?;
    let meals = validate_meal_plan(&value, meals_per_day)?;

    Ok(assemble_meal_plan(meals, today))
}
