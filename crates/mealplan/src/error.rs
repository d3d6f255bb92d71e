use nutriplan_llm::LlmError;
use strum::Display;
use thiserror::Error;

/// A single rule a generated meal broke.
#[derive(Display, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MealViolation {
    #[strum(to_string = "Meal name must start with 'Breakfast:', 'Lunch:', or 'Dinner:'")]
    NamePrefix,
    #[strum(to_string = "Calories must be a number")]
    CaloriesNotNumeric,
    #[strum(to_string = "Calories must be between 200 and 1000")]
    CaloriesOutOfRange,
    #[strum(to_string = "Must include at least 3 ingredients")]
    TooFewIngredients,
    #[strum(to_string = "Must include at least 2 instructions")]
    TooFewInstructions,
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Completion service credential is not configured")]
    Configuration,

    #[error("Completion service error ({status}): {message}")]
    Upstream { status: String, message: String },

    #[error("No JSON object found in model response")]
    MalformedResponse,

    #[error("Unable to parse JSON content")]
    UnrecoverableJson { cleaned: String },

    #[error("{0}")]
    Schema(String),

    #[error("Invalid meal {meal}: {}", join_violations(.violations))]
    MealValidation {
        meal: usize,
        violations: Vec<MealViolation>,
    },
}

fn join_violations(violations: &[MealViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl GenerationError {
    /// Stable identifier of the failing stage, used in error documents.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Configuration => "ConfigurationError",
            GenerationError::Upstream { .. } => "UpstreamError",
            GenerationError::MalformedResponse => "MalformedResponseError",
            GenerationError::UnrecoverableJson { .. } => "UnrecoverableJSONError",
            GenerationError::Schema(_) => "SchemaError",
            GenerationError::MealValidation { .. } => "MealValidationError",
        }
    }

    /// Whether the failure happened after the model answered, i.e. the model
    /// content itself was unusable.
    pub fn is_content_error(&self) -> bool {
        !matches!(
            self,
            GenerationError::Configuration | GenerationError::Upstream { .. }
        )
    }
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration => GenerationError::Configuration,
            LlmError::Upstream { status, message } => GenerationError::Upstream { status, message },
        }
    }
}

/// A failed generation, with the raw model output when one was received.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct GenerationFailure {
    #[source]
    pub error: GenerationError,
    pub raw_content: Option<String>,
}

impl GenerationFailure {
    pub fn with_raw(error: GenerationError, raw_content: impl Into<String>) -> Self {
        Self {
            error,
            raw_content: Some(raw_content.into()),
        }
    }
}

impl From<GenerationError> for GenerationFailure {
    fn from(error: GenerationError) -> Self {
        Self {
            error,
            raw_content: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_validation_message_lists_every_violation() {
        let error = GenerationError::MealValidation {
            meal: 2,
            violations: vec![
                MealViolation::NamePrefix,
                MealViolation::TooFewInstructions,
            ],
        };

        assert_eq!(
            error.to_string(),
            "Invalid meal 2: Meal name must start with 'Breakfast:', 'Lunch:', or 'Dinner:', Must include at least 2 instructions"
        );
        assert_eq!(error.kind(), "MealValidationError");
    }

    #[test]
    fn test_llm_errors_map_onto_taxonomy() {
        let error: GenerationError = LlmError::Configuration.into();
        assert!(matches!(error, GenerationError::Configuration));
        assert!(!error.is_content_error());

        let error: GenerationError = LlmError::upstream("502 Bad Gateway", "down").into();
        assert_eq!(error.kind(), "UpstreamError");
        assert!(error.to_string().contains("502 Bad Gateway"));
    }
}
