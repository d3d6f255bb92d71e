use std::collections::HashMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use nutriplan_mealplan::{GenerationError, GenerationFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid preferences provided")]
    ValidationFailed(HashMap<String, String>),

    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    #[error(transparent)]
    Generation(#[from] GenerationFailure),
}

/// JSON error document returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub details: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleaned_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl ErrorResponse {
    fn from_failure(failure: GenerationFailure) -> Self {
        let GenerationFailure { error, raw_content } = failure;

        let title = match &error {
            GenerationError::Configuration => "Completion service API key is not configured",
            error if error.is_content_error() => "Failed to generate a valid meal plan",
            _ => "Failed to generate meal plan",
        };

        let violations = match &error {
            GenerationError::MealValidation { violations, .. } => {
                Some(violations.iter().map(ToString::to_string).collect())
            }
            _ => None,
        };

        let cleaned_content = match &error {
            GenerationError::UnrecoverableJson { cleaned } => Some(cleaned.to_owned()),
            _ => None,
        };

        Self {
            error: title.to_owned(),
            details: serde_json::Value::String(error.to_string()),
            kind: Some(error.kind().to_owned()),
            violations,
            cleaned_content,
            raw_content,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ValidationFailed(field_errors) => {
                tracing::warn!(errors = ?field_errors, "Preferences validation failed");

                let body = ErrorResponse {
                    error: "ValidationFailed".to_owned(),
                    details: serde_json::json!(field_errors),
                    kind: None,
                    violations: None,
                    cleaned_content: None,
                    raw_content: None,
                };

                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            ApiError::InvalidBody(rejection) => {
                tracing::warn!(error = %rejection, "Rejected meal plan request body");

                let body = ErrorResponse {
                    error: "InvalidRequestBody".to_owned(),
                    details: serde_json::Value::String(rejection.body_text()),
                    kind: None,
                    violations: None,
                    cleaned_content: None,
                    raw_content: None,
                };

                (rejection.status(), Json(body)).into_response()
            }
            ApiError::Generation(failure) => {
                tracing::error!(
                    kind = failure.error.kind(),
                    error = %failure.error,
                    "Meal plan generation failed"
                );

                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::from_failure(failure)),
                )
                    .into_response()
            }
        }
    }
}
