use crate::presentation::dtos::ValidationError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// A JSON request body that carries its own validation rules.
pub trait ValidatedCommand: DeserializeOwned + Validate {}

#[derive(Debug, thiserror::Error)]
pub enum ValidationMiddlewareError {
    #[error("Validation failed: {0}")]
    ValidationFailed(ValidationErrors),
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}

impl From<ValidationMiddlewareError> for ValidationError {
    fn from(error: ValidationMiddlewareError) -> Self {
        match error {
            ValidationMiddlewareError::ValidationFailed(errors) => {
                let mut details: Vec<String> = errors
                    .field_errors()
                    .into_iter()
                    .flat_map(|(field, field_errors)| {
                        field_errors.iter().map(move |error| {
                            let message = error
                                .message
                                .as_ref()
                                .map_or_else(|| error.code.to_string(), |m| m.to_string());
                            format!("{}: {}", field, message)
                        })
                    })
                    .collect();
                // field_errors() is a HashMap; keep the output stable.
                details.sort();

                ValidationError::new("VALIDATION_ERROR", "Request validation failed", details)
            }
            ValidationMiddlewareError::DeserializationFailed(message) => {
                ValidationError::new("DESERIALIZATION_ERROR", &message, vec![])
            }
        }
    }
}

pub fn validate_request<T: ValidatedCommand>(json: &str) -> Result<T, ValidationMiddlewareError> {
    let command: T = serde_json::from_str(json)
        .map_err(|e| ValidationMiddlewareError::DeserializationFailed(e.to_string()))?;

    command
        .validate()
        .map_err(ValidationMiddlewareError::ValidationFailed)?;

    Ok(command)
}

/// Validates `json` and hands the typed command to `handler`.
pub async fn validate_command<T, F, Fut, R, E>(json: &str, handler: F) -> Result<R, ValidationError>
where
    T: ValidatedCommand,
    F: FnOnce(T) -> Fut,
    Fut: std::future::Future<Output = Result<R, E>>,
    E: Into<ValidationError>,
{
    let command = validate_request::<T>(json)?;
    handler(command).await.map_err(Into::into)
}
