use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{FieldError, ResponseSchema};
use crate::services::{AuthError, RegistrationError, ServiceError};
use crate::utils::validation::{MAX_MINOR_AGE, MIN_MINOR_AGE};

/// Application error type that converts into the response envelope
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Authentication failed: {0}")]
    Authentication(#[from] AuthError),

    #[error("Registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(errors),
            ),
            AppError::Authentication(e) => (
                StatusCode::UNAUTHORIZED,
                e.to_string(),
                None,
            ),
            AppError::Registration(RegistrationError::MissingParentalAuthorization) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(vec![FieldError {
                    field: "parental_authorization".to_string(),
                    message: RegistrationError::MissingParentalAuthorization.to_string(),
                    kind: "parental_authorization".to_string(),
                }]),
            ),
            AppError::Registration(RegistrationError::AgeOutOfRange { age }) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Validation failed".to_string(),
                Some(vec![FieldError {
                    field: "birth_date".to_string(),
                    message: format!(
                        "Athlete age must be between {} and {} years, got {}",
                        MIN_MINOR_AGE, MAX_MINOR_AGE, age
                    ),
                    kind: "age_range".to_string(),
                }]),
            ),
            AppError::Registration(RegistrationError::DuplicateAthlete { dni }) => (
                StatusCode::CONFLICT,
                format!("An athlete with dni {} is already registered", dni),
                None,
            ),
            AppError::Registration(RegistrationError::Repository(e)) => {
                tracing::error!("Repository error during registration: {:?}", e);
                sentry::capture_error(&e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::Service(ServiceError::NotFound) => (
                StatusCode::NOT_FOUND,
                "Resource not found".to_string(),
                None,
            ),
            AppError::Service(ServiceError::Repository(e)) => {
                tracing::error!("Repository error: {:?}", e);
                sentry::capture_error(&e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let envelope = ResponseSchema::<serde_json::Value>::error(message, errors);
        (status, Json(envelope)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepositoryError;

    fn status_of(error: AppError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn validation_errors_map_to_422() {
        let error = AppError::Validation(vec![FieldError {
            field: "dni".to_string(),
            message: "bad".to_string(),
            kind: "regex".to_string(),
        }]);
        assert_eq!(status_of(error), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn authentication_errors_map_to_401() {
        assert_eq!(
            status_of(AppError::Authentication(AuthError::Expired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Authentication(AuthError::MissingToken)),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn duplicate_athlete_maps_to_409() {
        let error = AppError::Registration(RegistrationError::DuplicateAthlete {
            dni: "12345678".to_string(),
        });
        assert_eq!(status_of(error), StatusCode::CONFLICT);
    }

    #[test]
    fn business_rule_rejections_map_to_422() {
        assert_eq!(
            status_of(AppError::Registration(
                RegistrationError::MissingParentalAuthorization
            )),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(AppError::Registration(RegistrationError::AgeOutOfRange {
                age: 19
            })),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn not_found_maps_to_404_and_repository_to_500() {
        assert_eq!(
            status_of(AppError::Service(ServiceError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Service(ServiceError::Repository(
                RepositoryError::Transaction("boom".to_string())
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
