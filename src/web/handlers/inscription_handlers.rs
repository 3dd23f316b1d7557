use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::models::{AuthenticatedUser, MinorAthleteRegistrationRequest, MinorRegistrationData, ResponseSchema};
use crate::utils::validation::collect_field_errors;
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// POST /api/v1/inscription/escuela-futbol/deportista-menor
///
/// Every field-rule violation in the payload is collected and returned in
/// one response; business rules are then re-verified by the service.
pub async fn register_minor_athlete(
    State(state): State<AppState>,
    current_user: AuthenticatedUser,
    Json(payload): Json<MinorAthleteRegistrationRequest>,
) -> Result<(StatusCode, Json<ResponseSchema<MinorRegistrationData>>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(collect_field_errors(&e)))?;

    let data = state
        .registration_service()
        .register_minor_athlete(payload, current_user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ResponseSchema::success(
            "Minor athlete registered successfully",
            data,
        )),
    ))
}
