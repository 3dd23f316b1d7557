use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::common::{AthleteId, RepresentativeId};
use super::representative::{Representative, RepresentativeInput};
use crate::utils::validation::{
    validate_minor_age, validate_parental_authorization, validate_sex, DNI_PATTERN, NAME_PATTERN,
};

/// Athlete type tag stored for registrations through the minor flow
pub const TYPE_ATHLETE_MINOR: &str = "MINOR";

/// Stored value of a confirmed parental authorization
pub const PARENTAL_AUTHORIZATION_GRANTED: &str = "SI";

/// Athlete domain model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Athlete {
    pub id: AthleteId,
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub type_athlete: String,
    pub representative_id: Option<RepresentativeId>,
    pub parental_authorization: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration payload for a minor athlete.
///
/// Field rules are applied independently and every violation is reported,
/// so the caller can fix all of them in one round-trip.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MinorAthleteRegistrationRequest {
    #[validate(
        length(min = 2, max = 100, message = "First name must be between 2 and 100 characters"),
        regex(path = *NAME_PATTERN, message = "First name may only contain letters and spaces")
    )]
    pub first_name: String,

    #[validate(
        length(min = 2, max = 100, message = "Last name must be between 2 and 100 characters"),
        regex(path = *NAME_PATTERN, message = "Last name may only contain letters and spaces")
    )]
    pub last_name: String,

    #[validate(
        length(min = 8, max = 20, message = "DNI must be between 8 and 20 characters"),
        regex(path = *DNI_PATTERN, message = "DNI may only contain letters, digits and hyphens")
    )]
    pub dni: String,

    #[validate(custom(
        function = validate_minor_age,
        message = "Athlete age must be between 5 and 17 years at registration time"
    ))]
    pub birth_date: NaiveDate,

    #[validate(custom(function = validate_sex, message = "Sex must be exactly 'M' or 'F'"))]
    pub sex: String,

    /// Absent and `false` are both rejected with guidance to obtain
    /// signed consent
    #[serde(default)]
    #[validate(custom(
        function = validate_parental_authorization,
        message = "Explicit signed parental consent is required to register a minor athlete"
    ))]
    pub parental_authorization: bool,

    #[validate(nested)]
    pub representative: RepresentativeInput,
}

/// Athlete for database insertion. The representative reference is
/// resolved inside the registration transaction.
#[derive(Debug, Clone)]
pub struct NewAthlete {
    pub first_name: String,
    pub last_name: String,
    pub dni: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub type_athlete: String,
    pub parental_authorization: String,
}

impl From<&MinorAthleteRegistrationRequest> for NewAthlete {
    fn from(request: &MinorAthleteRegistrationRequest) -> Self {
        Self {
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            dni: request.dni.clone(),
            birth_date: request.birth_date,
            sex: request.sex.clone(),
            type_athlete: TYPE_ATHLETE_MINOR.to_string(),
            parental_authorization: PARENTAL_AUTHORIZATION_GRANTED.to_string(),
        }
    }
}

/// Created athlete plus its resolved representative
#[derive(Debug, Serialize, Deserialize)]
pub struct MinorRegistrationData {
    pub athlete: Athlete,
    pub representative: Representative,
}
