use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::models::{
    AuthenticatedUser, MinorAthleteRegistrationRequest, MinorRegistrationData, NewAthlete,
    NewRepresentative,
};
use crate::repository::{
    AthleteRepository, RegistrationGateway, RepositoryError, RepresentativeRepository,
    RepresentativeSource,
};
use crate::utils::time::current_age;
use crate::utils::validation::{MAX_MINOR_AGE, MIN_MINOR_AGE};

/// Registration workflow failures
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Explicit signed parental consent is required to register a minor athlete")]
    MissingParentalAuthorization,

    #[error("Athlete age must be between {MIN_MINOR_AGE} and {MAX_MINOR_AGE} years, got {age}")]
    AgeOutOfRange { age: i32 },

    #[error("An athlete with dni {dni} is already registered")]
    DuplicateAthlete { dni: String },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Minor-athlete registration workflow.
///
/// Business rules are re-verified here even though the HTTP layer already
/// validated the payload shape; the service is the authority on consent,
/// age and duplicate checks regardless of the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn register_minor_athlete(
        &self,
        request: MinorAthleteRegistrationRequest,
        acting_user: AuthenticatedUser,
    ) -> Result<MinorRegistrationData, RegistrationError>;
}

/// Default implementation of RegistrationService
pub struct RegistrationServiceImpl {
    athlete_repository: Arc<dyn AthleteRepository>,
    representative_repository: Arc<dyn RepresentativeRepository>,
    gateway: Arc<dyn RegistrationGateway>,
}

impl RegistrationServiceImpl {
    pub fn new(
        athlete_repository: Arc<dyn AthleteRepository>,
        representative_repository: Arc<dyn RepresentativeRepository>,
        gateway: Arc<dyn RegistrationGateway>,
    ) -> Self {
        Self {
            athlete_repository,
            representative_repository,
            gateway,
        }
    }
}

#[async_trait]
impl RegistrationService for RegistrationServiceImpl {
    #[instrument(
        skip(self, request, acting_user),
        fields(athlete_dni = %request.dni, acting_user = %acting_user.subject)
    )]
    async fn register_minor_athlete(
        &self,
        request: MinorAthleteRegistrationRequest,
        acting_user: AuthenticatedUser,
    ) -> Result<MinorRegistrationData, RegistrationError> {
        if !request.parental_authorization {
            warn!(
                "Registration of dni {} rejected by {}: parental authorization not granted",
                request.dni, acting_user.subject
            );
            return Err(RegistrationError::MissingParentalAuthorization);
        }

        let age = current_age(request.birth_date);
        if age < MIN_MINOR_AGE {
            warn!(
                "Registration of dni {} rejected by {}: age {} below minimum {}",
                request.dni, acting_user.subject, age, MIN_MINOR_AGE
            );
            return Err(RegistrationError::AgeOutOfRange { age });
        }
        if age > MAX_MINOR_AGE {
            warn!(
                "Registration of dni {} rejected by {}: age {} requires the adult flow",
                request.dni, acting_user.subject, age
            );
            return Err(RegistrationError::AgeOutOfRange { age });
        }

        if self.athlete_repository.find_by_dni(&request.dni).await?.is_some() {
            warn!(
                "Registration of dni {} rejected by {}: athlete already registered",
                request.dni, acting_user.subject
            );
            return Err(RegistrationError::DuplicateAthlete {
                dni: request.dni.clone(),
            });
        }

        let representative_source = match self
            .representative_repository
            .find_by_dni(&request.representative.dni)
            .await?
        {
            Some(existing) => {
                info!(
                    "Reusing representative {} (dni {})",
                    existing.id, existing.dni
                );
                RepresentativeSource::Existing(existing)
            }
            None => RepresentativeSource::Create(NewRepresentative::from(
                request.representative.clone(),
            )),
        };

        let new_athlete = NewAthlete::from(&request);
        let registration = self
            .gateway
            .register_minor(new_athlete, representative_source)
            .await
            .map_err(|e| match e {
                RepositoryError::DuplicateDni(dni) => RegistrationError::DuplicateAthlete { dni },
                other => RegistrationError::Repository(other),
            })?;

        info!(
            "User {} registered minor athlete {} (dni {}, age {}) with representative {} (dni {}, reused: {})",
            acting_user.subject,
            registration.athlete.id,
            registration.athlete.dni,
            age,
            registration.representative.id,
            registration.representative.dni,
            registration.representative_reused
        );

        Ok(MinorRegistrationData {
            athlete: registration.athlete,
            representative: registration.representative,
        })
    }
}
