use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::repository::{
    AthleteRepository, RegistrationGateway, RepresentativeRepository, SqlxAthleteRepository,
    SqlxRegistrationGateway, SqlxRepresentativeRepository,
};
use crate::services::{
    AthleteService, AthleteServiceImpl, JwtTokenVerifier, RegistrationService,
    RegistrationServiceImpl, RepresentativeService, RepresentativeServiceImpl, TokenVerifier,
};

/// Service container for dependency injection.
///
/// Wires repositories into services once at startup; handlers reach
/// services only through the trait objects held here, which is also the
/// seam the router tests use to swap in mocks.
#[derive(Clone)]
pub struct ServiceContainer {
    registration_service: Arc<dyn RegistrationService>,
    athlete_service: Arc<dyn AthleteService>,
    representative_service: Arc<dyn RepresentativeService>,
    token_verifier: Arc<dyn TokenVerifier>,
}

impl ServiceContainer {
    /// Wire the production services over a database pool
    pub fn new(db_pool: PgPool, config: &AppConfig) -> Self {
        let athlete_repository: Arc<dyn AthleteRepository> =
            Arc::new(SqlxAthleteRepository::new(db_pool.clone()));
        let representative_repository: Arc<dyn RepresentativeRepository> =
            Arc::new(SqlxRepresentativeRepository::new(db_pool.clone()));
        let gateway: Arc<dyn RegistrationGateway> =
            Arc::new(SqlxRegistrationGateway::new(db_pool));

        let registration_service = Arc::new(RegistrationServiceImpl::new(
            athlete_repository.clone(),
            representative_repository.clone(),
            gateway,
        ));
        let athlete_service = Arc::new(AthleteServiceImpl::new(athlete_repository));
        let representative_service =
            Arc::new(RepresentativeServiceImpl::new(representative_repository));
        let token_verifier = Arc::new(JwtTokenVerifier::new(&config.auth));

        Self {
            registration_service,
            athlete_service,
            representative_service,
            token_verifier,
        }
    }

    /// Assemble a container from pre-built services, used by tests to
    /// inject mocks
    pub fn from_parts(
        registration_service: Arc<dyn RegistrationService>,
        athlete_service: Arc<dyn AthleteService>,
        representative_service: Arc<dyn RepresentativeService>,
        token_verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            registration_service,
            athlete_service,
            representative_service,
            token_verifier,
        }
    }

    pub fn registration_service(&self) -> Arc<dyn RegistrationService> {
        self.registration_service.clone()
    }

    pub fn athlete_service(&self) -> Arc<dyn AthleteService> {
        self.athlete_service.clone()
    }

    pub fn representative_service(&self) -> Arc<dyn RepresentativeService> {
        self.representative_service.clone()
    }

    pub fn token_verifier(&self) -> Arc<dyn TokenVerifier> {
        self.token_verifier.clone()
    }
}
