pub mod athlete_service;
pub mod container;
pub mod registration_service;
pub mod representative_service;
pub mod token_verifier;

pub use athlete_service::*;
pub use container::*;
pub use registration_service::*;
pub use representative_service::*;
pub use token_verifier::*;

use crate::repository::RepositoryError;

/// Service error types shared by the read/soft-delete services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Record not found")]
    NotFound,
}
