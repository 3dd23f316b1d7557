pub mod athlete_repository;
pub mod registration_gateway;
pub mod representative_repository;

pub use athlete_repository::*;
pub use registration_gateway::*;
pub use representative_repository::*;

/// Repository error types shared by the persistence gateway
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Record not found")]
    NotFound,

    #[error("Duplicate dni: {0}")]
    DuplicateDni(String),

    #[error("Transaction error: {0}")]
    Transaction(String),
}
