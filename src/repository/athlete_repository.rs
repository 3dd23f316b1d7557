use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::RepositoryError;
use crate::models::{Athlete, AthleteId};

const ATHLETE_COLUMNS: &str = "id, first_name, last_name, dni, birth_date, sex, type_athlete, \
     representative_id, parental_authorization, is_active, created_at, updated_at";

/// Read and soft-delete access to athletes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AthleteRepository: Send + Sync {
    /// Find athlete by ID
    async fn find_by_id(&self, id: AthleteId) -> Result<Option<Athlete>, RepositoryError>;

    /// Find athlete by dni, the natural unique key
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Athlete>, RepositoryError>;

    /// List active athletes, newest first
    async fn list_active(&self, limit: i64, offset: i64) -> Result<Vec<Athlete>, RepositoryError>;

    /// Count active athletes
    async fn count_active(&self) -> Result<i64, RepositoryError>;

    /// Soft delete: flip is_active, never remove the row
    async fn soft_delete(&self, id: AthleteId) -> Result<(), RepositoryError>;
}

/// SQLx implementation of AthleteRepository
pub struct SqlxAthleteRepository {
    pool: PgPool,
}

impl SqlxAthleteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AthleteRepository for SqlxAthleteRepository {
    #[instrument(skip(self), fields(athlete_id = %id))]
    async fn find_by_id(&self, id: AthleteId) -> Result<Option<Athlete>, RepositoryError> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {} FROM athletes WHERE id = $1",
            ATHLETE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(athlete)
    }

    #[instrument(skip(self), fields(dni = %dni))]
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Athlete>, RepositoryError> {
        let athlete = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {} FROM athletes WHERE dni = $1",
            ATHLETE_COLUMNS
        ))
        .bind(dni)
        .fetch_optional(&self.pool)
        .await?;

        match &athlete {
            Some(a) => info!("Found athlete with dni {} (ID: {})", dni, a.id),
            None => info!("No athlete with dni {}", dni),
        }

        Ok(athlete)
    }

    #[instrument(skip(self))]
    async fn list_active(&self, limit: i64, offset: i64) -> Result<Vec<Athlete>, RepositoryError> {
        let athletes = sqlx::query_as::<_, Athlete>(&format!(
            "SELECT {} FROM athletes WHERE is_active = true \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            ATHLETE_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        info!("Retrieved {} active athletes (limit: {}, offset: {})", athletes.len(), limit, offset);
        Ok(athletes)
    }

    #[instrument(skip(self))]
    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM athletes WHERE is_active = true")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    #[instrument(skip(self), fields(athlete_id = %id))]
    async fn soft_delete(&self, id: AthleteId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE athletes SET is_active = false, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!("Soft deleted athlete {}", id);
        Ok(())
    }
}
