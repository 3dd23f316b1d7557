use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, instrument};

use super::RepositoryError;
use crate::models::{Representative, RepresentativeId};

const REPRESENTATIVE_COLUMNS: &str =
    "id, first_name, last_name, dni, address, phone, email, is_active, created_at, updated_at";

/// Read access to representatives
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepresentativeRepository: Send + Sync {
    /// Find representative by ID
    async fn find_by_id(
        &self,
        id: RepresentativeId,
    ) -> Result<Option<Representative>, RepositoryError>;

    /// Find representative by dni, used by the reuse-or-create lookup
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Representative>, RepositoryError>;

    /// List active representatives, newest first
    async fn list_active(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Representative>, RepositoryError>;

    /// Count active representatives
    async fn count_active(&self) -> Result<i64, RepositoryError>;
}

/// SQLx implementation of RepresentativeRepository
pub struct SqlxRepresentativeRepository {
    pool: PgPool,
}

impl SqlxRepresentativeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RepresentativeRepository for SqlxRepresentativeRepository {
    #[instrument(skip(self), fields(representative_id = %id))]
    async fn find_by_id(
        &self,
        id: RepresentativeId,
    ) -> Result<Option<Representative>, RepositoryError> {
        let representative = sqlx::query_as::<_, Representative>(&format!(
            "SELECT {} FROM representatives WHERE id = $1",
            REPRESENTATIVE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(representative)
    }

    #[instrument(skip(self), fields(dni = %dni))]
    async fn find_by_dni(&self, dni: &str) -> Result<Option<Representative>, RepositoryError> {
        let representative = sqlx::query_as::<_, Representative>(&format!(
            "SELECT {} FROM representatives WHERE dni = $1",
            REPRESENTATIVE_COLUMNS
        ))
        .bind(dni)
        .fetch_optional(&self.pool)
        .await?;

        match &representative {
            Some(r) => info!("Found representative with dni {} (ID: {})", dni, r.id),
            None => info!("No representative with dni {}", dni),
        }

        Ok(representative)
    }

    #[instrument(skip(self))]
    async fn list_active(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Representative>, RepositoryError> {
        let representatives = sqlx::query_as::<_, Representative>(&format!(
            "SELECT {} FROM representatives WHERE is_active = true \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            REPRESENTATIVE_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(representatives)
    }

    #[instrument(skip(self))]
    async fn count_active(&self) -> Result<i64, RepositoryError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM representatives WHERE is_active = true")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }
}
