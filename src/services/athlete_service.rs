use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::ServiceError;
use crate::models::{Athlete, AthleteId, PagedData};
use crate::repository::{AthleteRepository, RepositoryError};

/// Largest page a single listing request may ask for
pub const MAX_PAGE_LIMIT: i64 = 100;

pub(crate) fn clamp_page(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(10).clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}

/// Offset for the requested window; saturates so an absurd page number
/// yields an empty page instead of an arithmetic overflow
pub(crate) fn page_offset(page: i64, limit: i64) -> i64 {
    (page - 1).saturating_mul(limit)
}

/// Read and soft-delete operations on athletes
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AthleteService: Send + Sync {
    async fn get_athlete(&self, id: AthleteId) -> Result<Athlete, ServiceError>;

    async fn list_athletes(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PagedData<Athlete>, ServiceError>;

    async fn deactivate_athlete(&self, id: AthleteId) -> Result<(), ServiceError>;
}

/// Default implementation of AthleteService
pub struct AthleteServiceImpl {
    repository: Arc<dyn AthleteRepository>,
}

impl AthleteServiceImpl {
    pub fn new(repository: Arc<dyn AthleteRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AthleteService for AthleteServiceImpl {
    #[instrument(skip(self), fields(athlete_id = %id))]
    async fn get_athlete(&self, id: AthleteId) -> Result<Athlete, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    #[instrument(skip(self))]
    async fn list_athletes(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PagedData<Athlete>, ServiceError> {
        let (page, limit) = clamp_page(page, limit);
        let offset = page_offset(page, limit);

        let items = self.repository.list_active(limit, offset).await?;
        let total = self.repository.count_active().await?;

        Ok(PagedData {
            items,
            page,
            limit,
            total,
        })
    }

    #[instrument(skip(self), fields(athlete_id = %id))]
    async fn deactivate_athlete(&self, id: AthleteId) -> Result<(), ServiceError> {
        match self.repository.soft_delete(id).await {
            Ok(()) => {
                info!("Deactivated athlete {}", id);
                Ok(())
            }
            Err(RepositoryError::NotFound) => Err(ServiceError::NotFound),
            Err(e) => Err(ServiceError::Repository(e)),
        }
    }
}
