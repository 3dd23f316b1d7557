use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use super::athlete_service::{clamp_page, page_offset};
use super::ServiceError;
use crate::models::{PagedData, Representative, RepresentativeId};
use crate::repository::RepresentativeRepository;

/// Read operations on representatives
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepresentativeService: Send + Sync {
    async fn get_representative(
        &self,
        id: RepresentativeId,
    ) -> Result<Representative, ServiceError>;

    async fn list_representatives(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PagedData<Representative>, ServiceError>;
}

/// Default implementation of RepresentativeService
pub struct RepresentativeServiceImpl {
    repository: Arc<dyn RepresentativeRepository>,
}

impl RepresentativeServiceImpl {
    pub fn new(repository: Arc<dyn RepresentativeRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RepresentativeService for RepresentativeServiceImpl {
    #[instrument(skip(self), fields(representative_id = %id))]
    async fn get_representative(
        &self,
        id: RepresentativeId,
    ) -> Result<Representative, ServiceError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    #[instrument(skip(self))]
    async fn list_representatives(
        &self,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> Result<PagedData<Representative>, ServiceError> {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockRepresentativeRepository;
    use chrono::Utc;
    use uuid::Uuid;

    fn representative(id: RepresentativeId) -> Representative {
        Representative {
            id,
            first_name: "María".to_string(),
            last_name: "Pérez".to_string(),
            dni: "87654321".to_string(),
            address: "Av. Universitaria 123".to_string(),
            phone: "0991234567".to_string(),
            email: "maria.perez@example.com".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn get_returns_the_stored_representative() {
        let id = Uuid::new_v4();
        let mut repository = MockRepresentativeRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |id| Ok(Some(representative(id))));

        let service = RepresentativeServiceImpl::new(Arc::new(repository));
        let found = service.get_representative(id).await.unwrap();

        assert_eq!(found.id, id);
    }

    #[tokio::test]
    async fn get_returns_not_found_for_missing_id() {
        let mut repository = MockRepresentativeRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));

        let service = RepresentativeServiceImpl::new(Arc::new(repository));
        let result = service.get_representative(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn list_paginates_with_the_requested_window() {
        let mut repository = MockRepresentativeRepository::new();
        repository
            .expect_list_active()
            .withf(|limit, offset| *limit == 20 && *offset == 40)
            .returning(|_, _| Ok(vec![]));
        repository.expect_count_active().returning(|| Ok(57));

        let service = RepresentativeServiceImpl::new(Arc::new(repository));
        let paged = service
            .list_representatives(Some(3), Some(20))
            .await
            .unwrap();

        assert_eq!(paged.page, 3);
        assert_eq!(paged.total, 57);
    }
}
