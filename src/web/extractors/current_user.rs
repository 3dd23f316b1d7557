use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
};

use crate::models::AuthenticatedUser;
use crate::services::AuthError;
use crate::web::responses::AppError;

/// Extractor for the authenticated user placed in request extensions by
/// the auth middleware
#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Authentication(AuthError::MissingToken))
    }
}
