use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::services::AuthError;
use crate::web::responses::AppError;
use crate::web::router::AppState;

/// Authentication middleware.
/// Requires a valid Bearer token in the Authorization header; on success
/// the verified identity is stored in request extensions for handlers.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let correlation_id = request
        .extensions()
        .get::<String>()
        .cloned()
        .unwrap_or_else(|| "unknown".to_string());

    let token = match extract_bearer_token(request.headers()) {
        Some(token) => token,
        None => {
            tracing::warn!(
                "Missing or invalid authorization header [correlation_id: {}]",
                correlation_id
            );
            return Err(AppError::Authentication(AuthError::MissingToken));
        }
    };

    let current_user = app_state
        .token_verifier()
        .verify(token)
        .map_err(|e| {
            tracing::warn!("Token rejected: {} [correlation_id: {}]", e, correlation_id);
            AppError::Authentication(e)
        })?;

    tracing::debug!(
        "Authentication successful for subject {} [correlation_id: {}]",
        current_user.subject,
        correlation_id
    );

    request.extensions_mut().insert(current_user);

    Ok(next.run(request).await)
}

/// Extract Bearer token from Authorization header
fn extract_bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn rejects_missing_header() {
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert_eq!(extract_bearer_token(&headers), None);
    }

    #[test]
    fn rejects_empty_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer_token(&headers), None);
    }
}
