use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

/// Middleware to generate and propagate correlation IDs
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = get_or_generate_correlation_id(request.headers());

    request.extensions_mut().insert(correlation_id.clone());

    let span = tracing::Span::current();
    span.record("correlation_id", correlation_id.as_str());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value.clone());
        response.headers_mut().insert("x-request-id", header_value);
    }

    response
}

/// Get existing correlation ID from headers or generate a new one
fn get_or_generate_correlation_id(headers: &axum::http::HeaderMap) -> String {
    let correlation_id = headers
        .get("x-correlation-id")
        .or_else(|| headers.get("x-request-id"))
        .and_then(|header| header.to_str().ok())
        .filter(|id| !id.is_empty() && Uuid::parse_str(id).is_ok());

    match correlation_id {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    #[test]
    fn keeps_a_valid_incoming_correlation_id() {
        let id = Uuid::new_v4().to_string();
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", HeaderValue::from_str(&id).unwrap());
        assert_eq!(get_or_generate_correlation_id(&headers), id);
    }

    #[test]
    fn replaces_a_malformed_correlation_id() {
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", HeaderValue::from_static("not-a-uuid"));
        let generated = get_or_generate_correlation_id(&headers);
        assert!(Uuid::parse_str(&generated).is_ok());
    }
}
