use axum::{
    body::Body, extract::Request, http::HeaderValue, middleware::Next, response::Response,
};
use uuid::Uuid;

/// HTTP header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension type for storing request ID in request extensions
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Middleware that attaches a request ID to each request and response
///
/// An incoming `x-request-id` header is reused when it parses as a UUID;
/// otherwise a fresh UUID v4 is generated. The ID lands in the request
/// extensions for handlers and in the response headers for the caller.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .map(RequestId)
        .unwrap_or_else(|| RequestId(Uuid::new_v4()));

    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER, header_value);
    }

    response
}

/// Creates a tracing span for an HTTP request, tagged with its request ID
pub fn make_span_with_request_id(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .extensions()
        .get::<RequestId>()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string());

    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}
