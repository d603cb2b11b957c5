use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;

use skillgate_auth::JwtValidator;

use crate::app::errors::json_error;
use crate::context::{RequestId, organisation_context};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Authenticate the bearer token and attach the request [`Principal`].
///
/// [`Principal`]: skillgate_auth::Principal
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer(req.headers()).ok_or_else(|| {
        json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token")
    })?;

    let claims = state.jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        json_error(StatusCode::UNAUTHORIZED, "invalid_token", e.to_string())
    })?;

    let principal = claims
        .to_principal()
        .with_organisation_context(organisation_context(req.uri(), req.headers()));

    tracing::Span::current().record("user_id", principal.user_id.get());
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Wrap every request in a span carrying a fresh request id.
pub async fn request_span(mut req: axum::http::Request<axum::body::Body>, next: Next) -> Response {
    let request_id = RequestId::new();
    let span = tracing::info_span!(
        "request",
        request_id = %request_id.as_uuid(),
        method = %req.method(),
        path = %req.uri().path(),
        user_id = tracing::field::Empty,
    );
    req.extensions_mut().insert(request_id);

    let mut response = next.run(req).instrument(span.clone()).await;
    span.in_scope(|| tracing::info!(status = response.status().as_u16(), "request completed"));

    if let Ok(value) = HeaderValue::from_str(&request_id.as_uuid().to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(axum::http::header::AUTHORIZATION)?;
    let token = header.to_str().ok()?.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_auth(value: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        h
    }

    #[test]
    fn extracts_bearer_tokens_only() {
        assert_eq!(extract_bearer(&with_auth("Bearer abc.def")), Some("abc.def"));
        assert_eq!(extract_bearer(&with_auth("Basic abc")), None);
        assert_eq!(extract_bearer(&with_auth("Bearer   ")), None);
        assert_eq!(extract_bearer(&HeaderMap::new()), None);
    }
}
