//! Shared-secret gate for mutating routes

use axum::{
    Extension,
    body::Body,
    extract::Request,
    http::{HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Header carrying the shared secret
pub const API_KEY_HEADER: &str = "x-api-key";

/// API Key authentication state
#[derive(Clone)]
pub struct ApiKeyAuth {
    api_key: Option<String>,
}

impl ApiKeyAuth {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check the request headers against the configured key
    pub fn check(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let Some(ref expected) = self.api_key else {
            return Ok(());
        };

        let provided = headers
            .get(API_KEY_HEADER)
            .ok_or_else(|| AppError::Unauthorized("API key missing".to_string()))?;

        if bool::from(provided.as_bytes().ct_eq(expected.as_bytes())) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Invalid API key".to_string()))
        }
    }
}

pub(crate) fn is_mutating(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Require a valid API key on every non-read request
pub async fn auth_middleware(
    Extension(auth): Extension<ApiKeyAuth>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_mutating(request.method()) {
        if let Err(e) = auth.check(request.headers()) {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected unauthenticated mutation"
            );
            return e.into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(key: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = key {
            headers.insert(API_KEY_HEADER, HeaderValue::from_static(key));
        }
        headers
    }

    #[test]
    fn missing_key_is_unauthorized() {
        let auth = ApiKeyAuth::new(Some("s3cret".into()));
        assert!(matches!(
            auth.check(&headers(None)),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn wrong_key_is_forbidden() {
        let auth = ApiKeyAuth::new(Some("s3cret".into()));
        assert!(matches!(
            auth.check(&headers(Some("s3cre"))),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            auth.check(&headers(Some("s3cret-and-more"))),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn matching_key_passes() {
        let auth = ApiKeyAuth::new(Some("s3cret".into()));
        assert!(auth.check(&headers(Some("s3cret"))).is_ok());
    }

    #[test]
    fn disabled_gate_passes_everything() {
        let auth = ApiKeyAuth::new(None);
        assert!(!auth.is_enabled());
        assert!(auth.check(&headers(None)).is_ok());
    }

    #[test]
    fn reads_are_not_gated() {
        assert!(!is_mutating(&Method::GET));
        assert!(!is_mutating(&Method::HEAD));
        assert!(is_mutating(&Method::POST));
        assert!(is_mutating(&Method::PATCH));
        assert!(is_mutating(&Method::DELETE));
    }
}
