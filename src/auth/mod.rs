//! Authentication boundary.
//!
//! Sign-in happens at the identity provider in front of this service. Requests
//! arrive with the principal's username in [`PRINCIPAL_HEADER`] and, when a
//! pre-shared key is configured, the key in [`API_KEY_HEADER`] or as a bearer
//! token. The key is compared in constant time to mitigate timing attacks.

mod rules;

pub use rules::*;

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::errors::{codes, AppError, ErrorResponse};

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header carrying the authenticated username, set by the identity provider.
pub const PRINCIPAL_HEADER: &str = "x-auth-username";

/// The caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Guest,
    User(String),
}

impl Principal {
    pub fn username(&self) -> Option<&str> {
        match self {
            Principal::Guest => None,
            Principal::User(name) => Some(name),
        }
    }

    fn from_parts(parts: &Parts) -> Self {
        parts
            .headers
            .get(PRINCIPAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| Principal::User(name.to_string()))
            .unwrap_or(Principal::Guest)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Principal::from_parts(parts))
    }
}

/// A signed-in principal. Rejects guests with `401`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Principal::from_parts(parts) {
            Principal::User(name) => Ok(CurrentUser(name)),
            Principal::Guest => Err(AppError::Unauthorized("Sign in required".to_string())),
        }
    }
}

/// PSK authentication layer function that takes the expected PSK as a parameter.
pub async fn psk_auth_layer(
    expected_psk: Option<String>,
    request: Request,
    next: Next,
) -> Response {
    // No PSK configured: dev mode
    let Some(expected) = expected_psk else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match provided {
        Some(provided_key) => {
            if constant_time_compare(&provided_key, &expected) {
                next.run(request).await
            } else {
                unauthorized_response("Invalid API key")
            }
        }
        None => {
            let bearer = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string());

            match bearer {
                Some(bearer_key) if constant_time_compare(&bearer_key, &expected) => {
                    next.run(request).await
                }
                _ => unauthorized_response("Missing or invalid API key"),
            }
        }
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse::single(codes::UNAUTHORIZED, message, None);
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;

    fn guarded_router(psk: Option<String>) -> Router {
        Router::new()
            .route(
                "/who",
                get(|principal: Principal| async move {
                    principal.username().unwrap_or("guest").to_string()
                }),
            )
            .layer(middleware::from_fn(move |req, next| {
                psk_auth_layer(psk.clone(), req, next)
            }))
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[tokio::test]
    async fn test_bearer_token_accepted() {
        let app = guarded_router(Some("secret".to_string()));
        let request = axum::http::Request::builder()
            .uri("/who")
            .header(header::AUTHORIZATION, "Bearer secret")
            .header(PRINCIPAL_HEADER, "  alice ")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"alice");
    }

    #[tokio::test]
    async fn test_wrong_key_rejected() {
        let app = guarded_router(Some("secret".to_string()));
        let request = axum::http::Request::builder()
            .uri("/who")
            .header(API_KEY_HEADER, "nope")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_blank_principal_is_guest() {
        let app = guarded_router(None);
        let request = axum::http::Request::builder()
            .uri("/who")
            .header(PRINCIPAL_HEADER, "   ")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"guest");
    }
}
