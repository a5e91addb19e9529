//! Session token plumbing for the admin surface.
//!
//! The authorization model is presence/absence of the `auth_token` cookie,
//! nothing more: login checks the configured password and sets an opaque
//! token, logout expires it, and guarded routes only test that a non-empty
//! token is present.

use super::ApiState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

const AUTH_COOKIE: &str = "auth_token";

/// True when the request carries a non-empty `auth_token` cookie
pub fn has_auth_cookie(headers: &HeaderMap) -> bool {
    let Some(cookies) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    cookies.split(';').any(|cookie| {
        cookie
            .trim()
            .strip_prefix(AUTH_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
            .is_some_and(|value| !value.is_empty())
    })
}

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    password: String,
}

/// POST /api/login - sets the session cookie when the password matches
pub(super) async fn login_handler(
    State(state): State<ApiState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if req.password != state.admin_password {
        return (
            StatusCode::UNAUTHORIZED,
            HeaderMap::new(),
            Json(json!({ "error": "Invalid password" })),
        );
    }

    // Opaque token; only its presence matters
    let token = Utc::now().timestamp_millis().to_string();
    let cookie = format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly");
    let mut headers = HeaderMap::new();
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    info!(target: "api", "Admin session opened");
    (StatusCode::OK, headers, Json(json!({ "ok": true })))
}

/// POST /api/logout - expires the session cookie
pub(super) async fn logout_handler() -> impl IntoResponse {
    let cookie = format!("{AUTH_COOKIE}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:01 GMT");
    let mut headers = HeaderMap::new();
    if let Ok(value) = header::HeaderValue::from_str(&cookie) {
        headers.insert(header::SET_COOKIE, value);
    }
    info!(target: "api", "Admin session closed");
    (StatusCode::OK, headers, Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, header::HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_cookie_header_is_unauthorized() {
        assert!(!has_auth_cookie(&HeaderMap::new()));
    }

    #[test]
    fn test_present_token_is_authorized() {
        assert!(has_auth_cookie(&headers_with_cookie("auth_token=abc123")));
        assert!(has_auth_cookie(&headers_with_cookie(
            "theme=dark; auth_token=abc123; lang=en"
        )));
    }

    #[test]
    fn test_empty_or_other_cookies_are_unauthorized() {
        assert!(!has_auth_cookie(&headers_with_cookie("auth_token=")));
        assert!(!has_auth_cookie(&headers_with_cookie("theme=dark; lang=en")));
    }
}
