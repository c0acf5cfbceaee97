//! Admin session gate.
//!
//! A successful password check opens a session whose token must accompany
//! every admin request. Leaving the admin panel closes the session, so each
//! entry into the panel asks for the password again.

mod knock;

pub use knock::*;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;

use crate::errors::{codes, ErrorDetails, ErrorResponse};

/// Header name for the admin session token.
pub const SESSION_HEADER: &str = "x-admin-session";

/// Open admin sessions, keyed by token.
pub struct AdminSessions {
    ttl: Duration,
    sessions: Mutex<HashMap<String, Instant>>,
}

impl AdminSessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a session and return its token.
    pub async fn open(&self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Instant::now();

        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, last_seen| now.duration_since(*last_seen) < self.ttl);
        sessions.insert(token.clone(), now);
        tracing::debug!(open_sessions = sessions.len(), "Admin session opened");

        token
    }

    /// Check a token, refreshing its idle timer when it is still live.
    pub async fn validate(&self, token: &str) -> bool {
        let now = Instant::now();
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(token) {
            Some(last_seen) if now.duration_since(*last_seen) < self.ttl => {
                *last_seen = now;
                true
            }
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    /// End a session. Returns whether it existed.
    pub async fn close(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }
}

/// Pull the session token from `x-admin-session` or a bearer Authorization header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let direct = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    direct.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    })
}

/// Middleware that rejects admin requests without a live session.
pub async fn admin_session_layer(
    sessions: Arc<AdminSessions>,
    request: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return unauthorized_response("Admin session required");
    };

    if sessions.validate(&token).await {
        next.run(request).await
    } else {
        unauthorized_response("Admin session expired or invalid")
    }
}

/// Perform constant-time string comparison.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
        revision_id: 0,
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("farm-1234", "farm-1234"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("farm-1234", "farm-1235"));
    }

    #[test]
    fn test_constant_time_compare_different_lengths() {
        assert!(!constant_time_compare("1234", "12345"));
    }

    #[test]
    fn test_constant_time_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "1234"));
    }

    #[test]
    fn test_session_token_sources() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_token(&headers), None);

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer abc"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));

        headers.insert(SESSION_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let sessions = AdminSessions::new(Duration::from_secs(60));
        let token = sessions.open().await;

        assert!(sessions.validate(&token).await);
        assert!(!sessions.validate("not-a-token").await);

        assert!(sessions.close(&token).await);
        assert!(!sessions.validate(&token).await);
        assert!(!sessions.close(&token).await);
    }

    #[tokio::test]
    async fn test_each_open_issues_a_fresh_token() {
        let sessions = AdminSessions::new(Duration::from_secs(60));
        let first = sessions.open().await;
        let second = sessions.open().await;
        assert_ne!(first, second);
        assert!(sessions.validate(&first).await);
        assert!(sessions.validate(&second).await);
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let sessions = AdminSessions::new(Duration::from_millis(20));
        let token = sessions.open().await;

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!sessions.validate(&token).await);
    }
}
