//! Route Guard for the admin subtree.

use axum::extract::Request;
use axum::http::header::COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use cookie::Cookie;

use super::gate::{SESSION_COOKIE, SESSION_VALUE};

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PATH: &str = "/admin";
const ADMIN_API_PREFIX: &str = "/api/admin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
    /// Protected API call without a valid marker.
    Unauthorized,
}

fn in_subtree(path: &str, root: &str) -> bool {
    path.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

pub fn is_protected(path: &str) -> bool {
    in_subtree(path, ADMIN_PATH) || in_subtree(path, ADMIN_API_PREFIX)
}

/// Decide a request from its path and the raw value of its session marker, if any.
///
/// Absent, malformed and expired markers all look the same here: an expired cookie is
/// never sent by the browser.
pub fn guard(path: &str, marker: Option<&str>) -> GuardDecision {
    if !is_protected(path) || marker == Some(SESSION_VALUE) {
        return GuardDecision::Allow;
    }
    if in_subtree(path, ADMIN_API_PREFIX) {
        GuardDecision::Unauthorized
    } else {
        GuardDecision::Redirect(LOGIN_PATH)
    }
}

/// Value of the session marker in the request's `Cookie` headers.
pub fn session_marker(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

pub fn has_valid_marker(headers: &HeaderMap) -> bool {
    session_marker(headers).as_deref() == Some(SESSION_VALUE)
}

/// axum middleware applying [`guard`] to every request. A signed-in operator opening
/// the login page is sent straight to the dashboard.
pub async fn require_admin(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let marker = session_marker(request.headers());

    if path == LOGIN_PATH && marker.as_deref() == Some(SESSION_VALUE) {
        return Redirect::to(ADMIN_PATH).into_response();
    }

    match guard(&path, marker.as_deref()) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            tracing::debug!(%path, "redirecting unauthenticated request");
            Redirect::to(to).into_response()
        }
        GuardDecision::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn public_paths_are_always_allowed() {
        for path in ["/", "/login", "/administrator", "/api/content", "/api/adminx"] {
            assert_eq!(guard(path, None), GuardDecision::Allow, "{path}");
        }
    }

    #[test]
    fn admin_subtree_needs_exact_marker() {
        for path in ["/admin", "/admin/", "/admin/projects"] {
            assert_eq!(guard(path, Some("true")), GuardDecision::Allow);
            assert_eq!(guard(path, None), GuardDecision::Redirect(LOGIN_PATH));
            assert_eq!(guard(path, Some("TRUE")), GuardDecision::Redirect(LOGIN_PATH));
            assert_eq!(guard(path, Some("")), GuardDecision::Redirect(LOGIN_PATH));
        }
    }

    #[test]
    fn absent_and_invalid_markers_get_the_same_answer() {
        assert_eq!(guard("/admin", None), guard("/admin", Some("false")));
        assert_eq!(
            guard("/api/admin/content", None),
            guard("/api/admin/content", Some("yes"))
        );
        assert_eq!(guard("/api/admin/content", None), GuardDecision::Unauthorized);
    }

    #[test]
    fn marker_is_found_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; is_admin=true"));
        assert_eq!(session_marker(&headers).as_deref(), Some("true"));
        assert!(has_valid_marker(&headers));

        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("is_admin=1"));
        assert_eq!(session_marker(&headers).as_deref(), Some("1"));
        assert!(!has_valid_marker(&headers));

        assert_eq!(session_marker(&HeaderMap::new()), None);
    }
}
