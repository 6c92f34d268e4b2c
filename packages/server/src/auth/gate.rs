//! Session Gate: checks the operator's credentials and issues or revokes the
//! `is_admin` cookie. No session state is kept on the server; the cookie is the session.

use cookie::{Cookie, SameSite};
use subtle::ConstantTimeEq;
use time::Duration;

use crate::error::AuthError;

pub const SESSION_COOKIE: &str = "is_admin";
pub const SESSION_VALUE: &str = "true";
pub const SESSION_TTL: Duration = Duration::hours(24);

/// The two secrets the gate compares against.
#[derive(Clone, Default)]
pub struct AdminCredentials {
    pub id: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("id", &self.id)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct SessionGate {
    credentials: AdminCredentials,
    secure: bool,
}

impl SessionGate {
    /// `secure` sets the cookie's `Secure` attribute; turn it on in production.
    pub fn new(credentials: AdminCredentials, secure: bool) -> Self {
        Self {
            credentials,
            secure,
        }
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Cookie<'static>, AuthError> {
        if self.credentials.password.is_empty() {
            tracing::error!("admin password is not configured, refusing every login");
            return Err(AuthError::InvalidCredentials);
        }

        // Both comparisons always run.
        let id_matches = ct_eq(username, &self.credentials.id);
        let password_matches = ct_eq(password, &self.credentials.password);

        if !(id_matches & password_matches) {
            tracing::warn!(id_matches, password_matches, "admin login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!("admin session issued");
        Ok(self.session_cookie())
    }

    /// A cookie that clears the session marker. Safe to send any number of times.
    pub fn logout(&self) -> Cookie<'static> {
        let mut cookie = self.session_cookie();
        cookie.make_removal();
        tracing::info!("admin session revoked");
        cookie
    }

    fn session_cookie(&self) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, SESSION_VALUE))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Strict)
            .max_age(SESSION_TTL)
            .build()
    }
}

fn ct_eq(given: &str, expected: &str) -> bool {
    given.as_bytes().ct_eq(expected.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(secure: bool) -> SessionGate {
        SessionGate::new(
            AdminCredentials {
                id: "owner".to_string(),
                password: "hunter2".to_string(),
            },
            secure,
        )
    }

    #[test]
    fn matching_pair_issues_marker() {
        let cookie = gate(false).authenticate("owner", "hunter2").unwrap();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "true");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.max_age(), Some(Duration::hours(24)));
        assert_ne!(cookie.secure(), Some(true));
    }

    #[test]
    fn production_marker_is_secure() {
        let cookie = gate(true).authenticate("owner", "hunter2").unwrap();
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn any_mismatch_is_rejected() {
        let gate = gate(false);
        for (user, pass) in [
            ("owner", "hunter"),
            ("owner", "hunter22"),
            ("Owner", "hunter2"),
            ("", "hunter2"),
            ("owner", ""),
            ("", ""),
        ] {
            assert!(matches!(
                gate.authenticate(user, pass),
                Err(AuthError::InvalidCredentials)
            ));
        }
    }

    #[test]
    fn unconfigured_password_rejects_everything() {
        let gate = SessionGate::new(AdminCredentials::default(), false);
        assert!(gate.authenticate("", "").is_err());
    }

    #[test]
    fn logout_clears_marker() {
        let gate = gate(false);
        let first = gate.logout();
        let second = gate.logout();
        assert_eq!(first.value(), "");
        assert_eq!(first.max_age(), Some(Duration::ZERO));
        assert_eq!(first.path(), Some("/"));
        assert_eq!(second.value(), "");
        assert_eq!(second.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn debug_hides_password() {
        let printed = format!("{:?}", gate(false));
        assert!(!printed.contains("hunter2"));
    }
}
