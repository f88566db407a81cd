//! Signed cookie session storage.
//!
//! The cookie value is the base64url-encoded JSON form of `SessionData`,
//! which keeps arbitrary usernames and colors inside the cookie-safe
//! alphabet. `SignedCookieJar` signs it on the way out and drops it on the
//! way in when the signature does not verify. A payload that verifies but
//! fails to parse or has expired reads as a fresh anonymous session.

use axum_extra::extract::cookie::{Cookie, SameSite, SignedCookieJar};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use todo_core::SessionData;
use tracing::debug;

use crate::config::Config;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "__session";

/// Cookie attributes derived from configuration.
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_secs: i64,
    pub secure: bool,
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            ttl_secs: config.session_ttl_secs,
            secure: config.secure_cookies,
        }
    }
}

pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Read the session, falling back to anonymous.
pub fn load(jar: &SignedCookieJar, now: i64) -> SessionData {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return SessionData::default();
    };
    let decoded = match URL_SAFE_NO_PAD.decode(cookie.value()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("undecodable session cookie: {e}");
            return SessionData::default();
        }
    };
    match serde_json::from_slice::<SessionData>(&decoded) {
        Ok(session) if session.is_expired(now) => {
            debug!("session expired");
            SessionData::default()
        }
        Ok(session) => session,
        Err(e) => {
            debug!("unreadable session payload: {e}");
            SessionData::default()
        }
    }
}

/// Write `session` back into the jar with a fresh expiry.
pub fn commit(
    jar: SignedCookieJar,
    mut session: SessionData,
    settings: SessionSettings,
    now: i64,
) -> Result<SignedCookieJar, AppError> {
    session.expires_at = now.saturating_add(settings.ttl_secs);
    let value = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&session)?);
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(time::Duration::seconds(settings.ttl_secs))
        .build();
    Ok(jar.add(cookie))
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::cookie::Key;

    use super::*;

    const SETTINGS: SessionSettings = SessionSettings {
        ttl_secs: 60,
        secure: false,
    };

    fn jar() -> SignedCookieJar {
        SignedCookieJar::new(Key::generate())
    }

    #[test]
    fn empty_jar_is_anonymous() {
        assert!(load(&jar(), 0).is_anonymous());
    }

    #[test]
    fn committed_session_reads_back() {
        let mut session = SessionData::default();
        session.sign_in("username".to_string());
        let jar = commit(jar(), session, SETTINGS, 1_000).unwrap();

        let loaded = load(&jar, 1_030);
        assert_eq!(loaded.current_user(), "username");
        assert_eq!(loaded.expires_at, 1_060);
    }

    #[test]
    fn non_ascii_values_survive() {
        let mut session = SessionData::default();
        session.color = Some("bleu; ciel \"clair\"".to_string());
        let jar = commit(jar(), session, SETTINGS, 0).unwrap();
        assert_eq!(load(&jar, 1).color.as_deref(), Some("bleu; ciel \"clair\""));
    }

    #[test]
    fn expired_session_is_anonymous() {
        let mut session = SessionData::default();
        session.sign_in("username".to_string());
        let jar = commit(jar(), session, SETTINGS, 1_000).unwrap();
        assert!(load(&jar, 1_060).is_anonymous());
    }

    #[test]
    fn huge_ttl_expires_at_the_end_of_time() {
        let forever = SessionSettings {
            ttl_secs: i64::MAX,
            secure: false,
        };
        let mut session = SessionData::default();
        session.sign_in("username".to_string());
        let jar = commit(jar(), session, forever, 1_000).unwrap();

        let loaded = load(&jar, 2_000);
        assert_eq!(loaded.expires_at, i64::MAX);
        assert_eq!(loaded.current_user(), "username");
    }

    #[test]
    fn cookie_attributes() {
        use axum::response::IntoResponse;

        let secure = SessionSettings {
            ttl_secs: 60,
            secure: true,
        };
        let response = commit(jar(), SessionData::default(), secure, 0)
            .unwrap()
            .into_response();
        let set_cookie = response
            .headers()
            .get(axum::http::header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("__session="));
        for attribute in ["HttpOnly", "SameSite=Lax", "Secure", "Path=/", "Max-Age=60"] {
            assert!(set_cookie.contains(attribute), "missing {attribute} in {set_cookie}");
        }
    }
}
