//! Cookie names and builders for token and transient OAuth state transport
//!
//! All cookies share the same attributes: HttpOnly, Secure, SameSite=Lax,
//! Path=/ and the configured apex domain, so any process instance behind
//! the domain can consume state issued by another.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use super::models::{ACCESS_TOKEN_EXPIRY, REFRESH_TOKEN_EXPIRY};

/// Access-token cookie
pub const ACCESS_COOKIE: &str = "svTkn";
/// Refresh-token cookie
pub const REFRESH_COOKIE: &str = "svRtkn";
/// Transient OAuth state cookie (Google flow)
pub const STATE_COOKIE: &str = "_state";
/// Transient PKCE verifier cookie (Google flow)
pub const CODE_VERIFIER_COOKIE: &str = "_code_verifier";

/// Transient cookie lifetime in seconds (5 minutes)
const OAUTH_STATE_EXPIRY: i64 = 5 * 60;

fn base_cookie(name: &'static str, value: String, domain: &str, max_age: i64) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .domain(domain.to_string())
        .max_age(Duration::seconds(max_age))
        .build()
}

pub fn access_cookie(token: String, domain: &str) -> Cookie<'static> {
    base_cookie(ACCESS_COOKIE, token, domain, ACCESS_TOKEN_EXPIRY)
}

pub fn refresh_cookie(token: String, domain: &str) -> Cookie<'static> {
    base_cookie(REFRESH_COOKIE, token, domain, REFRESH_TOKEN_EXPIRY)
}

pub fn state_cookie(state: String, domain: &str) -> Cookie<'static> {
    base_cookie(STATE_COOKIE, state, domain, OAUTH_STATE_EXPIRY)
}

pub fn code_verifier_cookie(verifier: String, domain: &str) -> Cookie<'static> {
    base_cookie(CODE_VERIFIER_COOKIE, verifier, domain, OAUTH_STATE_EXPIRY)
}

/// A cookie matching name/path/domain of the original so `CookieJar::remove`
/// emits the right expiring Set-Cookie
pub fn removal_cookie(name: &'static str, domain: &str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .domain(domain.to_string())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_cookie_attributes() {
        let cookie = access_cookie("tok".to_string(), "example.com");
        assert_eq!(cookie.name(), "svTkn");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(900)));
    }

    #[test]
    fn test_refresh_cookie_lives_seven_days() {
        let cookie = refresh_cookie("tok".to_string(), "example.com");
        assert_eq!(cookie.name(), "svRtkn");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(604_800)));
    }

    #[test]
    fn test_transient_cookies_live_five_minutes() {
        let state = state_cookie("s".to_string(), "example.com");
        let verifier = code_verifier_cookie("v".to_string(), "example.com");
        assert_eq!(state.max_age(), Some(Duration::seconds(300)));
        assert_eq!(verifier.max_age(), Some(Duration::seconds(300)));
    }

    #[test]
    fn test_removal_cookie_matches_scope() {
        let cookie = removal_cookie(STATE_COOKIE, "example.com");
        assert_eq!(cookie.name(), "_state");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.domain(), Some("example.com"));
    }
}
