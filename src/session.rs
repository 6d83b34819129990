//! Cookie-backed session handling.
//!
//! The authentication token lives in a cookie named [`TOKEN_COOKIE`] scoped to the API
//! origin. The same cookie jar is plugged into the HTTP client as its cookie provider, so the
//! cookie is forwarded with every request while its value is also sent as a bearer token.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;

/// Name of the cookie holding the authentication token.
pub const TOKEN_COOKIE: &str = "token";

/// Lifetime given to the token cookie at login, in seconds.
pub const TOKEN_MAX_AGE_SECS: u64 = 3600;

/// Extracts the token from a `Cookie` header style string (`a=1; token=abc; b=2`).
///
/// Returns `None` when no cookie is named exactly `token`, or when its value is empty.
///
/// # Example
/// ```rust
/// use interview_admin::session::token_from_cookies;
///
/// assert_eq!(token_from_cookies("theme=dark; token=abc123"), Some("abc123"));
/// assert_eq!(token_from_cookies("theme=dark"), None);
/// ```
#[must_use]
pub fn token_from_cookies(cookies: &str) -> Option<&str> {
    cookies
        .split(';')
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// The session collaborator shared by every store.
///
/// Wraps the cookie jar of the HTTP client and exposes the token it holds. All reads and
/// writes of the token cookie go through here.
pub struct Session {
    jar: Arc<Jar>,
    origin: Url,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("origin", &self.origin.as_str())
            .field("token", &self.current_token().map(|_| "***REDACTED***"))
            .finish()
    }
}

impl Session {
    /// Creates an empty session whose cookie is scoped to the origin of `base_url`.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let mut origin = base_url.clone();
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);

        Self {
            jar: Arc::new(Jar::default()),
            origin,
        }
    }

    /// The cookie jar, to be used as the HTTP client's cookie provider.
    #[must_use]
    pub fn jar(&self) -> Arc<Jar> {
        Arc::clone(&self.jar)
    }

    /// Returns the token currently held in the cookie, if any.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        let header = self.jar.cookies(&self.origin)?;
        let cookies = header.to_str().ok()?;

        token_from_cookies(cookies).map(ToOwned::to_owned)
    }

    /// Stores `token` in the cookie for [`TOKEN_MAX_AGE_SECS`] seconds.
    pub fn set_token(&self, token: &str) {
        let cookie = format!("{TOKEN_COOKIE}={token}; Path=/; Max-Age={TOKEN_MAX_AGE_SECS}");
        self.jar.add_cookie_str(&cookie, &self.origin);
    }

    /// Expires the token cookie immediately.
    pub fn clear_token(&self) {
        let cookie =
            format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; Expires=Thu, 01 Jan 1970 00:00:00 GMT");
        self.jar.add_cookie_str(&cookie, &self.origin);
    }

    /// Whether a token is currently available.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current_token().is_some()
    }
}
