//! The `token` session cookie.

use axum::http::header::COOKIE;
use axum::http::HeaderMap;

/// Cookie carrying the session token.
pub const TOKEN_COOKIE: &str = "token";

/// `Set-Cookie` value issuing a session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{TOKEN_COOKIE}={token}; HttpOnly; SameSite=Strict; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie immediately.
pub fn clear_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Find the session token among the request's `Cookie` headers.
pub fn token_from_cookies(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .into_iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == TOKEN_COOKIE && !value.is_empty())
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("abc", 604800, false);
        assert_eq!(
            cookie,
            "token=abc; HttpOnly; SameSite=Strict; Path=/; Max-Age=604800"
        );
        assert!(session_cookie("abc", 1, true).ends_with("; Secure"));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_cookie(false).starts_with("token=; "));
        assert!(clear_cookie(false).contains("Max-Age=0"));
    }

    #[test]
    fn finds_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; token=xyz.123; lang=en"));
        assert_eq!(token_from_cookies(&headers), Some("xyz.123"));
    }

    #[test]
    fn empty_or_missing_token_is_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(token_from_cookies(&headers), None);
        headers.insert(COOKIE, HeaderValue::from_static("token="));
        assert_eq!(token_from_cookies(&headers), None);
    }
}
