use axum::http::{
    header::{InvalidHeaderValue, COOKIE},
    HeaderMap, HeaderValue,
};

pub const SESSION_COOKIE_NAME: &str = "jwt";

/// Build the `HttpOnly` cookie carrying a signed session token.
pub fn session_cookie(
    token: &str,
    max_age_seconds: u64,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_seconds}"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Build the logout cookie: empty value, epoch expiry. Invalidation is
/// client-side only; an already-issued token stays valid until it expires.
pub fn expired_cookie(secure: bool) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Expires=Thu, 01 Jan 1970 00:00:00 GMT"
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

/// Pull the session token out of the request's `Cookie` header, if present.
pub(crate) fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    let header = headers.get(COOKIE)?;
    let value = header.to_str().ok()?;
    for pair in value.split(';') {
        let trimmed = pair.trim();
        let mut parts = trimmed.splitn(2, '=');
        let key = parts.next()?.trim();
        let val = parts.next()?.trim();
        if key == SESSION_COOKIE_NAME {
            return Some(val.to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_http_only_with_max_age() {
        let cookie = session_cookie("abc.def.ghi", 86400, false).expect("valid cookie");
        let s = cookie.to_str().unwrap();
        assert!(s.starts_with("jwt=abc.def.ghi;"));
        assert!(s.contains("HttpOnly"));
        assert!(s.contains("Max-Age=86400"));
        assert!(!s.contains("Secure"));
    }

    #[test]
    fn session_cookie_adds_secure_flag() {
        let cookie = session_cookie("t", 60, true).expect("valid cookie");
        assert!(cookie.to_str().unwrap().contains("; Secure"));
    }

    #[test]
    fn expired_cookie_is_empty_with_epoch_expiry() {
        let cookie = expired_cookie(false).expect("valid cookie");
        let s = cookie.to_str().unwrap();
        assert!(s.starts_with("jwt=;"));
        assert!(s.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(s.contains("HttpOnly"));
    }

    #[test]
    fn extracts_token_among_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; jwt=tok-123; lang=en"),
        );
        assert_eq!(extract_session_token(&headers).as_deref(), Some("tok-123"));
    }

    #[test]
    fn missing_cookie_header_yields_none() {
        let headers = HeaderMap::new();
        assert!(extract_session_token(&headers).is_none());
    }
}
