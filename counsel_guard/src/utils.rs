use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use http::header::{HeaderMap, SET_COOKIE};
use thiserror::Error;

pub(crate) fn base64url_decode(input: &str) -> Result<Vec<u8>, UtilError> {
    // Some issuers keep the padding; URL_SAFE_NO_PAD rejects it
    let decoded = URL_SAFE_NO_PAD
        .decode(input.trim_end_matches('='))
        .map_err(|_| UtilError::Format("Failed to decode base64url".to_string()))?;
    Ok(decoded)
}

#[cfg(test)]
pub(crate) fn base64url_encode(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Append a `Set-Cookie` header. A non-positive `max_age` expires the cookie.
pub(crate) fn header_set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
    http_only: bool,
) -> Result<(), UtilError> {
    if name.is_empty() || !is_cookie_safe(name) || !is_cookie_safe(value) {
        return Err(UtilError::Cookie(format!(
            "Refusing to set cookie with unsafe name or value: {name}"
        )));
    }

    let mut cookie = format!("{name}={value}; SameSite=Lax; Path=/; Max-Age={max_age}");
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    tracing::trace!("Set-Cookie: {}", cookie);

    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| UtilError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}

fn is_cookie_safe(s: &str) -> bool {
    s.bytes()
        .all(|b| b.is_ascii_graphic() && !matches!(b, b';' | b',' | b'"' | b'\\'))
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtilError {
    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Invalid format: {0}")]
    Format(String),
}
