use chrono::{DateTime, Utc};
use headers::{Cookie, HeaderMapExt};
use http::header::HeaderMap;

use crate::config::{CG_COOKIE_MAX_AGE, CG_ROLE_COOKIE, CG_STATUS_COOKIE, CG_TOKEN_COOKIE};
use crate::credential::{Credential, decode_credential};
use crate::errors::GuardError;
use crate::session::types::{CounselorStatus, Role, Session};
use crate::utils::header_set_cookie;

/// Build the session for a request from its `Cookie` header.
///
/// Never fails: a missing or unreadable header is an anonymous session.
pub fn session_from_headers(headers: &HeaderMap) -> Session {
    match headers.typed_get::<Cookie>() {
        Some(cookies) => session_from_cookies(&cookies, Utc::now()),
        None => {
            tracing::trace!("No cookie header found");
            Session::anonymous()
        }
    }
}

/// Build the session from the role, status and token cookies.
///
/// The role cookie is authoritative for the area check. When the token cookie is
/// present it must decode and name the same role, otherwise the request is treated
/// as signed out.
pub fn session_from_cookies(cookies: &Cookie, now: DateTime<Utc>) -> Session {
    let Some(raw_role) = cookies.get(CG_ROLE_COOKIE.as_str()) else {
        return Session::anonymous();
    };

    let role = Role::from_cookie_value(raw_role);
    if !role.is_known() {
        tracing::debug!("Unrecognized role cookie value: {:?}", raw_role);
        return Session::anonymous();
    }

    let mut status = cookies
        .get(CG_STATUS_COOKIE.as_str())
        .and_then(CounselorStatus::from_cookie_value);

    if let Some(token) = cookies.get(CG_TOKEN_COOKIE.as_str()) {
        match decode_credential(token, now) {
            Ok(credential) if credential.role == role => {
                // A status in the credential is fresher than the cookie copy
                if credential.counselor_status.is_some() {
                    status = credential.counselor_status;
                }
            }
            Ok(credential) => {
                tracing::warn!(
                    "Role cookie {:?} disagrees with credential role {:?}",
                    role,
                    credential.role
                );
                return Session::anonymous();
            }
            Err(e) => {
                tracing::debug!("Credential cookie rejected: {}", e);
                return Session::anonymous();
            }
        }
    }

    Session::signed_in(role, status)
}

/// Decode a freshly issued credential and produce the `Set-Cookie` headers that
/// establish the session. Blocked counselors are refused with [`GuardError::Blocked`].
pub fn prepare_sign_in_headers(token: &str) -> Result<(Credential, HeaderMap), GuardError> {
    let credential = decode_credential(token, Utc::now())?;
    if credential.session().is_blocked() {
        tracing::info!("Sign-in refused for blocked counselor {:?}", credential.subject);
        return Err(GuardError::Blocked);
    }
    let headers = sign_in_headers(&credential, token)?;
    Ok((credential, headers))
}

pub(crate) fn sign_in_headers(credential: &Credential, token: &str) -> Result<HeaderMap, GuardError> {
    let code = credential.role.code().ok_or(GuardError::UnknownRole)?;
    let token = token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let max_age = match credential.expires_at {
        Some(expires_at) => (expires_at - Utc::now()).num_seconds().clamp(0, (*CG_COOKIE_MAX_AGE).max(0)),
        None => *CG_COOKIE_MAX_AGE,
    };

    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &CG_ROLE_COOKIE, &code.to_string(), max_age, false)?;
    match credential.counselor_status {
        Some(status) if credential.role == Role::Counselor => header_set_cookie(
            &mut headers,
            &CG_STATUS_COOKIE,
            &status.code().to_string(),
            max_age,
            false,
        )?,
        // Drop a status left behind by an earlier counselor sign-in
        _ => header_set_cookie(&mut headers, &CG_STATUS_COOKIE, "", -1, false)?,
    }
    header_set_cookie(&mut headers, &CG_TOKEN_COOKIE, token, max_age, true)?;

    tracing::debug!("Created session cookies for role {:?}", credential.role);
    Ok(headers)
}

/// `Set-Cookie` headers that expire every session cookie.
pub fn prepare_sign_out_headers() -> Result<HeaderMap, GuardError> {
    let mut headers = HeaderMap::new();
    header_set_cookie(&mut headers, &CG_ROLE_COOKIE, "", -1, false)?;
    header_set_cookie(&mut headers, &CG_STATUS_COOKIE, "", -1, false)?;
    header_set_cookie(&mut headers, &CG_TOKEN_COOKIE, "", -1, true)?;
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64url_encode;
    use chrono::Duration;
    use http::header::{COOKIE, HeaderValue, SET_COOKIE};
    use serde_json::json;

    fn token(claims: serde_json::Value) -> String {
        format!(
            "{}.{}.sig",
            base64url_encode(br#"{"alg":"HS256"}"#),
            base64url_encode(claims.to_string().as_bytes())
        )
    }

    fn headers_with_cookie(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    fn set_cookies(headers: &HeaderMap) -> Vec<String> {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_no_cookie_header_is_anonymous() {
        assert_eq!(session_from_headers(&HeaderMap::new()), Session::anonymous());
    }

    #[test]
    fn test_role_cookie_only() {
        let session = session_from_headers(&headers_with_cookie("role=1"));
        assert_eq!(session.authenticated_role(), Some(Role::Admin));

        let session = session_from_headers(&headers_with_cookie("other=x; role=2; counselorStatus=1"));
        assert_eq!(session.authenticated_role(), Some(Role::Counselor));
        assert_eq!(session.counselor_status, Some(CounselorStatus::Pending));
    }

    #[test]
    fn test_invalid_role_cookie_is_anonymous() {
        for cookie in ["role=0", "role=admin", "role=", "role=3"] {
            let session = session_from_headers(&headers_with_cookie(cookie));
            assert_eq!(session, Session::anonymous(), "cookie {cookie}");
        }
    }

    #[test]
    fn test_token_cookie_must_agree_with_role() {
        let admin_token = token(json!({"role": 1}));
        let cookie = format!("role=2; accessToken={admin_token}");
        let session = session_from_headers(&headers_with_cookie(&cookie));
        assert_eq!(session, Session::anonymous());

        let cookie = format!("role=1; accessToken={admin_token}");
        let session = session_from_headers(&headers_with_cookie(&cookie));
        assert_eq!(session.authenticated_role(), Some(Role::Admin));
    }

    #[test]
    fn test_malformed_token_cookie_is_anonymous() {
        let session = session_from_headers(&headers_with_cookie("role=1; accessToken=nope"));
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_expired_token_cookie_is_anonymous() {
        let expired = token(json!({"role": 1, "exp": (Utc::now() - Duration::hours(1)).timestamp()}));
        let cookie = format!("role=1; accessToken={expired}");
        assert_eq!(
            session_from_headers(&headers_with_cookie(&cookie)),
            Session::anonymous()
        );
    }

    #[test]
    fn test_token_status_overrides_cookie_status() {
        let blocked = token(json!({"role": 2, "counselorStatus": 0}));
        let cookie = format!("role=2; counselorStatus=2; accessToken={blocked}");
        let session = session_from_headers(&headers_with_cookie(&cookie));
        assert!(session.is_blocked());
    }

    #[test]
    fn test_sign_in_headers_for_counselor() {
        let raw = token(json!({"role": "Counselor", "counselorStatus": 2}));
        let (credential, headers) = prepare_sign_in_headers(&raw).unwrap();
        assert_eq!(credential.role, Role::Counselor);

        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 3);
        assert!(cookies[0].starts_with("role=2;"));
        assert!(cookies[1].starts_with("counselorStatus=2;"));
        assert!(cookies[2].starts_with(&format!("accessToken={raw};")));
        assert!(cookies[2].contains("HttpOnly"));
    }

    #[test]
    fn test_sign_in_headers_for_admin_clear_status() {
        let raw = token(json!({"role": 1}));
        let (_, headers) = prepare_sign_in_headers(&raw).unwrap();
        let cookies = set_cookies(&headers);
        assert!(cookies[0].starts_with("role=1;"));
        assert!(cookies[1].starts_with("counselorStatus=;"));
        assert!(cookies[1].contains("Max-Age=-1"));
    }

    #[test]
    fn test_sign_in_rejects_bad_token() {
        assert!(matches!(
            prepare_sign_in_headers("not-a-token"),
            Err(GuardError::Credential(_))
        ));
    }

    #[test]
    fn test_sign_in_refuses_blocked_counselor() {
        let raw = token(json!({"role": 2, "counselorStatus": "Blocked"}));
        assert!(matches!(
            prepare_sign_in_headers(&raw),
            Err(GuardError::Blocked)
        ));
    }

    #[test]
    fn test_sign_out_headers_expire_all_cookies() {
        let headers = prepare_sign_out_headers().unwrap();
        let cookies = set_cookies(&headers);
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().all(|c| c.contains("Max-Age=-1")));
        assert!(cookies[0].starts_with("role=;"));
        assert!(cookies[1].starts_with("counselorStatus=;"));
        assert!(cookies[2].starts_with("accessToken=;"));
    }
}
