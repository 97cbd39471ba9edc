use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::errors::CredentialError;
use crate::config::CG_JWT_SECRET;
use crate::session::{CounselorStatus, Role, Session};
use crate::utils::base64url_decode;

const MS_ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

/// Claim values arrive either as numbers or as strings depending on the issuer.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
enum ClaimValue {
    Code(i64),
    Name(String),
}

#[derive(Debug, Deserialize, Clone)]
struct Claims {
    #[serde(default, alias = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role")]
    role: Option<ClaimValue>,
    #[serde(default, rename = "counselorStatus", alias = "status")]
    counselor_status: Option<ClaimValue>,
    #[serde(default)]
    sub: Option<String>,
    /// NumericDate, which may carry a fractional part
    #[serde(default)]
    exp: Option<f64>,
}

/// What the dashboard needs to know from a bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub role: Role,
    pub counselor_status: Option<CounselorStatus>,
    pub subject: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Credential {
    pub fn session(&self) -> Session {
        Session::signed_in(self.role, self.counselor_status)
    }
}

/// Decode the role carried by a credential. Never fails: malformed, expired or
/// role-less tokens yield `None`.
pub fn decode_role(token: &str) -> Option<Role> {
    match decode_credential(token, Utc::now()) {
        Ok(credential) => Some(credential.role),
        Err(e) => {
            tracing::debug!("Credential rejected: {}", e);
            None
        }
    }
}

/// Decode and check a credential with the configured secret, if any.
pub fn decode_credential(token: &str, now: DateTime<Utc>) -> Result<Credential, CredentialError> {
    decode_credential_with(token, CG_JWT_SECRET.as_deref(), now)
}

/// Decode and check a credential.
///
/// With a `secret` the HS256 signature is verified; without one only the claims are
/// read, since the API is the party that issues and checks signatures.
pub fn decode_credential_with(
    token: &str,
    secret: Option<&[u8]>,
    now: DateTime<Utc>,
) -> Result<Credential, CredentialError> {
    let token = token.trim();
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let claims = match secret {
        Some(secret) => decode_verified(token, secret)?,
        None => decode_unverified(token)?,
    };

    let expires_at = match claims.exp {
        Some(exp) => {
            if !exp.is_finite() {
                return Err(CredentialError::InvalidTokenFormat);
            }
            let expires_at = DateTime::from_timestamp(exp.trunc() as i64, 0)
                .ok_or(CredentialError::InvalidTokenFormat)?;
            if expires_at <= now {
                tracing::debug!("Credential expired at {}", expires_at);
                return Err(CredentialError::TokenExpired);
            }
            Some(expires_at)
        }
        None => None,
    };

    let role = match claims.role {
        Some(ClaimValue::Code(code)) => Role::from_code(code),
        Some(ClaimValue::Name(name)) => Role::from_name(&name),
        None => Role::Unknown,
    };
    if !role.is_known() {
        return Err(CredentialError::UnknownRole);
    }

    let counselor_status = match claims.counselor_status {
        Some(ClaimValue::Code(code)) => CounselorStatus::from_code(code),
        Some(ClaimValue::Name(name)) => CounselorStatus::from_name(&name),
        None => None,
    };

    Ok(Credential {
        role,
        counselor_status: if role == Role::Counselor {
            counselor_status
        } else {
            None
        },
        subject: claims.sub,
        expires_at,
    })
}

fn decode_verified(token: &str, secret: &[u8]) -> Result<Claims, CredentialError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Expiry is checked against the caller's clock below
    validation.validate_exp = false;
    validation.required_spec_claims = HashSet::new();
    validation.validate_aud = false;

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)?;
    Ok(data.claims)
}

fn decode_unverified(token: &str) -> Result<Claims, CredentialError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(CredentialError::InvalidTokenFormat);
    };

    let payload = base64url_decode(payload)?;
    let value: serde_json::Value = serde_json::from_slice(&payload)?;
    if !value.is_object() {
        return Err(CredentialError::InvalidTokenFormat);
    }
    if value.get("role").is_some() && value.get(MS_ROLE_CLAIM).is_some() {
        tracing::warn!("Credential carries two role claims");
        return Err(CredentialError::InvalidTokenFormat);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::base64url_encode;
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    fn unsigned_token(claims: serde_json::Value) -> String {
        let header = base64url_encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = base64url_encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.c2lnbmF0dXJl")
    }

    fn signed_token(claims: serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_numeric_role() {
        let token = unsigned_token(json!({"role": 1, "sub": "42"}));
        let credential = decode_credential_with(&token, None, Utc::now()).unwrap();
        assert_eq!(credential.role, Role::Admin);
        assert_eq!(credential.subject.as_deref(), Some("42"));
        assert_eq!(credential.expires_at, None);
    }

    #[test]
    fn test_decode_named_ms_role_claim_with_status() {
        let token = unsigned_token(json!({
            MS_ROLE_CLAIM: "Counselor",
            "counselorStatus": "0",
        }));
        let credential = decode_credential_with(&token, None, Utc::now()).unwrap();
        assert_eq!(credential.role, Role::Counselor);
        assert_eq!(credential.counselor_status, Some(CounselorStatus::Blocked));
        assert!(credential.session().is_blocked());
    }

    #[test]
    fn test_status_claim_ignored_for_admin() {
        let token = unsigned_token(json!({"role": "admin", "status": 0}));
        let credential = decode_credential_with(&token, None, Utc::now()).unwrap();
        assert_eq!(credential.counselor_status, None);
    }

    #[test]
    fn test_bearer_prefix_is_accepted() {
        let token = format!("Bearer {}", unsigned_token(json!({"role": 2})));
        let credential = decode_credential_with(&token, None, Utc::now()).unwrap();
        assert_eq!(credential.role, Role::Counselor);
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let token = unsigned_token(json!({"role": 1, "exp": (now - Duration::minutes(5)).timestamp()}));
        assert!(matches!(
            decode_credential_with(&token, None, now),
            Err(CredentialError::TokenExpired)
        ));

        let token = unsigned_token(json!({"role": 1, "exp": (now + Duration::minutes(5)).timestamp()}));
        let credential = decode_credential_with(&token, None, now).unwrap();
        assert!(credential.expires_at.is_some());
    }

    #[test]
    fn test_fractional_exp_is_truncated() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let token = unsigned_token(json!({"role": 2, "exp": 1_700_000_600.75}));
        let credential = decode_credential_with(&token, None, now).unwrap();
        assert_eq!(
            credential.expires_at,
            DateTime::from_timestamp(1_700_000_600, 0)
        );

        let token = unsigned_token(json!({"role": 2, "exp": 1_699_999_999.5}));
        assert!(matches!(
            decode_credential_with(&token, None, now),
            Err(CredentialError::TokenExpired)
        ));
    }

    #[test]
    fn test_unknown_or_missing_role() {
        let token = unsigned_token(json!({"role": 3}));
        assert!(matches!(
            decode_credential_with(&token, None, Utc::now()),
            Err(CredentialError::UnknownRole)
        ));

        let token = unsigned_token(json!({"sub": "7"}));
        assert!(matches!(
            decode_credential_with(&token, None, Utc::now()),
            Err(CredentialError::UnknownRole)
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        let now = Utc::now();
        for token in ["", "abc", "a.b", "a.b.c.d", "a.***.c", "a.bm90LWpzb24.c"] {
            assert!(
                decode_credential_with(token, None, now).is_err(),
                "token {token:?} should be rejected"
            );
        }

        // Valid JSON that is not an object
        let token = format!("h.{}.s", base64url_encode(b"[1,2]"));
        assert!(matches!(
            decode_credential_with(&token, None, now),
            Err(CredentialError::InvalidTokenFormat)
        ));
    }

    #[test]
    fn test_duplicate_role_claims_rejected() {
        let token = unsigned_token(json!({"role": 2, MS_ROLE_CLAIM: "Admin"}));
        assert!(decode_credential_with(&token, None, Utc::now()).is_err());
    }

    #[test]
    fn test_verified_signature() {
        let secret: &[u8] = b"test-secret";
        let token = signed_token(json!({"role": 1}), secret);
        let credential = decode_credential_with(&token, Some(secret), Utc::now()).unwrap();
        assert_eq!(credential.role, Role::Admin);

        assert!(matches!(
            decode_credential_with(&token, Some(b"other-secret".as_slice()), Utc::now()),
            Err(CredentialError::Jwt(_))
        ));
    }

    #[test]
    fn test_verified_rejects_unsigned() {
        let token = unsigned_token(json!({"role": 1}));
        assert!(decode_credential_with(&token, Some(b"test-secret".as_slice()), Utc::now()).is_err());
    }

    #[test]
    fn test_decode_role_never_fails() {
        assert_eq!(decode_role("garbage"), None);
        assert_eq!(decode_role(""), None);
    }
}
