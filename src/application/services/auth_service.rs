//! Admin session authentication.
//!
//! A single shared password unlocks the admin surface. A successful login
//! yields a signed session token of the form
//!
//! ```text
//! <issued_unix>.<nonce>.<hex hmac-sha256("<issued_unix>.<nonce>")>
//! ```
//!
//! keyed by the session secret (or the password when no separate secret is
//! configured). Tokens are stateless: nothing is stored server side, and
//! changing the key invalidates every outstanding session.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use rand::Rng;
use serde_json::json;
use sha2::Sha256;

use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Session lifetime: 14 days.
pub const SESSION_TTL_SECS: i64 = 14 * 24 * 60 * 60;

const PASSWORD_CHECK_KEY: &[u8] = b"admin-password-check";

pub struct AdminAuthService {
    password: Option<String>,
    signing_key: Option<String>,
    ttl_secs: i64,
}

impl AdminAuthService {
    /// `session_secret` falls back to `password` when absent or blank.
    pub fn new(password: Option<String>, session_secret: Option<String>) -> Self {
        let password = password.filter(|p| !p.is_empty());
        let signing_key = session_secret
            .filter(|s| !s.is_empty())
            .or_else(|| password.clone());

        Self {
            password,
            signing_key,
            ttl_secs: SESSION_TTL_SECS,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Checks `candidate` against the admin password and issues a session token.
    ///
    /// # Errors
    ///
    /// - [`AppError::Configuration`] if no admin password is configured.
    /// - [`AppError::Unauthorized`] on a missing or wrong password.
    pub fn login(&self, candidate: &str, now: i64) -> Result<String, AppError> {
        let password = self.password.as_deref().ok_or_else(|| {
            AppError::configuration("ADMIN_PASSWORD is not configured", json!({}))
        })?;

        if candidate.is_empty() || !constant_time_eq(candidate, password) {
            tracing::warn!("admin login failed");
            return Err(AppError::unauthorized("Invalid password", json!({})));
        }

        self.issue(now)
    }

    /// Signs a fresh token issued at `now`.
    pub fn issue(&self, now: i64) -> Result<String, AppError> {
        let key = self.key()?;

        let mut nonce = [0u8; 16];
        rand::rng().fill(&mut nonce);
        let nonce = URL_SAFE_NO_PAD.encode(nonce);

        let payload = format!("{now}.{nonce}");
        let signature = sign(key, &payload);

        Ok(format!("{payload}.{signature}"))
    }

    /// Whether `token` was signed with the current key and has not expired.
    pub fn verify(&self, token: &str, now: i64) -> bool {
        let Ok(key) = self.key() else {
            return false;
        };

        let mut parts = token.rsplitn(2, '.');
        let (Some(signature), Some(payload)) = (parts.next(), parts.next()) else {
            return false;
        };

        let Some((issued, nonce)) = payload.split_once('.') else {
            return false;
        };
        let Ok(issued) = issued.parse::<i64>() else {
            return false;
        };
        if nonce.is_empty() {
            return false;
        }
        let expired = now
            .checked_sub(issued)
            .is_none_or(|age| !(0..=self.ttl_secs).contains(&age));
        if expired {
            return false;
        }

        let Ok(expected) = hex::decode(signature) else {
            return false;
        };

        let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
        mac.update(payload.as_bytes());
        mac.verify_slice(&expected).is_ok()
    }

    fn key(&self) -> Result<&str, AppError> {
        self.signing_key.as_deref().ok_or_else(|| {
            AppError::configuration("ADMIN_PASSWORD is not configured", json!({}))
        })
    }
}

fn sign(key: &str, payload: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Compares two secrets without early exit by comparing their MACs.
fn constant_time_eq(candidate: &str, expected: &str) -> bool {
    let mut expected_mac =
        HmacSha256::new_from_slice(PASSWORD_CHECK_KEY).expect("HMAC accepts any key length");
    expected_mac.update(expected.as_bytes());
    let expected_tag = expected_mac.finalize().into_bytes();

    let mut mac = HmacSha256::new_from_slice(PASSWORD_CHECK_KEY).expect("HMAC accepts any key length");
    mac.update(candidate.as_bytes());
    mac.verify_slice(&expected_tag).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_750_000_000;

    fn service() -> AdminAuthService {
        AdminAuthService::new(Some("hunter2".to_string()), Some("session-key".to_string()))
    }

    #[test]
    fn test_login_issues_verifiable_token() {
        let svc = service();
        let token = svc.login("hunter2", NOW).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert!(svc.verify(&token, NOW));
        assert!(svc.verify(&token, NOW + SESSION_TTL_SECS));
    }

    #[test]
    fn test_wrong_password() {
        let result = service().login("hunter3", NOW);
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));

        let result = service().login("", NOW);
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn test_missing_password_is_configuration_error() {
        let svc = AdminAuthService::new(None, Some("session-key".to_string()));
        let result = svc.login("anything", NOW);
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_token_expires() {
        let svc = service();
        let token = svc.issue(NOW).unwrap();
        assert!(!svc.verify(&token, NOW + SESSION_TTL_SECS + 1));
    }

    #[test]
    fn test_token_from_future_rejected() {
        let svc = service();
        let token = svc.issue(NOW + 60).unwrap();
        assert!(!svc.verify(&token, NOW));
    }

    #[test]
    fn test_extreme_issue_times_rejected() {
        let svc = AdminAuthService::new(Some("pw".to_string()), None);
        assert!(!svc.verify(&format!("{}.nonce.00", i64::MIN), NOW));
        assert!(!svc.verify(&format!("{}.nonce.00", i64::MAX), NOW));
        assert!(!svc.verify(&format!("{}.nonce.00", i64::MIN), i64::MAX));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let svc = service();
        let token = svc.issue(NOW).unwrap();

        let forged = token.replacen(&NOW.to_string(), &(NOW + 1000).to_string(), 1);
        assert!(!svc.verify(&forged, NOW + 1000));
        assert!(!svc.verify("garbage", NOW));
        assert!(!svc.verify("1.2", NOW));
        assert!(!svc.verify("", NOW));
    }

    #[test]
    fn test_other_key_rejected() {
        let token = service().issue(NOW).unwrap();
        let other = AdminAuthService::new(Some("hunter2".to_string()), Some("rotated".to_string()));
        assert!(!other.verify(&token, NOW));
    }

    #[test]
    fn test_password_is_fallback_key() {
        let svc = AdminAuthService::new(Some("hunter2".to_string()), None);
        let token = svc.issue(NOW).unwrap();
        assert!(svc.verify(&token, NOW));

        let with_blank_secret =
            AdminAuthService::new(Some("hunter2".to_string()), Some(String::new()));
        assert!(with_blank_secret.verify(&token, NOW));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
    }
}
