//! Webhook signature verification.
//!
//! Header format: `t=<unix>,v1=<hex>[,v1=<hex>...]`. The expected signature
//! is `hex(hmac_sha256(secret, "<t>.<raw body>"))`. Any `v1` entry may match;
//! other schemes (`v0`) are ignored.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted age (either direction) of a signed timestamp.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Missing Stripe-Signature header")]
    MissingHeader,

    #[error("Malformed Stripe-Signature header")]
    MalformedHeader,

    #[error("No v1 signature in header")]
    NoSignatures,

    #[error("Timestamp outside the tolerance window")]
    TimestampOutOfTolerance,

    #[error("No signature matches the payload")]
    Mismatch,
}

fn mac(secret: &str, timestamp: i64, payload: &[u8]) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    mac
}

/// Produces a header value for `payload` signed at `timestamp`.
pub fn sign(payload: &[u8], secret: &str, timestamp: i64) -> String {
    let signature = hex::encode(mac(secret, timestamp, payload).finalize().into_bytes());
    format!("t={timestamp},v1={signature}")
}

/// Verifies `header` against the raw request body.
pub fn verify(
    payload: &[u8],
    header: Option<&str>,
    secret: &str,
    now: i64,
    tolerance_secs: i64,
) -> Result<(), SignatureError> {
    let header = header
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(SignatureError::MissingHeader)?;

    let mut timestamp = None;
    let mut signatures = Vec::new();

    for item in header.split(',') {
        let (key, value) = item
            .trim()
            .split_once('=')
            .ok_or(SignatureError::MalformedHeader)?;
        match key {
            "t" => {
                timestamp = Some(
                    value
                        .parse::<i64>()
                        .map_err(|_| SignatureError::MalformedHeader)?,
                )
            }
            "v1" => signatures.push(value),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(SignatureError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(SignatureError::NoSignatures);
    }
    if now.abs_diff(timestamp) > tolerance_secs.unsigned_abs() {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let expected = mac(secret, timestamp, payload);
    let matched = signatures.iter().any(|candidate| {
        hex::decode(candidate)
            .map(|bytes| expected.clone().verify_slice(&bytes).is_ok())
            .unwrap_or(false)
    });

    if matched {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_test";
    const NOW: i64 = 1_750_000_000;
    const BODY: &[u8] = br#"{"id":"evt_1","type":"invoice.paid"}"#;

    #[test]
    fn test_signed_payload_verifies() {
        let header = sign(BODY, SECRET, NOW);
        assert_eq!(verify(BODY, Some(&header), SECRET, NOW, 300), Ok(()));
    }

    #[test]
    fn test_any_v1_may_match() {
        let good = sign(BODY, SECRET, NOW);
        let good_sig = good.split("v1=").nth(1).unwrap();
        let header = format!("t={NOW},v0=abc,v1={},v1={good_sig}", "00".repeat(32));
        assert_eq!(verify(BODY, Some(&header), SECRET, NOW, 300), Ok(()));
    }

    #[test]
    fn test_modified_body_fails() {
        let header = sign(BODY, SECRET, NOW);
        let tampered = br#"{"id":"evt_1","type":"invoice.void"}"#;
        assert_eq!(
            verify(tampered, Some(&header), SECRET, NOW, 300),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_wrong_secret_fails() {
        let header = sign(BODY, "whsec_other", NOW);
        assert_eq!(
            verify(BODY, Some(&header), SECRET, NOW, 300),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_stale_timestamp_fails() {
        let header = sign(BODY, SECRET, NOW - 301);
        assert_eq!(
            verify(BODY, Some(&header), SECRET, NOW, 300),
            Err(SignatureError::TimestampOutOfTolerance)
        );

        let header = sign(BODY, SECRET, NOW - 300);
        assert_eq!(verify(BODY, Some(&header), SECRET, NOW, 300), Ok(()));
    }

    #[test]
    fn test_extreme_timestamps_are_out_of_tolerance() {
        for t in [i64::MIN, i64::MAX] {
            let header = format!("t={t},v1={}", "00".repeat(32));
            assert_eq!(
                verify(BODY, Some(&header), SECRET, NOW, 300),
                Err(SignatureError::TimestampOutOfTolerance)
            );
        }
    }

    #[test]
    fn test_malformed_headers() {
        assert_eq!(
            verify(BODY, None, SECRET, NOW, 300),
            Err(SignatureError::MissingHeader)
        );
        assert_eq!(
            verify(BODY, Some("garbage"), SECRET, NOW, 300),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify(BODY, Some("v1=abcd"), SECRET, NOW, 300),
            Err(SignatureError::MalformedHeader)
        );
        assert_eq!(
            verify(BODY, Some(&format!("t={NOW}")), SECRET, NOW, 300),
            Err(SignatureError::NoSignatures)
        );
        assert_eq!(
            verify(BODY, Some(&format!("t={NOW},v1=zz")), SECRET, NOW, 300),
            Err(SignatureError::Mismatch)
        );
    }
}
