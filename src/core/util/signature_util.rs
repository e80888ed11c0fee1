use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Webhook timestamps further than this from now are refused.
pub const TOLERANCE_SECS: i64 = 5 * 60;

/// Headers carried by a signed identity-provider webhook.
#[derive(Debug, Clone)]
pub struct WebhookHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    /// Space separated `v1,<base64>` entries.
    pub signature: &'a str,
}

pub struct SignatureUtil;

impl SignatureUtil {
    fn key_bytes(secret: &str) -> Result<Vec<u8>> {
        let raw = secret.strip_prefix("whsec_").unwrap_or(secret);
        STANDARD
            .decode(raw)
            .map_err(|e| anyhow!("Webhook secret is not valid base64: {e}"))
    }

    fn mac(secret: &str, headers: &WebhookHeaders<'_>, body: &[u8]) -> Result<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(&Self::key_bytes(secret)?)
            .map_err(|e| anyhow!("Invalid webhook key: {e}"))?;
        mac.update(headers.id.as_bytes());
        mac.update(b".");
        mac.update(headers.timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        Ok(mac)
    }

    /// Produce the `v1,<base64>` signature for a payload.
    pub fn sign(secret: &str, headers: &WebhookHeaders<'_>, body: &[u8]) -> Result<String> {
        let tag = Self::mac(secret, headers, body)?.finalize().into_bytes();
        Ok(format!("v1,{}", STANDARD.encode(tag)))
    }

    /// Returns `Ok(false)` on a bad signature or stale timestamp, `Err` on a bad secret.
    pub fn verify(
        secret: &str,
        headers: &WebhookHeaders<'_>,
        body: &[u8],
        now_unix: i64,
    ) -> Result<bool> {
        let Ok(ts) = headers.timestamp.trim().parse::<i64>() else {
            return Ok(false);
        };
        if now_unix.abs_diff(ts) > TOLERANCE_SECS.unsigned_abs() {
            return Ok(false);
        }

        let mac = Self::mac(secret, headers, body)?;
        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == "v1")
            .filter_map(|(_, sig)| STANDARD.decode(sig).ok())
            .any(|sig| mac.clone().verify_slice(&sig).is_ok());

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
    const NOW: i64 = 1_700_000_000;

    fn unsigned(ts: &str) -> WebhookHeaders<'_> {
        WebhookHeaders {
            id: "msg_1",
            timestamp: ts,
            signature: "",
        }
    }

    #[test]
    fn signed_payload_verifies() {
        let body = br#"{"type":"user.created"}"#;
        let ts = NOW.to_string();
        let sig = SignatureUtil::sign(SECRET, &unsigned(&ts), body).unwrap();
        let combined = format!("v1,bogus {sig}");
        let h = WebhookHeaders {
            signature: &combined,
            ..unsigned(&ts)
        };

        assert!(SignatureUtil::verify(SECRET, &h, body, NOW).unwrap());
    }

    #[test]
    fn tampered_body_fails() {
        let ts = NOW.to_string();
        let sig = SignatureUtil::sign(SECRET, &unsigned(&ts), b"original").unwrap();
        let h = WebhookHeaders {
            signature: &sig,
            ..unsigned(&ts)
        };

        assert!(!SignatureUtil::verify(SECRET, &h, b"tampered", NOW).unwrap());
    }

    #[test]
    fn stale_timestamp_fails() {
        let ts = (NOW - TOLERANCE_SECS - 1).to_string();
        let sig = SignatureUtil::sign(SECRET, &unsigned(&ts), b"x").unwrap();
        let h = WebhookHeaders {
            signature: &sig,
            ..unsigned(&ts)
        };

        assert!(!SignatureUtil::verify(SECRET, &h, b"x", NOW).unwrap());
    }

    #[test]
    fn extreme_timestamps_are_stale() {
        for ts in [i64::MIN.to_string(), i64::MAX.to_string()] {
            let h = WebhookHeaders {
                signature: "v1,AAAA",
                ..unsigned(&ts)
            };
            assert!(!SignatureUtil::verify(SECRET, &h, b"x", NOW).unwrap());
        }
    }

    #[test]
    fn invalid_secret_is_an_error() {
        let h = WebhookHeaders {
            signature: "v1,abc",
            ..unsigned("1")
        };
        assert!(SignatureUtil::verify("whsec_***", &h, b"x", 1).is_err());
    }
}
