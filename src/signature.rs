use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNING_VERSION: &str = "v0";

fn mac_for(secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(SIGNING_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    Some(mac)
}

/// Computes the `v0=<hex>` signature Slack sends in `X-Slack-Signature`.
pub fn sign(secret: &str, timestamp: &str, body: &[u8]) -> String {
    let digest = mac_for(secret, timestamp, body)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default();
    format!("{SIGNING_VERSION}={digest}")
}

/// Verifies a Slack request signature over `v0:{timestamp}:{body}`.
///
/// Missing headers fail closed before any HMAC is computed. The digest comparison is
/// constant-time. Only the canonical lowercase-hex form is accepted, so two distinct signature
/// strings never both verify. The timestamp is not checked for freshness here.
pub fn verify(
    signature: Option<&str>,
    timestamp: Option<&str>,
    body: &[u8],
    signing_secret: &str,
) -> bool {
    let (Some(signature), Some(timestamp)) = (signature, timestamp) else {
        tracing::warn!("rejected request: missing signature headers");
        return false;
    };

    let ok = check(signature, timestamp, body, signing_secret);
    if ok {
        tracing::debug!("verified request signature");
    } else {
        tracing::warn!("rejected request: invalid signature");
    }
    ok
}

fn check(signature: &str, timestamp: &str, body: &[u8], signing_secret: &str) -> bool {
    let Some(hex_sig) = signature
        .strip_prefix(SIGNING_VERSION)
        .and_then(|rest| rest.strip_prefix('='))
    else {
        return false;
    };

    if !hex_sig
        .bytes()
        .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    {
        return false;
    }

    let Ok(expected) = hex::decode(hex_sig) else {
        return false;
    };

    let Some(mac) = mac_for(signing_secret, timestamp, body) else {
        return false;
    };

    mac.verify_slice(&expected).is_ok()
}
