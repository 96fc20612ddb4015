use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Canonical v1 string-to-sign: method, content md5, content type, date and
/// resource, newline separated. GET/DELETE requests leave md5/type empty.
pub fn string_to_sign(
    method: &str,
    content_md5: &str,
    content_type: &str,
    date: &str,
    resource: &str,
) -> String {
    format!("{}\n{}\n{}\n{}\n{}", method, content_md5, content_type, date, resource)
}

pub fn sign(secret: &str, string_to_sign: &str) -> Result<String> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow!("Invalid signing key: {}", e))?;
    mac.update(string_to_sign.as_bytes());
    Ok(B64.encode(mac.finalize().into_bytes()))
}
