use serde_json::Value;

use crate::errors::AppError;

// Reversible encoding of the guest's personal data for plain-text storage.
// This is an encoding, not encryption: no key, no confidentiality.

/// Serializes a personal-info object to JSON and hex-encodes it with a `0x`
/// prefix so the stored form is trivially distinguishable from raw content.
pub fn encode(info: &Value) -> Result<String, AppError> {
    if !info.is_object() {
        return Err(AppError::InvalidPersonalInfo);
    }
    let canonical = serde_json::to_string(info).map_err(|_| AppError::InvalidPersonalInfo)?;
    Ok(format!("0x{}", hex::encode(canonical.as_bytes())))
}

/// Inverts `encode`. Anything that is not a `0x`-prefixed hex string holding
/// UTF-8 JSON is rejected.
pub fn decode(encoded: &str) -> Result<Value, AppError> {
    let body = encoded
        .strip_prefix("0x")
        .ok_or(AppError::InvalidEncryptedPersonalInfo)?;
    let bytes = hex::decode(body).map_err(|_| AppError::InvalidEncryptedPersonalInfo)?;
    let text = String::from_utf8(bytes).map_err(|_| AppError::InvalidEncryptedPersonalInfo)?;
    serde_json::from_str(&text).map_err(|_| AppError::InvalidEncryptedPersonalInfo)
}
