use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Produces the opaque booking identifier: a uniform random code mixed with
/// the current wall-clock millisecond timestamp, run through SHA-256. Called
/// exactly once per booking; collision handling is the storage layer's unique
/// constraint, not this function's.
pub fn generate_hash() -> String {
    let random_code: u32 = rand::thread_rng().gen_range(10_000..20_000);
    let millis = Utc::now().timestamp_millis();
    let digest = Sha256::digest(format!("{random_code}{millis}").as_bytes());
    format!("0x{}", hex::encode(digest))
}
