//! Digest gateway.
//!
//! Every hash that ends up in a reading's audit trail is produced here, so the
//! verification path and the generation path cannot drift apart.
//!
//! ```text
//! quantum:  [u16]            → "n0,n1,…"          → SHA-256 → hex seal
//! cosmic:   sensor snapshot  → canonical string   → SHA-256 → hex cosmic hash
//! ```

use sha2::{Digest, Sha256};

use crate::error::{EntropyError, Result};

/// SHA-256 of `data`, lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    let digest: [u8; 32] = Sha256::digest(data).into();
    hex::encode(digest)
}

/// Decimal values joined with commas, no spaces: `"1,2,3"`.
pub fn join_numbers(numbers: &[u16]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined list back into values.
pub fn parse_numbers(raw: &str) -> Result<Vec<u16>> {
    raw.split(',')
        .map(|part| {
            part.trim().parse::<u16>().map_err(|e| {
                EntropyError::InvalidParameter(format!("bad entropy value '{part}': {e}"))
            })
        })
        .collect()
}

/// Verification seal shown to users for quantum readings.
pub fn verification_seal(numbers: &[u16]) -> String {
    sha256_hex(join_numbers(numbers).as_bytes())
}

/// Decode a hex digest into bytes. Rejects empty and malformed input.
pub fn decode_digest(hex_digest: &str) -> Result<Vec<u8>> {
    let bytes = hex::decode(hex_digest.trim())
        .map_err(|e| EntropyError::InvalidParameter(format!("bad hex digest: {e}")))?;
    if bytes.is_empty() {
        return Err(EntropyError::InvalidParameter("empty hex digest".into()));
    }
    Ok(bytes)
}
