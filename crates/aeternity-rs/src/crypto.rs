use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};

use crate::error::AeternityHelperError;

/// Number of checksum bytes appended to base58Check / base64Check payloads.
pub const CHECKSUM_LEN: usize = 4;

pub fn sha256_hash(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// First four bytes of `sha256(sha256(data))`.
pub fn checksum(data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let double = Sha256::digest(Sha256::digest(data));
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&double[..CHECKSUM_LEN]);
    out
}

pub fn generate_seed() -> [u8; 32] {
    rand::random()
}

fn with_checksum(payload: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&checksum(payload));
    bytes
}

fn strip_checksum(bytes: Vec<u8>) -> Result<Vec<u8>, AeternityHelperError> {
    if bytes.len() < CHECKSUM_LEN {
        return Err(AeternityHelperError::EncodingFailed(format!(
            "Payload of {} bytes is too short to carry a checksum",
            bytes.len()
        )));
    }

    let (payload, found) = bytes.split_at(bytes.len() - CHECKSUM_LEN);
    let expected = checksum(payload);
    if found != expected {
        return Err(AeternityHelperError::EncodingFailed(format!(
            "Checksum mismatch: expected {}, found {}",
            hex::encode(expected),
            hex::encode(found)
        )));
    }

    Ok(payload.to_vec())
}

pub fn base58check_encode(payload: &[u8]) -> String {
    bs58::encode(with_checksum(payload)).into_string()
}

pub fn base58check_decode(encoded: &str) -> Result<Vec<u8>, AeternityHelperError> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| AeternityHelperError::EncodingFailed(format!("Invalid base58: {}", e)))?;
    strip_checksum(bytes)
}

pub fn base64check_encode(payload: &[u8]) -> String {
    STANDARD.encode(with_checksum(payload))
}

pub fn base64check_decode(encoded: &str) -> Result<Vec<u8>, AeternityHelperError> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| AeternityHelperError::EncodingFailed(format!("Invalid base64: {}", e)))?;
    strip_checksum(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_double_sha256_prefix() {
        let data = b"aeternity";
        let once = Sha256::digest(data);
        let twice = Sha256::digest(once);
        assert_eq!(checksum(data), twice[..4]);
    }

    #[test]
    fn test_base58check_roundtrip() {
        let payload = sha256_hash(b"contract");
        let encoded = base58check_encode(&payload);
        assert_eq!(base58check_decode(&encoded).unwrap(), payload.to_vec());
    }

    #[test]
    fn test_base58check_rejects_corrupted_checksum() {
        let mut bytes = sha256_hash(b"contract").to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        let encoded = bs58::encode(bytes).into_string();

        let res = base58check_decode(&encoded);
        assert!(matches!(res, Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("Checksum mismatch")));
    }

    #[test]
    fn test_base58check_rejects_invalid_alphabet() {
        // '0', 'O', 'I' and 'l' are not part of the base58 alphabet
        let res = base58check_decode("0OIl");
        assert!(matches!(res, Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("Invalid base58")));
    }

    #[test]
    fn test_short_payload_rejected() {
        let encoded = bs58::encode([1u8, 2]).into_string();
        assert!(base58check_decode(&encoded).is_err());
    }

    #[test]
    fn test_base64check_roundtrip_and_corruption() {
        let payload = b"\x2b\x01some bytecode".to_vec();
        let encoded = base64check_encode(&payload);
        assert_eq!(base64check_decode(&encoded).unwrap(), payload);

        let mut raw = STANDARD.decode(&encoded).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        let corrupted = STANDARD.encode(raw);
        assert!(base64check_decode(&corrupted).is_err());
    }

    #[test]
    fn test_generate_seed_is_random() {
        assert_ne!(generate_seed(), generate_seed());
    }
}
