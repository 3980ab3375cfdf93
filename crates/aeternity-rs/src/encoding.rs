//! # Prefixed Chain Identifiers
//!
//! aeternity identifiers are written as `<prefix>_<payload>`. The prefix names the kind
//! of object and selects the payload encoding: account ids, contract ids and
//! transaction hashes use base58Check, bytecode and serialized transactions use
//! base64Check.
use std::{fmt, str::FromStr};

use crate::{crypto, error::AeternityHelperError};

/// Separator between the prefix and the encoded payload.
pub const SEPARATOR: char = '_';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prefix {
    /// `ak` - account public key
    Account,
    /// `ct` - contract id
    Contract,
    /// `th` - transaction hash
    TxHash,
    /// `cb` - contract bytecode or call data
    ContractBytearray,
    /// `tx` - serialized transaction
    Transaction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PayloadEncoding {
    Base58Check,
    Base64Check,
}

impl Prefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Account => "ak",
            Prefix::Contract => "ct",
            Prefix::TxHash => "th",
            Prefix::ContractBytearray => "cb",
            Prefix::Transaction => "tx",
        }
    }

    fn payload_encoding(&self) -> PayloadEncoding {
        match self {
            Prefix::Account | Prefix::Contract | Prefix::TxHash => PayloadEncoding::Base58Check,
            Prefix::ContractBytearray | Prefix::Transaction => PayloadEncoding::Base64Check,
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Prefix {
    type Err = AeternityHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ak" => Ok(Prefix::Account),
            "ct" => Ok(Prefix::Contract),
            "th" => Ok(Prefix::TxHash),
            "cb" => Ok(Prefix::ContractBytearray),
            "tx" => Ok(Prefix::Transaction),
            other => Err(AeternityHelperError::EncodingFailed(format!(
                "Unknown identifier prefix '{}'",
                other
            ))),
        }
    }
}

/// Splits `<prefix>_<payload>` without decoding the payload.
pub fn split(encoded: &str) -> Result<(Prefix, &str), AeternityHelperError> {
    let (prefix, payload) = encoded.split_once(SEPARATOR).ok_or_else(|| {
        AeternityHelperError::EncodingFailed(format!(
            "Identifier '{}' is missing the '{}' separator",
            encoded, SEPARATOR
        ))
    })?;

    if payload.is_empty() {
        return Err(AeternityHelperError::EncodingFailed(format!(
            "Identifier '{}' has an empty payload",
            encoded
        )));
    }

    Ok((prefix.parse()?, payload))
}

pub fn encode(prefix: Prefix, payload: &[u8]) -> String {
    let body = match prefix.payload_encoding() {
        PayloadEncoding::Base58Check => crypto::base58check_encode(payload),
        PayloadEncoding::Base64Check => crypto::base64check_encode(payload),
    };
    format!("{}{}{}", prefix, SEPARATOR, body)
}

/// Decodes an identifier, requiring it to carry the `expected` prefix.
pub fn decode(expected: Prefix, encoded: &str) -> Result<Vec<u8>, AeternityHelperError> {
    let (prefix, payload) = split(encoded)?;
    if prefix != expected {
        return Err(AeternityHelperError::EncodingFailed(format!(
            "Expected a '{}' identifier, got '{}'",
            expected, prefix
        )));
    }

    decode_payload(prefix, payload)
}

pub(crate) fn decode_payload(
    prefix: Prefix,
    payload: &str,
) -> Result<Vec<u8>, AeternityHelperError> {
    match prefix.payload_encoding() {
        PayloadEncoding::Base58Check => crypto::base58check_decode(payload),
        PayloadEncoding::Base64Check => crypto::base64check_decode(payload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_parse_and_display() {
        for prefix in [
            Prefix::Account,
            Prefix::Contract,
            Prefix::TxHash,
            Prefix::ContractBytearray,
            Prefix::Transaction,
        ] {
            assert_eq!(prefix.to_string().parse::<Prefix>().unwrap(), prefix);
        }
        assert!("ok".parse::<Prefix>().is_err());
    }

    #[test]
    fn test_encode_uses_prefix_specific_encoding() {
        let payload = [7u8; 32];

        let contract = encode(Prefix::Contract, &payload);
        assert!(contract.starts_with("ct_"));
        assert!(!contract.contains('+') && !contract.contains('/'));

        let bytecode = encode(Prefix::ContractBytearray, &payload);
        assert!(bytecode.starts_with("cb_"));
        assert_eq!(
            decode(Prefix::ContractBytearray, &bytecode).unwrap(),
            payload.to_vec()
        );
    }

    #[test]
    fn test_decode_wrong_prefix() {
        let account = encode(Prefix::Account, &[1u8; 32]);
        let res = decode(Prefix::Contract, &account);
        assert!(matches!(res, Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("Expected a 'ct'")));
    }

    #[test]
    fn test_split_errors() {
        assert!(matches!(
            split("ct2Xs9vVv"),
            Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("separator")
        ));
        assert!(matches!(
            split("ct_"),
            Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("empty payload")
        ));
    }
}
