//! # Contract Addresses
//!
//! A deployed contract is identified on-chain by a 32-byte id, written in its
//! human-readable form as `ct_<base58check payload>`. [`ContractAddress`] parses that
//! form into a tagged `{prefix, payload}` structure and exposes the raw id as a
//! `0x`-prefixed hex string.
use std::{fmt, str::FromStr};

use crate::{
    encoding::{self, Prefix},
    error::AeternityHelperError,
    DeployedContract,
};

/// Byte length of an aeternity contract (and account) id.
pub const ADDRESS_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractAddress {
    prefix: Prefix,
    payload: String,
    bytes: [u8; ADDRESS_LEN],
}

impl ContractAddress {
    /// Builds the address for a raw 32-byte contract id.
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        let encoded = encoding::encode(Prefix::Contract, &bytes);
        let payload = encoded[Prefix::Contract.as_str().len() + 1..].to_string();
        Self {
            prefix: Prefix::Contract,
            payload,
            bytes,
        }
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    /// The base58Check segment after the separator.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.bytes
    }

    /// Lowercase hex of the raw id, prefixed with `0x`.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.bytes))
    }
}

impl FromStr for ContractAddress {
    type Err = AeternityHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, payload) = encoding::split(s)?;
        if prefix != Prefix::Contract {
            return Err(AeternityHelperError::EncodingFailed(format!(
                "'{}' is not a contract address (prefix '{}')",
                s, prefix
            )));
        }

        let decoded = encoding::decode_payload(prefix, payload)?;
        let bytes: [u8; ADDRESS_LEN] = decoded.as_slice().try_into().map_err(|_| {
            AeternityHelperError::EncodingFailed(format!(
                "Contract address decodes to {} bytes, expected {}",
                decoded.len(),
                ADDRESS_LEN
            ))
        })?;

        Ok(Self {
            prefix,
            payload: payload.to_string(),
            bytes,
        })
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, encoding::SEPARATOR, self.payload)
    }
}

/// Parses a `ct_` address string and returns its raw id as `0x`-prefixed hex.
pub fn decode_address(address: &str) -> Result<String, AeternityHelperError> {
    Ok(address.parse::<ContractAddress>()?.to_hex())
}

/// Returns the deployed contract's raw on-chain id as `0x`-prefixed hex.
pub fn decode_contract_address(contract: &DeployedContract) -> String {
    contract.address().to_hex()
}

/// Inverse of [`decode_address`]: re-encodes a `0x` hex id as a `ct_` address.
pub fn encode_contract_address(hex_id: &str) -> Result<String, AeternityHelperError> {
    let raw = hex::decode(hex_id.trim_start_matches("0x"))
        .map_err(|e| AeternityHelperError::EncodingFailed(format!("Invalid hex id: {}", e)))?;
    let bytes: [u8; ADDRESS_LEN] = raw.as_slice().try_into().map_err(|_| {
        AeternityHelperError::EncodingFailed(format!(
            "Contract id is {} bytes, expected {}",
            raw.len(),
            ADDRESS_LEN
        ))
    })?;
    Ok(ContractAddress::from_bytes(bytes).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto;

    fn sample_address() -> String {
        encoding::encode(Prefix::Contract, &crypto::sha256_hash(b"Frac"))
    }

    #[test]
    fn test_parse_and_hex() {
        let address = sample_address();
        let parsed: ContractAddress = address.parse().unwrap();

        assert_eq!(parsed.prefix(), Prefix::Contract);
        assert_eq!(parsed.to_string(), address);
        assert_eq!(
            parsed.to_hex(),
            format!("0x{}", hex::encode(crypto::sha256_hash(b"Frac")))
        );
        assert_eq!(parsed.to_hex().len(), 2 + ADDRESS_LEN * 2);
    }

    #[test]
    fn test_decode_is_deterministic() {
        let address = sample_address();
        assert_eq!(
            decode_address(&address).unwrap(),
            decode_address(&address).unwrap()
        );
    }

    #[test]
    fn test_roundtrip_through_hex() {
        let address = sample_address();
        let hex_id = decode_address(&address).unwrap();
        assert_eq!(encode_contract_address(&hex_id).unwrap(), address);
    }

    #[test]
    fn test_from_bytes_matches_parse() {
        let bytes = crypto::sha256_hash(b"another");
        let address = ContractAddress::from_bytes(bytes);
        let reparsed: ContractAddress = address.to_string().parse().unwrap();
        assert_eq!(reparsed, address);
        assert_eq!(reparsed.as_bytes(), &bytes);
    }

    #[test]
    fn test_missing_separator() {
        let address = sample_address().replace('_', "");
        let res = decode_address(&address);
        assert!(matches!(res, Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("separator")));
    }

    #[test]
    fn test_corrupted_checksum() {
        let mut raw = crypto::sha256_hash(b"Frac").to_vec();
        raw.extend_from_slice(&crypto::checksum(b"something else"));
        let address = format!("ct_{}", bs58::encode(raw).into_string());

        let res = decode_address(&address);
        assert!(matches!(res, Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("Checksum")));
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        let account = encoding::encode(Prefix::Account, &[3u8; 32]);
        assert!(matches!(
            account.parse::<ContractAddress>(),
            Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("not a contract address")
        ));
    }

    #[test]
    fn test_wrong_length_rejected() {
        let short = encoding::encode(Prefix::Contract, &[3u8; 20]);
        assert!(matches!(
            short.parse::<ContractAddress>(),
            Err(AeternityHelperError::EncodingFailed(msg)) if msg.contains("expected 32")
        ));
    }

    #[test]
    fn test_encode_rejects_bad_hex() {
        assert!(encode_contract_address("0xzz").is_err());
        assert!(encode_contract_address("0x0102").is_err());
    }
}
