use ed25519_dalek::{Signer as _, SigningKey};
use std::{fmt, str::FromStr};

use crate::{
    crypto,
    encoding::{self, Prefix},
    error::AeternityHelperError,
};

/// Length of an ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// An account public key, written as `ak_<base58check>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub [u8; 32]);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encoding::encode(Prefix::Account, &self.0))
    }
}

impl FromStr for AccountId {
    type Err = AeternityHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = encoding::decode(Prefix::Account, s)?;
        let key: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            AeternityHelperError::EncodingFailed(format!(
                "Account id decodes to {} bytes, expected 32",
                bytes.len()
            ))
        })?;
        Ok(Self(key))
    }
}

/// The key pair that owns deployments and signs transactions.
#[derive(Clone)]
pub struct Signer {
    signing_key: SigningKey,
    account_id: AccountId,
}

impl Signer {
    pub fn new(signing_key: SigningKey) -> Self {
        let account_id = AccountId(*signing_key.verifying_key().as_bytes());
        Self {
            signing_key,
            account_id,
        }
    }

    /// Creates a signer with a freshly generated random key.
    pub fn random() -> Self {
        Self::new(SigningKey::from_bytes(&crypto::generate_seed()))
    }

    /// Accepts either a 32-byte seed or a 64-byte `seed ‖ public key` secret, hex encoded.
    pub fn from_secret_hex(secret: &str) -> Result<Self, AeternityHelperError> {
        let bytes = hex::decode(secret.trim())
            .map_err(|e| AeternityHelperError::SigningFailed(format!("Invalid secret key hex: {}", e)))?;

        let signing_key = match bytes.len() {
            32 => {
                let seed: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
                    AeternityHelperError::SigningFailed("Invalid secret key seed".to_string())
                })?;
                SigningKey::from_bytes(&seed)
            }
            64 => {
                let keypair: [u8; 64] = bytes.as_slice().try_into().map_err(|_| {
                    AeternityHelperError::SigningFailed("Invalid secret key pair".to_string())
                })?;
                SigningKey::from_keypair_bytes(&keypair).map_err(|e| {
                    AeternityHelperError::SigningFailed(format!("Inconsistent key pair: {}", e))
                })?
            }
            other => {
                return Err(AeternityHelperError::SigningFailed(format!(
                    "Secret key must be 32 or 64 bytes, got {}",
                    other
                )))
            }
        };

        Ok(Self::new(signing_key))
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Signs `network_id ‖ tx_bytes`, binding the signature to one network.
    pub fn sign_transaction(&self, tx_bytes: &[u8], network_id: &str) -> [u8; SIGNATURE_LEN] {
        let mut message = Vec::with_capacity(network_id.len() + tx_bytes.len());
        message.extend_from_slice(network_id.as_bytes());
        message.extend_from_slice(tx_bytes);
        self.signing_key.sign(&message).to_bytes()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("account_id", &self.account_id.to_string())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Signer {
    fn eq(&self, other: &Self) -> bool {
        self.account_id == other.account_id
    }
}

/// Deterministic development wallets, the same `n` keys on every run.
pub fn dev_wallets(n: usize) -> Vec<Signer> {
    (0..n)
        .map(|i| {
            let seed = crypto::sha256_hash(format!("aeternity-rs dev wallet {}", i).as_bytes());
            Signer::new(SigningKey::from_bytes(&seed))
        })
        .collect()
}
