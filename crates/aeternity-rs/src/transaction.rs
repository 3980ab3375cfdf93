use rlp::RlpStream;

use crate::{
    encoding::{self, Prefix},
    error::AeternityHelperError,
    signer::{Signer, SIGNATURE_LEN},
};

/// RLP object tag of a signed transaction.
pub const SIGNED_TX_TAG: u8 = 11;
pub const SIGNED_TX_VERSION: u8 = 1;

/// An unsigned node-built transaction wrapped together with its signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    signatures: Vec<[u8; SIGNATURE_LEN]>,
    tx: Vec<u8>,
}

impl SignedTransaction {
    /// Decodes an unsigned `tx_` transaction and signs it for `network_id`.
    pub fn sign(
        unsigned_tx: &str,
        signer: &Signer,
        network_id: &str,
    ) -> Result<Self, AeternityHelperError> {
        let tx = encoding::decode(Prefix::Transaction, unsigned_tx).map_err(|e| {
            AeternityHelperError::SigningFailed(format!("Cannot decode unsigned transaction: {}", e))
        })?;
        let signature = signer.sign_transaction(&tx, network_id);

        Ok(Self {
            signatures: vec![signature],
            tx,
        })
    }

    pub fn signatures(&self) -> &[[u8; SIGNATURE_LEN]] {
        &self.signatures
    }

    /// `[tag, version, [signatures], tx]`
    pub fn to_rlp(&self) -> Vec<u8> {
        let mut stream = RlpStream::new_list(4);
        stream.append(&SIGNED_TX_TAG);
        stream.append(&SIGNED_TX_VERSION);
        stream.begin_list(self.signatures.len());
        for signature in &self.signatures {
            stream.append(&signature.to_vec());
        }
        stream.append(&self.tx);
        stream.out().to_vec()
    }

    /// The `tx_` form accepted by the node's transaction endpoint.
    pub fn encode(&self) -> String {
        encoding::encode(Prefix::Transaction, &self.to_rlp())
    }
}
