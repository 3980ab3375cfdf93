//! Response bodies returned by the node's public and internal HTTP endpoints.
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompileResponse {
    pub bytecode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallDataResponse {
    pub calldata: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractCreateResponse {
    pub tx: String,
    pub contract_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UnsignedTxResponse {
    pub tx: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccountResponse {
    pub id: String,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeightResponse {
    pub height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostTransactionResponse {
    pub tx_hash: String,
}

/// A transaction as reported by the node. Pending transactions report a
/// `block_height` of `-1`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TransactionResponse {
    pub hash: String,
    pub block_height: i64,
    #[serde(default)]
    pub block_hash: Option<String>,
}

impl TransactionResponse {
    pub fn is_mined(&self) -> bool {
        self.block_height > 0
    }
}

/// Outcome of a contract create or call transaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CallInfo {
    pub caller_id: String,
    pub contract_id: String,
    pub gas_used: u64,
    pub return_type: String,
    pub return_value: String,
    #[serde(default)]
    pub height: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionInfoResponse {
    pub call_info: CallInfo,
}

/// A value decoded by the node-side compiler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodedData {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecodeDataResponse {
    pub data: DecodedData,
}

/// Error body returned by the node on rejected requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorResponse {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pending_transaction() {
        let tx: TransactionResponse = serde_json::from_value(json!({
            "hash": "th_abc",
            "block_height": -1,
            "tx": {}
        }))
        .unwrap();
        assert!(!tx.is_mined());
        assert_eq!(tx.block_hash, None);
    }

    #[test]
    fn test_mined_transaction() {
        let tx: TransactionResponse = serde_json::from_value(json!({
            "hash": "th_abc",
            "block_height": 12,
            "block_hash": "mh_xyz"
        }))
        .unwrap();
        assert!(tx.is_mined());
    }

    #[test]
    fn test_decoded_data_type_field() {
        let res: DecodeDataResponse = serde_json::from_value(json!({
            "data": { "type": "word", "value": 75 }
        }))
        .unwrap();
        assert_eq!(res.data.kind, "word");
        assert_eq!(res.data.value, json!(75));
    }

    #[test]
    fn test_call_info_without_height() {
        let info: TransactionInfoResponse = serde_json::from_value(json!({
            "call_info": {
                "caller_id": "ak_1",
                "contract_id": "ct_1",
                "gas_used": 190,
                "return_type": "ok",
                "return_value": "cb_AAAA"
            }
        }))
        .unwrap();
        assert_eq!(info.call_info.height, 0);
        assert_eq!(info.call_info.return_type, "ok");
    }
}
