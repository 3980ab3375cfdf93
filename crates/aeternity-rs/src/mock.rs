//! In-memory stand-ins for the node and the file system, used by unit tests here and by
//! scenario tests in dependent crates.
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use crate::{
    crypto,
    encoding::{self, Prefix},
    env::{Env, EnvConfigs, PollOptions},
    error::AeternityHelperError,
    fs::FileReader,
    response::{
        AccountResponse, CallDataResponse, CallInfo, CompileResponse, ContractCreateResponse,
        DecodeDataResponse, DecodedData, TransactionResponse, UnsignedTxResponse,
    },
    rpc::{
        CompileRequest, ContractCallRequest, ContractCreateRequest, DecodeDataRequest,
        EncodeCallDataRequest, NodeClient,
    },
};

type MockResult<T> = Option<Result<T, AeternityHelperError>>;

/// A [`NodeClient`] that answers every endpoint locally.
///
/// Each endpoint returns a realistic default unless an override was configured. Nonces
/// advance with every posted transaction and contract ids are derived from owner and
/// nonce, so repeated deployments land at different addresses.
pub struct MockNodeClient {
    compile_result: MockResult<CompileResponse>,
    create_result: MockResult<ContractCreateResponse>,
    call_result: MockResult<UnsignedTxResponse>,
    decode_value: Value,
    decode_result: MockResult<DecodeDataResponse>,
    return_type: String,
    height: u64,
    pending: bool,
    nonce: AtomicU64,
    created: Mutex<Vec<ContractCreateRequest>>,
    called: Mutex<Vec<ContractCallRequest>>,
    posted: Mutex<Vec<String>>,
}

impl Default for MockNodeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNodeClient {
    pub fn new() -> Self {
        Self {
            compile_result: None,
            create_result: None,
            call_result: None,
            decode_value: json!(42),
            decode_result: None,
            return_type: "ok".to_string(),
            height: 1,
            pending: false,
            nonce: AtomicU64::new(0),
            created: Mutex::new(Vec::new()),
            called: Mutex::new(Vec::new()),
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn with_compile_result(
        mut self,
        result: Result<CompileResponse, AeternityHelperError>,
    ) -> Self {
        self.compile_result = Some(result);
        self
    }

    pub fn with_create_result(
        mut self,
        result: Result<ContractCreateResponse, AeternityHelperError>,
    ) -> Self {
        self.create_result = Some(result);
        self
    }

    pub fn with_call_result(
        mut self,
        result: Result<UnsignedTxResponse, AeternityHelperError>,
    ) -> Self {
        self.call_result = Some(result);
        self
    }

    /// Value the decode endpoint reports for any input.
    pub fn with_decoded_value(mut self, value: Value) -> Self {
        self.decode_value = value;
        self
    }

    pub fn with_decode_result(
        mut self,
        result: Result<DecodeDataResponse, AeternityHelperError>,
    ) -> Self {
        self.decode_result = Some(result);
        self
    }

    /// `return_type` reported in the call info of every transaction.
    pub fn with_return_type(mut self, return_type: &str) -> Self {
        self.return_type = return_type.to_string();
        self
    }

    pub fn with_height(mut self, height: u64) -> Self {
        self.height = height;
        self
    }

    /// Posted transactions are never mined.
    pub fn with_pending_transactions(mut self) -> Self {
        self.pending = true;
        self
    }

    pub fn create_requests(&self) -> Vec<ContractCreateRequest> {
        self.created.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn call_requests(&self) -> Vec<ContractCallRequest> {
        self.called.lock().map(|v| v.clone()).unwrap_or_default()
    }

    pub fn posted_transactions(&self) -> Vec<String> {
        self.posted.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn unsigned_tx<T: serde::Serialize>(request: &T) -> String {
        let body = serde_json::to_vec(request).unwrap_or_default();
        encoding::encode(Prefix::Transaction, &body)
    }
}

fn record<T>(log: &Mutex<Vec<T>>, item: T) {
    if let Ok(mut entries) = log.lock() {
        entries.push(item);
    }
}

#[async_trait]
impl NodeClient for MockNodeClient {
    async fn compile(
        &self,
        request: &CompileRequest,
    ) -> Result<CompileResponse, AeternityHelperError> {
        match &self.compile_result {
            Some(res) => res.clone(),
            None => Ok(CompileResponse {
                bytecode: encoding::encode(
                    Prefix::ContractBytearray,
                    &crypto::sha256_hash(request.code.as_bytes()),
                ),
            }),
        }
    }

    async fn encode_call_data(
        &self,
        request: &EncodeCallDataRequest,
    ) -> Result<CallDataResponse, AeternityHelperError> {
        let payload = format!("{}{}", request.function, request.arg);
        Ok(CallDataResponse {
            calldata: encoding::encode(Prefix::ContractBytearray, payload.as_bytes()),
        })
    }

    async fn decode_data(
        &self,
        request: &DecodeDataRequest,
    ) -> Result<DecodeDataResponse, AeternityHelperError> {
        match &self.decode_result {
            Some(res) => res.clone(),
            None => Ok(DecodeDataResponse {
                data: DecodedData {
                    kind: request.sophia_type.clone(),
                    value: self.decode_value.clone(),
                },
            }),
        }
    }

    async fn create_contract(
        &self,
        request: &ContractCreateRequest,
    ) -> Result<ContractCreateResponse, AeternityHelperError> {
        record(&self.created, request.clone());
        match &self.create_result {
            Some(res) => res.clone(),
            None => {
                let seed = format!("{}:{}", request.owner_id, request.nonce);
                Ok(ContractCreateResponse {
                    tx: Self::unsigned_tx(request),
                    contract_id: encoding::encode(
                        Prefix::Contract,
                        &crypto::sha256_hash(seed.as_bytes()),
                    ),
                })
            }
        }
    }

    async fn call_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<UnsignedTxResponse, AeternityHelperError> {
        record(&self.called, request.clone());
        match &self.call_result {
            Some(res) => res.clone(),
            None => Ok(UnsignedTxResponse {
                tx: Self::unsigned_tx(request),
            }),
        }
    }

    async fn get_account(
        &self,
        account_id: &str,
    ) -> Result<AccountResponse, AeternityHelperError> {
        Ok(AccountResponse {
            id: account_id.to_string(),
            nonce: self.nonce.load(Ordering::SeqCst),
        })
    }

    async fn get_current_height(&self) -> Result<u64, AeternityHelperError> {
        Ok(self.height)
    }

    async fn post_transaction(&self, signed_tx: &str) -> Result<String, AeternityHelperError> {
        encoding::decode(Prefix::Transaction, signed_tx)?;
        record(&self.posted, signed_tx.to_string());
        self.nonce.fetch_add(1, Ordering::SeqCst);
        Ok(encoding::encode(
            Prefix::TxHash,
            &crypto::sha256_hash(signed_tx.as_bytes()),
        ))
    }

    async fn get_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<TransactionResponse, AeternityHelperError> {
        Ok(TransactionResponse {
            hash: tx_hash.to_string(),
            block_height: if self.pending {
                -1
            } else {
                self.height as i64 + 1
            },
            block_hash: None,
        })
    }

    async fn get_transaction_info(&self, tx_hash: &str) -> Result<CallInfo, AeternityHelperError> {
        Ok(CallInfo {
            caller_id: String::new(),
            contract_id: String::new(),
            gas_used: 190,
            return_type: self.return_type.clone(),
            return_value: encoding::encode(Prefix::ContractBytearray, tx_hash.as_bytes()),
            height: self.height + 1,
        })
    }
}

/// An [`Env`] backed by `client`, with default configs and near-instant polling.
pub fn mock_env(client: MockNodeClient) -> Env {
    Env {
        node_client: Arc::new(client),
        configs: EnvConfigs::default(),
        poll: PollOptions {
            attempts: 3,
            interval: Duration::from_millis(1),
        },
    }
}

pub struct MockFileReader {
    mock_data: Result<String, AeternityHelperError>,
}

impl MockFileReader {
    pub fn new(mock_data: Result<String, AeternityHelperError>) -> Self {
        Self { mock_data }
    }
}

impl FileReader for MockFileReader {
    fn read_to_string(&self, _path: &std::path::Path) -> Result<String, AeternityHelperError> {
        self.mock_data.clone()
    }
}
