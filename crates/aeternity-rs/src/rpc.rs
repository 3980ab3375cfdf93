//! # aeternity Node Client
//!
//! This module provides the client used to talk to an aeternity node. The node exposes
//! a public API (accounts, chain height, transactions) and an internal API whose debug
//! endpoints compile Sophia source, encode call data, decode results and build
//! unsigned contract transactions.
//!
//! The [`NodeClient`] trait abstracts over both so the deploy and call flows can run
//! against the in-memory mock in tests.
use std::time::Duration;

use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::AeternityHelperError;
use crate::response::{
    AccountResponse, CallDataResponse, CallInfo, CompileResponse, ContractCreateResponse,
    DecodeDataResponse, ErrorResponse, HeightResponse, PostTransactionResponse,
    TransactionInfoResponse, TransactionResponse, UnsignedTxResponse,
};

/// Per-request timeout applied by [`ExternalNodeClient`].
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileRequest {
    pub code: String,
    pub options: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeCallDataRequest {
    pub code: String,
    pub function: String,
    pub arg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeDataRequest {
    #[serde(rename = "sophia-type")]
    pub sophia_type: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCreateRequest {
    pub owner_id: String,
    pub code: String,
    pub call_data: String,
    pub vm_version: u32,
    pub deposit: u64,
    pub amount: u64,
    pub gas: u64,
    pub gas_price: u64,
    pub fee: u64,
    pub ttl: u64,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCallRequest {
    pub caller_id: String,
    pub contract_id: String,
    pub call_data: String,
    pub abi_version: u32,
    pub amount: u64,
    pub gas: u64,
    pub gas_price: u64,
    pub fee: u64,
    pub ttl: u64,
    pub nonce: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PostTransactionRequest<'a> {
    tx: &'a str,
}

/// Interface for the node operations the harness needs.
#[async_trait::async_trait]
pub trait NodeClient: Send + Sync {
    async fn compile(&self, request: &CompileRequest)
        -> Result<CompileResponse, AeternityHelperError>;
    async fn encode_call_data(
        &self,
        request: &EncodeCallDataRequest,
    ) -> Result<CallDataResponse, AeternityHelperError>;
    async fn decode_data(
        &self,
        request: &DecodeDataRequest,
    ) -> Result<DecodeDataResponse, AeternityHelperError>;
    async fn create_contract(
        &self,
        request: &ContractCreateRequest,
    ) -> Result<ContractCreateResponse, AeternityHelperError>;
    async fn call_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<UnsignedTxResponse, AeternityHelperError>;
    async fn get_account(&self, account_id: &str)
        -> Result<AccountResponse, AeternityHelperError>;
    async fn get_current_height(&self) -> Result<u64, AeternityHelperError>;
    async fn post_transaction(&self, signed_tx: &str) -> Result<String, AeternityHelperError>;
    async fn get_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<TransactionResponse, AeternityHelperError>;
    async fn get_transaction_info(&self, tx_hash: &str) -> Result<CallInfo, AeternityHelperError>;
}

/// HTTP implementation of [`NodeClient`].
pub struct ExternalNodeClient {
    client: Client,
    node_url: Url,
    internal_url: Url,
}

fn parse_base_url(url: &str) -> Result<Url, AeternityHelperError> {
    let mut parsed = Url::parse(url).map_err(|e| {
        AeternityHelperError::InvalidArgument(format!("Invalid node url '{}': {}", url, e))
    })?;
    // Url::join drops the last path segment unless it ends with '/'
    if !parsed.path().ends_with('/') {
        let path = format!("{}/", parsed.path());
        parsed.set_path(&path);
    }
    Ok(parsed)
}

impl ExternalNodeClient {
    /// Creates a client for the given public and internal base URLs.
    ///
    /// # Errors
    ///
    /// Returns `AeternityHelperError::InvalidArgument` if a URL does not parse and
    /// `AeternityHelperError::NetworkRequestFailed` if the HTTP client cannot be built.
    pub fn new(node_url: &str, internal_url: &str) -> Result<Self, AeternityHelperError> {
        let client = Client::builder()
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                AeternityHelperError::NetworkRequestFailed(format!(
                    "Failed to create client: {}",
                    e
                ))
            })?;

        Ok(Self {
            client,
            node_url: parse_base_url(node_url)?,
            internal_url: parse_base_url(internal_url)?,
        })
    }

    pub fn node_url(&self) -> &Url {
        &self.node_url
    }

    pub fn internal_url(&self) -> &Url {
        &self.internal_url
    }

    fn endpoint(base: &Url, path: &str) -> Result<Url, AeternityHelperError> {
        base.join(path).map_err(|e| {
            AeternityHelperError::InvalidArgument(format!("Invalid endpoint '{}': {}", path, e))
        })
    }

    async fn read_json<T: DeserializeOwned>(
        url: &Url,
        response: reqwest::Response,
    ) -> Result<T, AeternityHelperError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.reason)
                .unwrap_or(body);
            return Err(AeternityHelperError::NetworkRequestFailed(format!(
                "Request to {} returned {}: {}",
                url.path(),
                status,
                reason
            )));
        }

        response.json::<T>().await.map_err(|e| {
            AeternityHelperError::NetworkRequestFailed(format!(
                "Malformed response from {}: {}",
                url.path(),
                e
            ))
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AeternityHelperError> {
        debug!(%url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        Self::read_json(&url, response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, AeternityHelperError> {
        debug!(%url, "POST");
        let response = self.client.post(url.clone()).json(body).send().await?;
        Self::read_json(&url, response).await
    }
}

#[async_trait::async_trait]
impl NodeClient for ExternalNodeClient {
    async fn compile(
        &self,
        request: &CompileRequest,
    ) -> Result<CompileResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.internal_url, "v2/debug/contracts/code/compile")?;
        self.post_json(url, request).await
    }

    async fn encode_call_data(
        &self,
        request: &EncodeCallDataRequest,
    ) -> Result<CallDataResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.internal_url, "v2/debug/contracts/code/call")?;
        self.post_json(url, request).await
    }

    async fn decode_data(
        &self,
        request: &DecodeDataRequest,
    ) -> Result<DecodeDataResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.internal_url, "v2/debug/contracts/code/decode-data")?;
        self.post_json(url, request).await
    }

    async fn create_contract(
        &self,
        request: &ContractCreateRequest,
    ) -> Result<ContractCreateResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.internal_url, "v2/debug/contracts/create")?;
        self.post_json(url, request).await
    }

    async fn call_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<UnsignedTxResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.internal_url, "v2/debug/contracts/call")?;
        self.post_json(url, request).await
    }

    async fn get_account(
        &self,
        account_id: &str,
    ) -> Result<AccountResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.node_url, &format!("v2/accounts/{}", account_id))?;
        self.get_json(url).await
    }

    async fn get_current_height(&self) -> Result<u64, AeternityHelperError> {
        let url = Self::endpoint(&self.node_url, "v2/key-blocks/current/height")?;
        let res: HeightResponse = self.get_json(url).await?;
        Ok(res.height)
    }

    async fn post_transaction(&self, signed_tx: &str) -> Result<String, AeternityHelperError> {
        let url = Self::endpoint(&self.node_url, "v2/transactions")?;
        let res: PostTransactionResponse = self
            .post_json(url, &PostTransactionRequest { tx: signed_tx })
            .await?;
        Ok(res.tx_hash)
    }

    async fn get_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<TransactionResponse, AeternityHelperError> {
        let url = Self::endpoint(&self.node_url, &format!("v2/transactions/{}", tx_hash))?;
        self.get_json(url).await
    }

    async fn get_transaction_info(&self, tx_hash: &str) -> Result<CallInfo, AeternityHelperError> {
        let url = Self::endpoint(&self.node_url, &format!("v2/transactions/{}/info", tx_hash))?;
        let res: TransactionInfoResponse = self.get_json(url).await?;
        Ok(res.call_info)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_new_normalizes_base_urls() {
        let client =
            ExternalNodeClient::new("http://localhost:3001", "http://localhost:3001/internal")
                .unwrap();
        assert_eq!(client.node_url().as_str(), "http://localhost:3001/");
        assert_eq!(client.internal_url().as_str(), "http://localhost:3001/internal/");

        let url =
            ExternalNodeClient::endpoint(client.internal_url(), "v2/debug/contracts/create")
                .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:3001/internal/v2/debug/contracts/create"
        );
    }

    #[test]
    fn test_new_rejects_invalid_url() {
        let res = ExternalNodeClient::new("not a url", "http://localhost:3001/internal/");
        assert!(matches!(res, Err(AeternityHelperError::InvalidArgument(_))));
    }

    #[test]
    fn test_decode_request_uses_hyphenated_type_key() {
        let body = serde_json::to_value(DecodeDataRequest {
            sophia_type: "int".to_string(),
            data: "cb_AAAA".to_string(),
        })
        .unwrap();
        assert_eq!(body["sophia-type"], "int");
        assert_eq!(body["data"], "cb_AAAA");
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        // nothing listens on port 1
        let client = ExternalNodeClient::new("http://127.0.0.1:1/", "http://127.0.0.1:1/internal/")
            .unwrap();
        let res = client.get_current_height().await;
        assert!(matches!(
            res,
            Err(AeternityHelperError::NetworkRequestFailed(_))
        ));
    }
}
