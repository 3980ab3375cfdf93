use crate::{
    error::AeternityHelperError,
    response::{CallInfo, ContractCreateResponse, DecodedData, TransactionResponse},
    rpc::{
        CompileRequest, ContractCallRequest, ContractCreateRequest, DecodeDataRequest,
        EncodeCallDataRequest, ExternalNodeClient, NodeClient,
    },
    transaction::SignedTransaction,
};
use reqwest::Url;
use std::{fmt, sync::Arc, time::Duration};
use tracing::{debug, info};

/// Static connection parameters of one test run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvConfigs {
    /// Public node API, e.g. `http://localhost:3001/`
    pub node_url: String,
    /// Internal node API serving the debug endpoints
    pub internal_url: String,
    /// Gas limit forwarded to contract creation and calls
    pub gas: u64,
    /// Number of blocks a submitted transaction stays valid
    pub ttl: u64,
    /// Network the transactions are signed for
    pub network_id: String,
}

impl Default for EnvConfigs {
    fn default() -> Self {
        Self {
            node_url: "http://localhost:3001/".to_string(),
            internal_url: "http://localhost:3001/internal/".to_string(),
            gas: 200_000,
            ttl: 55,
            network_id: "ae_devnet".to_string(),
        }
    }
}

impl EnvConfigs {
    pub fn validate(&self) -> Result<(), AeternityHelperError> {
        for (name, value) in [("node_url", &self.node_url), ("internal_url", &self.internal_url)] {
            let url = Url::parse(value).map_err(|e| {
                AeternityHelperError::InvalidArgument(format!("{} '{}': {}", name, value, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AeternityHelperError::InvalidArgument(format!(
                    "{} '{}' must be an http(s) url",
                    name, value
                )));
            }
        }
        if self.gas == 0 {
            return Err(AeternityHelperError::InvalidArgument(
                "gas must be positive".to_string(),
            ));
        }
        if self.ttl == 0 {
            return Err(AeternityHelperError::InvalidArgument(
                "ttl must be positive".to_string(),
            ));
        }
        if self.network_id.is_empty() {
            return Err(AeternityHelperError::InvalidArgument(
                "network_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// How long to wait for a posted transaction to be included in a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollOptions {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            attempts: 30,
            interval: Duration::from_secs(1),
        }
    }
}

#[derive(Clone)]
pub struct Env {
    pub(crate) node_client: Arc<dyn NodeClient>,
    pub(crate) configs: EnvConfigs,
    pub(crate) poll: PollOptions,
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Env")
            .field("configs", &self.configs)
            .field("poll", &self.poll)
            .finish_non_exhaustive()
    }
}

impl Env {
    pub fn new(configs: EnvConfigs) -> Result<Self, AeternityHelperError> {
        configs.validate()?;
        let client = ExternalNodeClient::new(&configs.node_url, &configs.internal_url)?;
        Ok(Self {
            node_client: Arc::new(client),
            configs,
            poll: PollOptions::default(),
        })
    }

    /// Builds an environment on top of any [`NodeClient`] implementation.
    pub fn with_client(
        configs: EnvConfigs,
        node_client: Arc<dyn NodeClient>,
    ) -> Result<Self, AeternityHelperError> {
        configs.validate()?;
        Ok(Self {
            node_client,
            configs,
            poll: PollOptions::default(),
        })
    }

    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    pub fn configs(&self) -> &EnvConfigs {
        &self.configs
    }

    pub fn network_id(&self) -> &str {
        &self.configs.network_id
    }

    pub async fn compile(&self, source: &str) -> Result<String, AeternityHelperError> {
        let request = CompileRequest {
            code: source.to_string(),
            options: String::new(),
        };
        let res = self
            .node_client
            .compile(&request)
            .await
            .map_err(|e| AeternityHelperError::CompileFailed(e.to_string()))?;
        debug!(bytecode_len = res.bytecode.len(), "compiled contract");
        Ok(res.bytecode)
    }

    pub async fn encode_call_data(
        &self,
        bytecode: &str,
        function: &str,
        args: &str,
    ) -> Result<String, AeternityHelperError> {
        let request = EncodeCallDataRequest {
            code: bytecode.to_string(),
            function: function.to_string(),
            arg: args.to_string(),
        };
        self.node_client
            .encode_call_data(&request)
            .await
            .map(|res| res.calldata)
            .map_err(|e| {
                AeternityHelperError::NetworkRequestFailed(format!(
                    "Failed to encode call data for {}{}: {}",
                    function, args, e
                ))
            })
    }

    pub async fn decode_data(
        &self,
        sophia_type: &str,
        data: &str,
    ) -> Result<DecodedData, AeternityHelperError> {
        let request = DecodeDataRequest {
            sophia_type: sophia_type.to_string(),
            data: data.to_string(),
        };
        self.node_client
            .decode_data(&request)
            .await
            .map(|res| res.data)
            .map_err(|e| {
                AeternityHelperError::DecodeFailed(format!(
                    "Node could not decode {} as {}: {}",
                    data, sophia_type, e
                ))
            })
    }

    /// Nonce to use for the next transaction signed by `account_id`.
    pub async fn next_nonce(&self, account_id: &str) -> Result<u64, AeternityHelperError> {
        let account = self.node_client.get_account(account_id).await.map_err(|e| {
            AeternityHelperError::NetworkRequestFailed(format!(
                "Failed to get account {}: {}",
                account_id, e
            ))
        })?;
        Ok(account.nonce + 1)
    }

    /// Converts a relative ttl (in blocks) to the absolute height the node expects.
    pub async fn absolute_ttl(&self, relative_ttl: u64) -> Result<u64, AeternityHelperError> {
        let height = self.node_client.get_current_height().await.map_err(|e| {
            AeternityHelperError::NetworkRequestFailed(format!(
                "Failed to get current height: {}",
                e
            ))
        })?;
        Ok(height + relative_ttl)
    }

    pub async fn create_contract(
        &self,
        request: &ContractCreateRequest,
    ) -> Result<ContractCreateResponse, AeternityHelperError> {
        self.node_client.create_contract(request).await.map_err(|e| {
            AeternityHelperError::NetworkRequestFailed(format!(
                "Failed to build contract create transaction: {}",
                e
            ))
        })
    }

    pub async fn call_contract(
        &self,
        request: &ContractCallRequest,
    ) -> Result<String, AeternityHelperError> {
        self.node_client
            .call_contract(request)
            .await
            .map(|res| res.tx)
            .map_err(|e| {
                AeternityHelperError::NetworkRequestFailed(format!(
                    "Failed to build contract call transaction: {}",
                    e
                ))
            })
    }

    /// Posts a signed transaction and waits until it is included in a block.
    pub async fn send_transaction(
        &self,
        tx: &SignedTransaction,
    ) -> Result<TransactionResponse, AeternityHelperError> {
        let tx_hash = self
            .node_client
            .post_transaction(&tx.encode())
            .await
            .map_err(|e| {
                AeternityHelperError::NetworkRequestFailed(format!(
                    "Failed to send transaction: {}",
                    e
                ))
            })?;
        info!(%tx_hash, "transaction posted");
        self.wait_for_transaction(&tx_hash).await
    }

    pub async fn wait_for_transaction(
        &self,
        tx_hash: &str,
    ) -> Result<TransactionResponse, AeternityHelperError> {
        for attempt in 1..=self.poll.attempts {
            let tx = self.node_client.get_transaction(tx_hash).await.map_err(|e| {
                AeternityHelperError::NetworkRequestFailed(format!(
                    "Failed to get transaction {}: {}",
                    tx_hash, e
                ))
            })?;
            if tx.is_mined() {
                debug!(%tx_hash, block_height = tx.block_height, attempt, "transaction mined");
                return Ok(tx);
            }
            tokio::time::sleep(self.poll.interval).await;
        }

        Err(AeternityHelperError::TransactionTimeout(format!(
            "{} not mined after {} attempts",
            tx_hash, self.poll.attempts
        )))
    }

    pub async fn get_call_info(&self, tx_hash: &str) -> Result<CallInfo, AeternityHelperError> {
        self.node_client
            .get_transaction_info(tx_hash)
            .await
            .map_err(|e| {
                AeternityHelperError::NetworkRequestFailed(format!(
                    "Failed to get call info for {}: {}",
                    tx_hash, e
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{mock_env, MockNodeClient};
    use crate::{dev_wallets, encoding, encoding::Prefix};

    #[test]
    fn test_default_configs_are_valid() {
        let configs = EnvConfigs::default();
        assert!(configs.validate().is_ok());
        assert_eq!(configs.gas, 200_000);
        assert_eq!(configs.ttl, 55);
        assert_eq!(configs.network_id, "ae_devnet");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let cases = [
            EnvConfigs {
                node_url: "localhost:3001".to_string(),
                ..EnvConfigs::default()
            },
            EnvConfigs {
                internal_url: "ftp://localhost/internal/".to_string(),
                ..EnvConfigs::default()
            },
            EnvConfigs {
                gas: 0,
                ..EnvConfigs::default()
            },
            EnvConfigs {
                ttl: 0,
                ..EnvConfigs::default()
            },
            EnvConfigs {
                network_id: String::new(),
                ..EnvConfigs::default()
            },
        ];

        for configs in cases {
            assert!(
                matches!(
                    configs.validate(),
                    Err(AeternityHelperError::InvalidArgument(_))
                ),
                "{:?} should be rejected",
                configs
            );
        }
    }

    #[test]
    fn test_new_validates() {
        let res = Env::new(EnvConfigs {
            gas: 0,
            ..EnvConfigs::default()
        });
        assert!(res.is_err());
        assert!(Env::new(EnvConfigs::default()).is_ok());
    }

    #[tokio::test]
    async fn test_compile_error_is_mapped() {
        let client = MockNodeClient::new().with_compile_result(Err(
            AeternityHelperError::NetworkRequestFailed("parse error at line 3".to_string()),
        ));
        let env = mock_env(client);

        let res = env.compile("contract Broken =").await;
        assert!(matches!(res, Err(AeternityHelperError::CompileFailed(msg)) if msg.contains("line 3")));
    }

    #[tokio::test]
    async fn test_next_nonce_and_absolute_ttl() {
        let client = MockNodeClient::new().with_height(100);
        let env = mock_env(client);
        let account = dev_wallets(1)[0].account_id().to_string();

        assert_eq!(env.next_nonce(&account).await.unwrap(), 1);
        assert_eq!(env.absolute_ttl(55).await.unwrap(), 155);
    }

    #[tokio::test]
    async fn test_wait_for_transaction_times_out() {
        let client = MockNodeClient::new().with_pending_transactions();
        let env = mock_env(client).with_poll_options(PollOptions {
            attempts: 3,
            interval: Duration::from_millis(1),
        });

        let hash = encoding::encode(Prefix::TxHash, &[1u8; 32]);
        let res = env.wait_for_transaction(&hash).await;
        assert!(matches!(res, Err(AeternityHelperError::TransactionTimeout(msg)) if msg.contains("3 attempts")));
    }

    #[tokio::test]
    async fn test_send_transaction_posts_and_waits() {
        let client = Arc::new(MockNodeClient::new());
        let env = Env::with_client(EnvConfigs::default(), client.clone()).unwrap();
        let signer = dev_wallets(1).remove(0);

        let unsigned = encoding::encode(Prefix::Transaction, b"tx body");
        let signed = SignedTransaction::sign(&unsigned, &signer, env.network_id()).unwrap();
        let mined = env.send_transaction(&signed).await.unwrap();

        assert!(mined.is_mined());
        assert_eq!(client.posted_transactions(), vec![signed.encode()]);
    }
}
