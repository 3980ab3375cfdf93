//! # Deploy-then-call Harness
//!
//! [`Harness`] bundles the pieces a contract scenario needs: the environment, the
//! owner credential and the contract loader. The credential is handed in by the
//! caller; the harness never looks up wallets on its own.
//!
//! ## Example
//!
//! ```rust,no_run
//! use aeternity_rs::{
//!     dev_wallets, Abi, CallArguments, CallOptions, ContractLoader, DeployOptions, Env,
//!     EnvConfigs, GasOptions, Harness, SophiaType,
//! };
//!
//! # async fn run() -> Result<(), aeternity_rs::AeternityHelperError> {
//! let configs = EnvConfigs::default();
//! let harness = Harness::new(
//!     Env::new(configs.clone())?,
//!     dev_wallets(1).remove(0),
//!     ContractLoader::new("./contracts"),
//! );
//!
//! let frac = harness
//!     .deploy_contract("Frac", GasOptions::new(configs.gas), &DeployOptions::new(configs.ttl))
//!     .await?;
//!
//! let args = CallArguments::new(Abi::Sophia, "()", CallOptions::new(55))?;
//! let value = harness.call_contract(&frac, "test", &args, &SophiaType::Int).await?;
//! # Ok(())
//! # }
//! ```
use tracing::instrument;

use crate::{
    call::{CallArguments, DecodedResult, SophiaType},
    contract::{Contract, DeployOptions, DeployedContract, GasOptions},
    error::AeternityHelperError,
    fs::ContractLoader,
    signer::Signer,
    Env,
};

pub struct Harness {
    env: Env,
    owner: Signer,
    loader: ContractLoader,
}

impl Harness {
    pub fn new(env: Env, owner: Signer, loader: ContractLoader) -> Self {
        Self { env, owner, loader }
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn owner(&self) -> &Signer {
        &self.owner
    }

    /// Loads `<contracts_dir>/<contract_name>.aes`, compiles it and deploys a new instance.
    #[instrument(skip(self, gas, options))]
    pub async fn deploy_contract(
        &self,
        contract_name: &str,
        gas: GasOptions,
        options: &DeployOptions,
    ) -> Result<DeployedContract, AeternityHelperError> {
        let source = self.loader.load(contract_name)?;
        let contract = Contract::compile(&self.env, source, gas).await?;
        contract.deploy(&self.env, &self.owner, options).await
    }

    /// Calls `function_name` as the owner and decodes the result as `decode_type`.
    #[instrument(skip(self, contract, args), fields(contract = %contract.address()))]
    pub async fn call_contract(
        &self,
        contract: &DeployedContract,
        function_name: &str,
        args: &CallArguments,
        decode_type: &SophiaType,
    ) -> Result<DecodedResult, AeternityHelperError> {
        let result = contract
            .call(&self.env, &self.owner, function_name, args)
            .await?;
        result.decode(&self.env, decode_type).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::call::{Abi, CallOptions};
    use crate::mock::{mock_env, MockFileReader, MockNodeClient};
    use crate::{decode_contract_address, dev_wallets, encode_contract_address};
    use serde_json::json;

    const FRAC: &str = "contract Frac =\n  public function test() : int = 75\n";

    fn harness(client: MockNodeClient, source: Result<String, AeternityHelperError>) -> Harness {
        Harness::new(
            mock_env(client),
            dev_wallets(1).remove(0),
            ContractLoader::with_reader("./contracts", Box::new(MockFileReader::new(source))),
        )
    }

    fn call_args() -> CallArguments {
        CallArguments::new(Abi::Sophia, "()", CallOptions::new(55).with_amount(0)).unwrap()
    }

    #[tokio::test]
    async fn test_deploy_then_call() {
        let harness = harness(
            MockNodeClient::new().with_decoded_value(json!(75)),
            Ok(FRAC.to_string()),
        );

        let frac = harness
            .deploy_contract("Frac", GasOptions::new(200_000), &DeployOptions::new(55))
            .await
            .unwrap();
        assert_eq!(frac.name(), "Frac");
        assert_eq!(frac.owner(), harness.owner().account_id());

        let hex_id = decode_contract_address(&frac);
        assert_eq!(
            encode_contract_address(&hex_id).unwrap(),
            frac.address().to_string()
        );

        let value = harness
            .call_contract(&frac, "test", &call_args(), &SophiaType::Int)
            .await
            .unwrap();
        assert_eq!(value.as_int(), Some(75));
    }

    #[tokio::test]
    async fn test_missing_source_stops_before_compiling() {
        let harness = harness(
            MockNodeClient::new(),
            Err(AeternityHelperError::ContractNotFound("Frac.aes".to_string())),
        );
        let res = harness
            .deploy_contract("Frac", GasOptions::new(200_000), &DeployOptions::new(55))
            .await;
        assert!(matches!(res, Err(AeternityHelperError::ContractNotFound(_))));
    }

    #[tokio::test]
    async fn test_declared_type_mismatch() {
        let harness = harness(
            MockNodeClient::new().with_decoded_value(json!("three quarters")),
            Ok(FRAC.to_string()),
        );
        let frac = harness
            .deploy_contract("Frac", GasOptions::new(200_000), &DeployOptions::new(55))
            .await
            .unwrap();

        let res = harness
            .call_contract(&frac, "test", &call_args(), &SophiaType::Int)
            .await;
        assert!(matches!(res, Err(AeternityHelperError::DecodeFailed(_))));
    }

    #[tokio::test]
    async fn test_decode_endpoint_rejection() {
        let harness = harness(
            MockNodeClient::new().with_decode_result(Err(
                AeternityHelperError::NetworkRequestFailed("type error".to_string()),
            )),
            Ok(FRAC.to_string()),
        );
        let frac = harness
            .deploy_contract("Frac", GasOptions::new(200_000), &DeployOptions::new(55))
            .await
            .unwrap();

        let res = harness
            .call_contract(&frac, "test", &call_args(), &SophiaType::String)
            .await;
        assert!(matches!(res, Err(AeternityHelperError::DecodeFailed(msg)) if msg.contains("type error")));
    }
}
