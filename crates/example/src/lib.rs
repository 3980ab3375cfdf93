//! Scenario fixtures for the `Frac` contract shipped in `contracts/`.
use std::path::PathBuf;

use aeternity_rs::{
    Abi, AeternityHelperError, CallArguments, CallOptions, ContractLoader, DeployOptions,
    EnvConfigs, GasOptions,
};

pub const FRAC: &str = "Frac";

/// Directory holding the `.aes` sources of this crate.
pub fn contracts_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("contracts")
}

pub fn contract_loader() -> ContractLoader {
    ContractLoader::new(contracts_dir())
}

/// Local devnet node: `http://localhost:3001/`, gas 200000, ttl 55.
pub fn devnet_configs() -> EnvConfigs {
    EnvConfigs::default()
}

/// Devnet configs with the node urls overridden by `AE_NODE_URL` and
/// `AE_INTERNAL_URL` when set.
pub fn configs_from_env() -> EnvConfigs {
    let mut configs = devnet_configs();
    if let Ok(url) = std::env::var("AE_NODE_URL") {
        configs.node_url = url;
    }
    if let Ok(url) = std::env::var("AE_INTERNAL_URL") {
        configs.internal_url = url;
    }
    configs
}

pub fn gas_options(configs: &EnvConfigs) -> GasOptions {
    GasOptions::new(configs.gas)
}

pub fn deploy_options(configs: &EnvConfigs) -> DeployOptions {
    DeployOptions::new(configs.ttl)
}

/// `test()` takes no arguments and attaches no tokens.
pub fn frac_test_args(configs: &EnvConfigs) -> Result<CallArguments, AeternityHelperError> {
    CallArguments::new(Abi::Sophia, "()", CallOptions::new(configs.ttl).with_amount(0))
}
