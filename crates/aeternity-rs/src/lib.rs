mod address;
mod call;
mod contract;
mod crypto;
pub mod encoding;
mod env;
mod error;
mod fs;
mod harness;
pub mod mock;
pub mod response;
mod rpc;
mod signer;
mod transaction;

pub use address::{
    decode_address, decode_contract_address, encode_contract_address, ContractAddress,
    ADDRESS_LEN,
};
pub use call::{
    Abi, CallArguments, CallOptions, CallResult, DecodedResult, ReturnType, SophiaType,
};
pub use contract::{Contract, DeployOptions, DeployedContract, GasOptions};
pub use env::{Env, EnvConfigs, PollOptions};
pub use error::AeternityHelperError;
pub use fs::{ContractLoader, ContractSource, DefaultFileReader, FileReader};
pub use harness::Harness;
pub use num_bigint::BigInt;
pub use response::{CallInfo, DecodedData, TransactionResponse};
pub use rpc::{
    CompileRequest, ContractCallRequest, ContractCreateRequest, DecodeDataRequest,
    EncodeCallDataRequest, ExternalNodeClient, NodeClient,
};
pub use signer::{dev_wallets, AccountId, Signer};
pub use transaction::SignedTransaction;
