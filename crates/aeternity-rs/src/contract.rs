use tracing::{info, instrument};

use crate::{
    address::ContractAddress,
    call::{CallArguments, CallResult, DEFAULT_FEE, DEFAULT_GAS_PRICE},
    error::AeternityHelperError,
    fs::ContractSource,
    rpc::{ContractCallRequest, ContractCreateRequest},
    signer::{AccountId, Signer},
    transaction::SignedTransaction,
    Env,
};

const INIT_FUNCTION_NAME: &str = "init";
const DEFAULT_VM_VERSION: u32 = 1;

/// Resource bound forwarded to compilation and contract execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasOptions {
    pub gas: u64,
}

impl GasOptions {
    pub fn new(gas: u64) -> Self {
        Self { gas }
    }
}

/// Options of the contract create transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    /// Relative ttl in blocks.
    pub ttl: u64,
    pub deposit: u64,
    pub amount: u64,
    pub gas_price: u64,
    pub fee: u64,
    pub vm_version: u32,
    /// Tuple literal passed to the contract's `init` function.
    pub init_args: String,
}

impl DeployOptions {
    pub fn new(ttl: u64) -> Self {
        Self {
            ttl,
            deposit: 0,
            amount: 0,
            gas_price: DEFAULT_GAS_PRICE,
            fee: DEFAULT_FEE,
            vm_version: DEFAULT_VM_VERSION,
            init_args: "()".to_string(),
        }
    }

    pub fn with_deposit(mut self, deposit: u64) -> Self {
        self.deposit = deposit;
        self
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_init_args(mut self, init_args: &str) -> Self {
        self.init_args = init_args.trim().to_string();
        self
    }

    fn validate(&self) -> Result<(), AeternityHelperError> {
        if self.ttl == 0 {
            return Err(AeternityHelperError::InvalidArgument(
                "Deploy ttl must be positive".to_string(),
            ));
        }
        if !(self.init_args.starts_with('(') && self.init_args.ends_with(')')) {
            return Err(AeternityHelperError::InvalidArgument(format!(
                "init arguments must be a tuple literal, got '{}'",
                self.init_args
            )));
        }
        Ok(())
    }
}

/// Wraps every failure after compilation into a single deployment error.
fn deployment_error(err: AeternityHelperError) -> AeternityHelperError {
    match err {
        AeternityHelperError::DeploymentFailed(_) | AeternityHelperError::InvalidArgument(_) => err,
        other => AeternityHelperError::DeploymentFailed(other.to_string()),
    }
}

fn call_error(err: AeternityHelperError) -> AeternityHelperError {
    match err {
        AeternityHelperError::CallFailed(_) | AeternityHelperError::InvalidArgument(_) => err,
        other => AeternityHelperError::CallFailed(other.to_string()),
    }
}

/// A compiled contract, ready to be deployed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    source: ContractSource,
    bytecode: String,
    gas: GasOptions,
}

impl Contract {
    /// Compiles `source` with the node-side compiler.
    ///
    /// # Errors
    ///
    /// Returns `AeternityHelperError::CompileFailed` if the compiler rejects the source
    /// or cannot be reached.
    pub async fn compile(
        env: &Env,
        source: ContractSource,
        gas: GasOptions,
    ) -> Result<Self, AeternityHelperError> {
        if gas.gas == 0 {
            return Err(AeternityHelperError::InvalidArgument(
                "gas must be positive".to_string(),
            ));
        }
        let bytecode = env.compile(&source.code).await?;
        Ok(Self {
            source,
            bytecode,
            gas,
        })
    }

    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn bytecode(&self) -> &str {
        &self.bytecode
    }

    pub fn gas(&self) -> GasOptions {
        self.gas
    }

    /// Deploys a new instance of the contract owned by `owner`.
    ///
    /// Every call creates a new on-chain instance at a new address.
    ///
    /// # Errors
    ///
    /// Returns `AeternityHelperError::DeploymentFailed` if the node rejects the create
    /// transaction, the `init` call fails or the transaction is not mined in time.
    #[instrument(skip_all, fields(contract = %self.source.name, owner = %owner.account_id()))]
    pub async fn deploy(
        &self,
        env: &Env,
        owner: &Signer,
        options: &DeployOptions,
    ) -> Result<DeployedContract, AeternityHelperError> {
        options.validate()?;
        let owner_id = owner.account_id();

        let call_data = env
            .encode_call_data(&self.bytecode, INIT_FUNCTION_NAME, &options.init_args)
            .await
            .map_err(deployment_error)?;
        let nonce = env
            .next_nonce(&owner_id.to_string())
            .await
            .map_err(deployment_error)?;
        let ttl = env
            .absolute_ttl(options.ttl)
            .await
            .map_err(deployment_error)?;

        let request = ContractCreateRequest {
            owner_id: owner_id.to_string(),
            code: self.bytecode.clone(),
            call_data,
            vm_version: options.vm_version,
            deposit: options.deposit,
            amount: options.amount,
            gas: self.gas.gas,
            gas_price: options.gas_price,
            fee: options.fee,
            ttl,
            nonce,
        };
        let created = env.create_contract(&request).await.map_err(deployment_error)?;
        let address: ContractAddress = created.contract_id.parse().map_err(deployment_error)?;

        let signed = SignedTransaction::sign(&created.tx, owner, env.network_id())
            .map_err(deployment_error)?;
        let mined = env.send_transaction(&signed).await.map_err(deployment_error)?;

        // the create transaction also runs `init`
        let info = env.get_call_info(&mined.hash).await.map_err(deployment_error)?;
        if info.return_type != "ok" {
            return Err(AeternityHelperError::DeploymentFailed(format!(
                "{} init ended with {}: {}",
                self.source.name, info.return_type, info.return_value
            )));
        }

        info!(%address, tx_hash = %mined.hash, block_height = mined.block_height, "contract deployed");

        Ok(DeployedContract {
            name: self.source.name.clone(),
            address,
            owner: owner_id,
            tx_hash: mined.hash,
            bytecode: self.bytecode.clone(),
            gas: self.gas,
        })
    }
}

/// Handle to a contract instance living on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    name: String,
    address: ContractAddress,
    owner: AccountId,
    tx_hash: String,
    bytecode: String,
    gas: GasOptions,
}

impl DeployedContract {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &ContractAddress {
        &self.address
    }

    pub fn owner(&self) -> AccountId {
        self.owner
    }

    /// Hash of the create transaction.
    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    pub fn bytecode(&self) -> &str {
        &self.bytecode
    }

    /// Submits a call transaction for `function_name` and waits for its result.
    ///
    /// The call is a real transaction and may change contract state.
    ///
    /// # Errors
    ///
    /// Returns `AeternityHelperError::CallFailed` if the node rejects the call, the
    /// call reverts or errors, or the transaction is not mined in time.
    #[instrument(skip_all, fields(contract = %self.address, function = function_name))]
    pub async fn call(
        &self,
        env: &Env,
        caller: &Signer,
        function_name: &str,
        args: &CallArguments,
    ) -> Result<CallResult, AeternityHelperError> {
        let caller_id = caller.account_id().to_string();
        let options = args.options();

        let call_data = env
            .encode_call_data(&self.bytecode, function_name, args.args())
            .await
            .map_err(call_error)?;
        let nonce = env.next_nonce(&caller_id).await.map_err(call_error)?;
        let ttl = env.absolute_ttl(options.ttl).await.map_err(call_error)?;

        let request = ContractCallRequest {
            caller_id,
            contract_id: self.address.to_string(),
            call_data,
            abi_version: args.abi().abi_version(),
            amount: options.amount,
            gas: options.gas.unwrap_or(self.gas.gas),
            gas_price: options.gas_price,
            fee: options.fee,
            ttl,
            nonce,
        };
        let unsigned = env.call_contract(&request).await.map_err(call_error)?;

        let signed =
            SignedTransaction::sign(&unsigned, caller, env.network_id()).map_err(call_error)?;
        let mined = env.send_transaction(&signed).await.map_err(call_error)?;
        let info = env.get_call_info(&mined.hash).await.map_err(call_error)?;

        let result = CallResult::from_call_info(function_name, &mined.hash, info)?;
        info!(tx_hash = %result.tx_hash, gas_used = result.gas_used, "contract called");
        Ok(result)
    }
}
