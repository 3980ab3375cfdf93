//! # Contract Calls
//!
//! Typed arguments, raw results and decoded values of contract function calls.
//!
//! A call carries an ABI tag, a Sophia tuple literal with the arguments (`"()"`,
//! `"(1, true)"`) and the transaction options. The raw result returned by the node is
//! decoded by the node-side compiler according to a declared [`SophiaType`] and then
//! checked against that type.
use std::{fmt, str::FromStr};

use num_bigint::BigInt;
use serde_json::Value;

use crate::{
    encoding::{self, Prefix},
    error::AeternityHelperError,
    response::CallInfo,
    Env,
};

pub const DEFAULT_GAS_PRICE: u64 = 1;
pub const DEFAULT_FEE: u64 = 1;

/// Argument and return value encoding convention of a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Abi {
    #[default]
    Sophia,
}

impl Abi {
    pub fn as_str(&self) -> &'static str {
        match self {
            Abi::Sophia => "sophia",
        }
    }

    pub fn abi_version(&self) -> u32 {
        match self {
            Abi::Sophia => 1,
        }
    }
}

impl FromStr for Abi {
    type Err = AeternityHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sophia" => Ok(Abi::Sophia),
            other => Err(AeternityHelperError::InvalidArgument(format!(
                "Unsupported abi '{}'",
                other
            ))),
        }
    }
}

/// Transaction options attached to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    /// Relative ttl in blocks.
    pub ttl: u64,
    /// Tokens transferred to the contract with the call.
    pub amount: u64,
    /// Gas limit; `None` uses the environment's configured gas.
    pub gas: Option<u64>,
    pub gas_price: u64,
    pub fee: u64,
}

impl CallOptions {
    pub fn new(ttl: u64) -> Self {
        Self {
            ttl,
            amount: 0,
            gas: None,
            gas_price: DEFAULT_GAS_PRICE,
            fee: DEFAULT_FEE,
        }
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_gas_price(mut self, gas_price: u64) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_fee(mut self, fee: u64) -> Self {
        self.fee = fee;
        self
    }
}

/// A single function invocation: ABI tag, argument tuple and transaction options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallArguments {
    abi: Abi,
    args: String,
    options: CallOptions,
}

impl CallArguments {
    /// Validates and builds call arguments.
    ///
    /// # Errors
    ///
    /// Returns `AeternityHelperError::InvalidArgument` if `args` is not a parenthesised
    /// tuple literal, or if the ttl or an explicit gas limit is zero.
    pub fn new(abi: Abi, args: &str, options: CallOptions) -> Result<Self, AeternityHelperError> {
        let args = args.trim();
        if !(args.starts_with('(') && args.ends_with(')')) {
            return Err(AeternityHelperError::InvalidArgument(format!(
                "Call arguments must be a tuple literal like \"()\", got '{}'",
                args
            )));
        }
        if options.ttl == 0 {
            return Err(AeternityHelperError::InvalidArgument(
                "Call ttl must be positive".to_string(),
            ));
        }
        if options.gas == Some(0) {
            return Err(AeternityHelperError::InvalidArgument(
                "Call gas must be positive".to_string(),
            ));
        }

        Ok(Self {
            abi,
            args: args.to_string(),
            options,
        })
    }

    pub fn abi(&self) -> Abi {
        self.abi
    }

    pub fn args(&self) -> &str {
        &self.args
    }

    pub fn options(&self) -> &CallOptions {
        &self.options
    }
}

/// Declared type used to decode a call's return value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SophiaType {
    #[default]
    Int,
    Bool,
    String,
    Address,
    /// Any other Sophia type, decoded as raw JSON.
    Other(String),
}

impl SophiaType {
    pub fn as_str(&self) -> &str {
        match self {
            SophiaType::Int => "int",
            SophiaType::Bool => "bool",
            SophiaType::String => "string",
            SophiaType::Address => "address",
            SophiaType::Other(name) => name,
        }
    }
}

impl FromStr for SophiaType {
    type Err = AeternityHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(AeternityHelperError::InvalidArgument(
                "Decode type must not be empty".to_string(),
            )),
            "int" => Ok(SophiaType::Int),
            "bool" => Ok(SophiaType::Bool),
            "string" => Ok(SophiaType::String),
            "address" => Ok(SophiaType::Address),
            other => Ok(SophiaType::Other(other.to_string())),
        }
    }
}

impl fmt::Display for SophiaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call's return value, typed according to the declared [`SophiaType`].
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedResult {
    /// Sophia integers are unbounded.
    Int(BigInt),
    Bool(bool),
    String(String),
    Address(String),
    Other(Value),
}

impl DecodedResult {
    pub fn from_value(declared: &SophiaType, value: Value) -> Result<Self, AeternityHelperError> {
        let mismatch = |value: &Value| {
            AeternityHelperError::DecodeFailed(format!(
                "Expected a value of type {}, got {}",
                declared, value
            ))
        };

        match declared {
            SophiaType::Int => match &value {
                // exact digits are kept for numbers of any size
                Value::Number(n) => n
                    .to_string()
                    .parse::<BigInt>()
                    .map(DecodedResult::Int)
                    .map_err(|_| mismatch(&value)),
                // big integers may come back as decimal strings
                Value::String(s) => s
                    .parse::<BigInt>()
                    .map(DecodedResult::Int)
                    .map_err(|_| mismatch(&value)),
                _ => Err(mismatch(&value)),
            },
            SophiaType::Bool => match &value {
                Value::Bool(b) => Ok(DecodedResult::Bool(*b)),
                // bools are words on the wire
                Value::Number(n) => match n.as_u64() {
                    Some(0) => Ok(DecodedResult::Bool(false)),
                    Some(1) => Ok(DecodedResult::Bool(true)),
                    _ => Err(mismatch(&value)),
                },
                _ => Err(mismatch(&value)),
            },
            SophiaType::String => match value {
                Value::String(s) => Ok(DecodedResult::String(s)),
                other => Err(mismatch(&other)),
            },
            SophiaType::Address => match &value {
                Value::String(s) if is_address(s) => Ok(DecodedResult::Address(s.clone())),
                _ => Err(mismatch(&value)),
            },
            SophiaType::Other(_) => Ok(DecodedResult::Other(value)),
        }
    }

    /// The integer value, if it fits in an `i128`.
    pub fn as_int(&self) -> Option<i128> {
        self.as_big_int().and_then(|v| i128::try_from(v).ok())
    }

    pub fn as_big_int(&self) -> Option<&BigInt> {
        match self {
            DecodedResult::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedResult::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DecodedResult::String(v) | DecodedResult::Address(v) => Some(v),
            _ => None,
        }
    }
}

/// Account or contract id with a valid checksum.
fn is_address(s: &str) -> bool {
    match encoding::split(s) {
        Ok((prefix @ (Prefix::Account | Prefix::Contract), payload)) => {
            encoding::decode_payload(prefix, payload).is_ok()
        }
        _ => false,
    }
}

/// How a contract call terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnType {
    Ok,
    Revert,
    Error,
}

impl FromStr for ReturnType {
    type Err = AeternityHelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ok" => Ok(ReturnType::Ok),
            "revert" => Ok(ReturnType::Revert),
            "error" => Ok(ReturnType::Error),
            other => Err(AeternityHelperError::CallFailed(format!(
                "Unknown return type '{}'",
                other
            ))),
        }
    }
}

/// The raw, not yet decoded, result of a successful call transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResult {
    pub function_name: String,
    pub tx_hash: String,
    pub return_type: ReturnType,
    pub return_value: String,
    pub gas_used: u64,
}

impl CallResult {
    /// Checks the call info reported for `tx_hash` and rejects reverted or failed calls.
    pub fn from_call_info(
        function_name: &str,
        tx_hash: &str,
        info: CallInfo,
    ) -> Result<Self, AeternityHelperError> {
        let return_type: ReturnType = info.return_type.parse()?;
        if return_type != ReturnType::Ok {
            return Err(AeternityHelperError::CallFailed(format!(
                "{} ended with {}: {}",
                function_name, info.return_type, info.return_value
            )));
        }

        Ok(Self {
            function_name: function_name.to_string(),
            tx_hash: tx_hash.to_string(),
            return_type,
            return_value: info.return_value,
            gas_used: info.gas_used,
        })
    }

    /// Decodes the return value as `decode_type`.
    pub async fn decode(
        &self,
        env: &Env,
        decode_type: &SophiaType,
    ) -> Result<DecodedResult, AeternityHelperError> {
        let data = env
            .decode_data(decode_type.as_str(), &self.return_value)
            .await?;
        DecodedResult::from_value(decode_type, data.value)
    }
}
