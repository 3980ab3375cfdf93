//! # aeternity Error Handling
//!
//! This module defines the error types used throughout the aeternity helpers library.
//! Every phase of the deploy-then-call flow (loading, compiling, deploying, address
//! decoding, calling and result decoding) maps onto its own variant so a failing
//! scenario reports which step broke.
use std::{error::Error, fmt, io};

/// Errors that can occur when using the aeternity helpers library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AeternityHelperError {
    /// The requested contract source file does not exist.
    ContractNotFound(String),

    /// Error when a file operation fails or the file is not valid UTF-8.
    FileReadError(String),

    /// Error when the node-side compiler rejects the contract source.
    CompileFailed(String),

    /// Error when the node rejects or never confirms a deployment.
    DeploymentFailed(String),

    /// Error when a prefixed chain identifier cannot be encoded or decoded.
    EncodingFailed(String),

    /// Error when a contract call is rejected, reverts or fails on-chain.
    CallFailed(String),

    /// Error when a call result cannot be decoded as the declared type.
    DecodeFailed(String),

    /// Error when a network request to the node fails.
    NetworkRequestFailed(String),

    /// Error when a signing operation fails.
    SigningFailed(String),

    /// Error when an invalid argument is provided to a function.
    InvalidArgument(String),

    /// Error when a submitted transaction is not included within the polling window.
    TransactionTimeout(String),
}

impl fmt::Display for AeternityHelperError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ContractNotFound(msg) => write!(f, "Contract not found: {}", msg),
            Self::FileReadError(msg) => write!(f, "File read error: {}", msg),
            Self::CompileFailed(msg) => write!(f, "Compilation failed: {}", msg),
            Self::DeploymentFailed(msg) => write!(f, "Deployment failed: {}", msg),
            Self::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            Self::CallFailed(msg) => write!(f, "Contract call failed: {}", msg),
            Self::DecodeFailed(msg) => write!(f, "Result decoding failed: {}", msg),
            Self::NetworkRequestFailed(msg) => write!(f, "Network request failed: {}", msg),
            Self::SigningFailed(msg) => write!(f, "Signing operation failed: {}", msg),
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::TransactionTimeout(msg) => write!(f, "Transaction timed out: {}", msg),
        }
    }
}

impl Error for AeternityHelperError {}

/// Convert IO errors into AeternityHelperError
impl From<io::Error> for AeternityHelperError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::ContractNotFound(err.to_string()),
            _ => Self::FileReadError(format!("File operation failed: {}", err)),
        }
    }
}

/// Convert HTTP client errors into AeternityHelperError
impl From<reqwest::Error> for AeternityHelperError {
    fn from(err: reqwest::Error) -> Self {
        Self::NetworkRequestFailed(err.to_string())
    }
}
