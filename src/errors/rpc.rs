// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced by a [`ChainDataSource`](crate::ChainDataSource).
//!
//! Every failure falls into one of three classes so callers can pick a
//! retry or skip policy without string matching:
//!
//! - **not found**: the node answered but does not have the data yet
//!   ([`RpcError::is_not_found`])
//! - **transient**: the request itself failed ([`RpcError::is_transient`])
//! - **malformed**: the node answered with something we cannot interpret

/// Errors that can occur while fetching chain data.
///
/// # Examples
///
/// ```rust
/// use evm_indexer::RpcError;
///
/// let error = RpcError::TraceNotFound {
///     tx_hash: "0x123...".to_string(),
/// };
/// assert!(error.is_not_found());
/// assert!(!error.is_transient());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Block is not available at the requested height.
    ///
    /// Usually means the block is past the chain tip or the node has not
    /// synced it yet. Callers treat this as "not yet available".
    #[error("Block not found: {block_number}")]
    BlockNotFound {
        /// The block number that wasn't found
        block_number: u64,
    },

    /// Receipt is not available for a transaction.
    #[error("Receipt not found for transaction: {tx_hash}")]
    ReceiptNotFound {
        /// The transaction hash whose receipt wasn't found
        tx_hash: String,
    },

    /// The node has no execution trace for a transaction.
    ///
    /// Pruned nodes and nodes without the `debug` namespace answer this way.
    #[error("Trace not found for transaction: {tx_hash}")]
    TraceNotFound {
        /// The transaction hash whose trace wasn't found
        tx_hash: String,
    },

    /// Could not reach the node or the RPC call failed in transit.
    #[error("Chain connection failed during {operation}")]
    ChainConnectionFailed {
        /// Description of the operation that failed
        operation: String,
        /// The underlying error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to fetch the current block number.
    #[error("Failed to get current block number")]
    GetBlockNumberFailed {
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The call to fetch a block failed.
    ///
    /// Different from [`RpcError::BlockNotFound`]: the request failed, not
    /// the lookup.
    #[error("Failed to fetch block {block_number} details")]
    GetBlockFailed {
        /// The block number we tried to fetch
        block_number: u64,
        /// The underlying provider error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The node answered, but the payload could not be interpreted.
    #[error("Malformed response for {operation}: {details}")]
    MalformedResponse {
        /// Description of the operation whose response was malformed
        operation: String,
        /// What was wrong with it
        details: String,
    },

    /// The configured RPC URL could not be parsed.
    #[error("Invalid provider URL: {0}")]
    ProviderUrlInvalid(String),
}

impl RpcError {
    /// Helper to create a `ChainConnectionFailed` error from any error type.
    pub fn chain_connection_failed(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::ChainConnectionFailed {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockNumberFailed` error from any error type.
    pub fn get_block_number_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        RpcError::GetBlockNumberFailed {
            source: Box::new(source),
        }
    }

    /// Helper to create a `GetBlockFailed` error from any error type.
    pub fn get_block_failed(
        block_number: u64,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RpcError::GetBlockFailed {
            block_number,
            source: Box::new(source),
        }
    }

    /// Helper to create a `MalformedResponse` error.
    pub fn malformed(operation: impl Into<String>, details: impl Into<String>) -> Self {
        RpcError::MalformedResponse {
            operation: operation.into(),
            details: details.into(),
        }
    }

    /// Returns true when the node answered but does not (yet) have the data.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BlockNotFound { .. } | Self::ReceiptNotFound { .. } | Self::TraceNotFound { .. }
        )
    }

    /// Returns true when retrying the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ChainConnectionFailed { .. }
                | Self::GetBlockNumberFailed { .. }
                | Self::GetBlockFailed { .. }
        )
    }
}
