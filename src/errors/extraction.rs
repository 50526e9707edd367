// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors for the per-transaction extraction pipeline.

use super::{DecodeError, RpcError};

/// Errors that exclude a single transaction from the results.
///
/// A block-level extraction never aborts on these; the transaction is
/// recorded as skipped together with this error's message.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// Receipt or trace could not be fetched.
    #[error("Chain data unavailable: {0}")]
    Rpc(#[from] RpcError),

    /// Transaction-level fields could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The receipt does not belong to the transaction it was paired with.
    #[error("Receipt {receipt_tx_hash} does not match transaction {tx_hash}")]
    ReceiptMismatch {
        /// Hash of the transaction being processed
        tx_hash: String,
        /// Hash recorded in the receipt
        receipt_tx_hash: String,
    },

    /// The transaction reverted and failed transactions are excluded.
    #[error("Transaction {tx_hash} reverted")]
    Reverted {
        /// Hash of the reverted transaction
        tx_hash: String,
    },
}

impl ExtractionError {
    /// Create a `Reverted` error.
    pub fn reverted(tx_hash: impl std::fmt::Display) -> Self {
        ExtractionError::Reverted {
            tx_hash: tx_hash.to_string(),
        }
    }

    /// Returns true when the transaction was excluded because chain data was
    /// absent, as opposed to a failed request.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rpc(e) if e.is_not_found())
    }
}
