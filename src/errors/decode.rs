// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Errors for decoding chain data into transfer records.
//!
//! These are recovered locally by the extractors: a malformed log or trace
//! step is skipped and its siblings are still processed.

/// Errors that can occur while decoding a log entry, address or trace word.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// An address string was not 20 bytes of hex, or failed its checksum.
    #[error("Invalid address {input:?}: {reason}")]
    InvalidAddress {
        /// The rejected input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// A `Transfer` log carried a data field that is not a single uint256.
    #[error("Invalid transfer amount: {details}")]
    InvalidAmount {
        /// Details about the data field
        details: String,
    },

    /// A trace stack word was not a hex-encoded 256-bit value.
    #[error("Invalid stack word {word:?}")]
    InvalidStackWord {
        /// The rejected word
        word: String,
    },

    /// A value-carrying transaction has no recipient.
    ///
    /// This happens for contract creations when the created address is not
    /// known to the caller.
    #[error("Transaction {tx_hash} moves value but has no recipient")]
    MissingRecipient {
        /// The transaction hash
        tx_hash: String,
    },
}

impl DecodeError {
    /// Create an `InvalidAddress` error.
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create an `InvalidAmount` error.
    pub fn invalid_amount(details: impl Into<String>) -> Self {
        DecodeError::InvalidAmount {
            details: details.into(),
        }
    }
}
