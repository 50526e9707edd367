// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the evm-indexer library.
//!
//! Each stage has its own error type:
//! - [`DecodeError`] - malformed logs, addresses and trace words
//! - [`RpcError`] - chain data that is absent, unreachable or malformed
//! - [`ExtractionError`] - why a single transaction was excluded
//!
//! [`IndexerError`] wraps all of them for callers that do not need to tell
//! the sources apart.
//!
//! # Example
//!
//! ```rust,ignore
//! use evm_indexer::{EffectsExtractor, RpcError};
//!
//! match extractor.extract_block(number).await {
//!     Ok(effects) => println!("{} transactions", effects.transactions.len()),
//!     Err(e) if e.is_not_found() => println!("block {number} not available yet"),
//!     Err(e) if e.is_transient() => eprintln!("retrying later: {e}"),
//!     Err(e) => return Err(e.into()),
//! }
//! ```

mod decode;
mod extraction;
mod rpc;

pub use decode::DecodeError;
pub use extraction::ExtractionError;
pub use rpc::RpcError;

/// Unified error type for all evm-indexer operations.
///
/// All module-specific error types convert into `IndexerError` via `From`,
/// so `?` propagates them naturally.
#[derive(Debug, thiserror::Error)]
pub enum IndexerError {
    /// Error from decoding chain data.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error from the chain data source.
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Error from transaction extraction.
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}
