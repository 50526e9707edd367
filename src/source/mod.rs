// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain data sources
//!
//! The extractors never talk to a node directly. They consume a
//! [`ChainDataSource`], which hands out blocks, receipts and traces as plain
//! records. [`AlloyChainDataSource`] implements it over any alloy provider;
//! tests implement it in memory.
//!
//! Absence is an error value, never an empty result: a missing receipt is
//! [`RpcError::ReceiptNotFound`], which callers can tell apart from "no
//! transfers found".

mod node;

pub use node::AlloyChainDataSource;

use alloy_primitives::{BlockNumber, TxHash};
use async_trait::async_trait;

use crate::errors::RpcError;
use crate::trace::steps::StructLogTrace;
use crate::types::chain::{BlockData, ReceiptData};

/// Read access to chain data needed for extraction.
///
/// # Thread Safety
///
/// Implementations are shared across concurrently running extractions and
/// must be `Send + Sync`.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// A block with full transaction bodies.
    ///
    /// [`RpcError::BlockNotFound`] when the block is not available yet.
    async fn get_block(&self, block_number: BlockNumber) -> Result<BlockData, RpcError>;

    /// The receipt of a mined transaction, including its logs.
    ///
    /// [`RpcError::ReceiptNotFound`] when the node has no receipt.
    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<ReceiptData, RpcError>;

    /// The struct-log trace of a transaction's full execution.
    ///
    /// [`RpcError::TraceNotFound`] when the node cannot produce one.
    async fn get_trace(&self, tx_hash: TxHash) -> Result<StructLogTrace, RpcError>;

    /// The current chain head.
    async fn get_latest_block_number(&self) -> Result<BlockNumber, RpcError>;
}
