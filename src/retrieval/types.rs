// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Extraction results

use alloy_primitives::{BlockNumber, TxHash};
use serde::{Deserialize, Serialize};

use crate::errors::{ExtractionError, RpcError};
use crate::net_change::NetChangeMap;
use crate::types::call::InternalCall;
use crate::types::transfer::TransferRecord;

/// Everything extracted from one transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEffects {
    pub tx_hash: TxHash,
    pub block_number: Option<BlockNumber>,
    /// `false` for reverted transactions, only reported when configured.
    pub success: bool,
    pub erc20_transfers: Vec<TransferRecord>,
    pub native_transfers: Vec<TransferRecord>,
    pub internal_calls: Vec<InternalCall>,
    pub net_changes: NetChangeMap,
}

/// A transaction left out of a block's results, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedTransaction {
    pub tx_hash: TxHash,
    pub reason: String,
    /// The node had no data for it, as opposed to a failed request.
    pub not_found: bool,
}

impl SkippedTransaction {
    pub(crate) fn new(tx_hash: TxHash, error: &ExtractionError) -> Self {
        Self {
            tx_hash,
            reason: error.to_string(),
            not_found: error.is_not_found(),
        }
    }
}

/// Results for one block, in transaction order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEffects {
    pub block_number: BlockNumber,
    pub transactions: Vec<TransactionEffects>,
    pub skipped: Vec<SkippedTransaction>,
}

impl BlockEffects {
    pub fn erc20_transfers(&self) -> impl Iterator<Item = &TransferRecord> {
        self.transactions.iter().flat_map(|tx| &tx.erc20_transfers)
    }

    pub fn native_transfers(&self) -> impl Iterator<Item = &TransferRecord> {
        self.transactions.iter().flat_map(|tx| &tx.native_transfers)
    }

    pub fn internal_calls(&self) -> impl Iterator<Item = &InternalCall> {
        self.transactions.iter().flat_map(|tx| &tx.internal_calls)
    }

    /// Net changes over every internal call in the block.
    pub fn net_changes(&self) -> NetChangeMap {
        self.internal_calls().collect()
    }
}

/// A block that could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableBlock {
    pub block_number: BlockNumber,
    pub reason: String,
    /// The block does not exist yet, as opposed to a failed request.
    pub not_found: bool,
}

impl UnavailableBlock {
    pub(crate) fn new(block_number: BlockNumber, error: &RpcError) -> Self {
        Self {
            block_number,
            reason: error.to_string(),
            not_found: error.is_not_found(),
        }
    }
}

/// Results for a block range, in block order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEffects {
    pub blocks: Vec<BlockEffects>,
    pub unavailable: Vec<UnavailableBlock>,
}

impl RangeEffects {
    pub fn erc20_transfers(&self) -> impl Iterator<Item = &TransferRecord> {
        self.blocks.iter().flat_map(BlockEffects::erc20_transfers)
    }

    pub fn native_transfers(&self) -> impl Iterator<Item = &TransferRecord> {
        self.blocks.iter().flat_map(BlockEffects::native_transfers)
    }

    pub fn internal_calls(&self) -> impl Iterator<Item = &InternalCall> {
        self.blocks.iter().flat_map(BlockEffects::internal_calls)
    }

    pub fn transaction_count(&self) -> usize {
        self.blocks.iter().map(|b| b.transactions.len()).sum()
    }
}
