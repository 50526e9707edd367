// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Chain data records handed to the extractors.
//!
//! These are the subset of block, transaction and receipt fields the
//! extractors read. A [`ChainDataSource`](crate::ChainDataSource) converts
//! whatever its transport returns into these.

use alloy_primitives::{Address, BlockNumber, Log, TxHash, U256};
use serde::{Deserialize, Serialize};

/// Transaction fields relevant to native-value extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionData {
    pub hash: TxHash,
    pub block_number: Option<BlockNumber>,
    pub from: Address,
    /// `None` for contract creations.
    pub to: Option<Address>,
    pub value: U256,
}

/// Receipt fields relevant to log decoding and trace interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptData {
    pub transaction_hash: TxHash,
    /// `true` when execution succeeded.
    pub status: bool,
    pub from: Address,
    pub to: Option<Address>,
    /// Set for contract creations.
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}

impl ReceiptData {
    /// The contract the outermost call entered.
    ///
    /// This is `to` for calls and the created address for deployments.
    #[must_use]
    pub fn entry_address(&self) -> Option<Address> {
        self.to.or(self.contract_address)
    }
}

/// A block with its full transaction bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockData {
    pub number: BlockNumber,
    pub transactions: Vec<TransactionData>,
}
