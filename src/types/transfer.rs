// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Asset movement records

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A single movement of value between two addresses.
///
/// `token_address` is `None` for the chain's native coin and the emitting
/// ERC-20 contract otherwise. The amount is raw, not adjusted for decimals.
///
/// # Examples
///
/// ```
/// use alloy_primitives::{address, U256};
/// use evm_indexer::TransferRecord;
///
/// let record = TransferRecord::native(
///     address!("1111111111111111111111111111111111111111"),
///     address!("2222222222222222222222222222222222222222"),
///     U256::from(500),
/// );
/// assert!(record.is_native());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: Address,
    pub to: Address,
    pub amount: U256,
    pub token_address: Option<Address>,
}

impl TransferRecord {
    /// Record for an ERC-20 `Transfer` emitted by `token`.
    pub const fn erc20(from: Address, to: Address, amount: U256, token: Address) -> Self {
        Self {
            from,
            to,
            amount,
            token_address: Some(token),
        }
    }

    /// Record for a native-coin transfer.
    pub const fn native(from: Address, to: Address, amount: U256) -> Self {
        Self {
            from,
            to,
            amount,
            token_address: None,
        }
    }

    /// Returns true when this record moves the native coin.
    #[must_use]
    pub const fn is_native(&self) -> bool {
        self.token_address.is_none()
    }
}

impl fmt::Display for TransferRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.token_address {
            Some(token) => write!(
                f,
                "{} -> {}: {} of token {}",
                self.from, self.to, self.amount, token
            ),
            None => write!(f, "{} -> {}: {} native", self.from, self.to, self.amount),
        }
    }
}
