// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Canonical ERC-20 `Transfer` event definition
//!
//! The `sol!` macro generates `SIGNATURE` (`"Transfer(address,address,uint256)"`)
//! and `SIGNATURE_HASH` (its keccak-256) on the [`SolEvent`](alloy_sol_types::SolEvent)
//! impl, so no hashing happens at runtime:
//!
//! ```rust
//! use alloy_sol_types::SolEvent;
//! use evm_indexer::Transfer;
//!
//! assert_eq!(Transfer::SIGNATURE, "Transfer(address,address,uint256)");
//! ```

use std::fmt::Debug;

use alloy_sol_types::sol;

sol! {
    /// ERC-20 Transfer event
    ///
    /// Emitted when tokens move between addresses, including mints
    /// (`from = 0x0`) and burns (`to = 0x0`). `value` is raw, not adjusted
    /// for decimals.
    event Transfer(address indexed from, address indexed to, uint256 value);
}

impl Debug for Transfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Transfer(from: {}, to: {}, value: {})",
            self.from, self.to, self.value
        )
    }
}
