// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Event processing for ERC-20 transfers.
//!
//! This module handles:
//! - The canonical `Transfer` event definition
//! - Decoding `Transfer` logs from a receipt into [`TransferRecord`](crate::TransferRecord)s

pub mod definitions;
pub mod erc20;

pub use definitions::Transfer;
pub use erc20::{decode_erc20_transfer, decode_erc20_transfers};
