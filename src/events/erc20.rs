// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! ERC-20 transfer extraction from receipt logs
//!
//! A log is an ERC-20 transfer iff `topics[0]` is the `Transfer` signature
//! hash and there are exactly three topics (signature plus the two indexed
//! addresses). ERC-721 transfers share the signature but index the token id
//! as a fourth topic, so they never match.
//!
//! # Example
//!
//! ```rust,ignore
//! use evm_indexer::decode_erc20_transfers;
//!
//! let transfers = decode_erc20_transfers(&receipt.logs);
//! for transfer in &transfers {
//!     println!("{transfer}");
//! }
//! ```

use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::SolEvent;
use tracing::warn;

use crate::errors::DecodeError;
use crate::events::definitions::Transfer;
use crate::types::transfer::TransferRecord;

/// Number of topics on an ERC-20 `Transfer` log.
const ERC20_TRANSFER_TOPIC_COUNT: usize = 3;

/// Decode every ERC-20 `Transfer` in a receipt's logs.
///
/// Logs with another signature or topic count are ignored. A matching log
/// whose amount cannot be decoded is skipped with a warning; the remaining
/// logs are still processed.
pub fn decode_erc20_transfers(logs: &[Log]) -> Vec<TransferRecord> {
    logs.iter()
        .enumerate()
        .filter_map(|(index, log)| match decode_erc20_transfer(log) {
            Ok(record) => record,
            Err(error) => {
                warn!(
                    log_index = index,
                    token = %log.address,
                    error = %error,
                    "Skipping malformed Transfer log"
                );
                None
            }
        })
        .collect()
}

/// Decode a single log.
///
/// Returns `Ok(None)` when the log is not an ERC-20 `Transfer`.
///
/// # Errors
///
/// [`DecodeError::InvalidAmount`] when the log matches but its data is not a
/// single big-endian uint256.
pub fn decode_erc20_transfer(log: &Log) -> Result<Option<TransferRecord>, DecodeError> {
    let topics = log.topics();
    if topics.len() != ERC20_TRANSFER_TOPIC_COUNT || topics[0] != Transfer::SIGNATURE_HASH {
        return Ok(None);
    }

    // Indexed addresses are left-padded to 32 bytes; keep the low 20.
    let from = Address::from_word(topics[1]);
    let to = Address::from_word(topics[2]);
    let amount = decode_amount(&log.data.data)?;

    Ok(Some(TransferRecord::erc20(from, to, amount, log.address)))
}

fn decode_amount(data: &[u8]) -> Result<U256, DecodeError> {
    if data.is_empty() {
        return Err(DecodeError::invalid_amount("empty data"));
    }
    U256::try_from_be_slice(data).ok_or_else(|| {
        DecodeError::invalid_amount(format!("{} bytes exceed a uint256", data.len()))
    })
}
