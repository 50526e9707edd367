// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Native-coin transfers carried by a transaction's own `value` field
//!
//! Value moved by internal calls is not covered here; see
//! [`capture_internal_calls`](crate::capture_internal_calls).

use std::str::FromStr;

use alloy_primitives::{Address, U256};

use crate::errors::DecodeError;
use crate::types::chain::TransactionData;
use crate::types::transfer::TransferRecord;

/// Extract the native transfer of a transaction, if any.
///
/// Returns an empty vector when `value` is zero and a single record with
/// `token_address = None` otherwise.
///
/// # Errors
///
/// [`DecodeError::MissingRecipient`] when a contract creation carries value.
/// Use [`extract_native_transfer_with_created`] when the created address is
/// known.
pub fn extract_native_transfer(tx: &TransactionData) -> Result<Vec<TransferRecord>, DecodeError> {
    extract_native_transfer_with_created(tx, None)
}

/// Like [`extract_native_transfer`], crediting `created` when the
/// transaction has no `to`.
pub fn extract_native_transfer_with_created(
    tx: &TransactionData,
    created: Option<Address>,
) -> Result<Vec<TransferRecord>, DecodeError> {
    if tx.value.is_zero() {
        return Ok(Vec::new());
    }
    let to = tx
        .to
        .or(created)
        .ok_or_else(|| DecodeError::MissingRecipient {
            tx_hash: tx.hash.to_string(),
        })?;
    Ok(vec![TransferRecord::native(tx.from, to, tx.value)])
}

/// Extract a native transfer from hex-encoded fields.
///
/// Both addresses are validated with [`parse_address`].
pub fn extract_native_transfer_from_hex(
    from: &str,
    to: &str,
    value: U256,
) -> Result<Vec<TransferRecord>, DecodeError> {
    let from = parse_address(from)?;
    let to = parse_address(to)?;
    if value.is_zero() {
        return Ok(Vec::new());
    }
    Ok(vec![TransferRecord::native(from, to, value)])
}

/// Parse a hex address, rejecting anything that is not exactly 20 bytes.
///
/// All-lowercase and all-uppercase input is accepted as is; mixed-case input
/// must carry a valid EIP-55 checksum.
///
/// # Examples
///
/// ```
/// use evm_indexer::parse_address;
///
/// assert!(parse_address("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").is_ok());
/// assert!(parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").is_ok());
/// assert!(parse_address("0xA0B86991c6218b36c1d19D4a2e9Eb0cE3606eB48").is_err());
/// assert!(parse_address("0x1234").is_err());
/// ```
pub fn parse_address(input: &str) -> Result<Address, DecodeError> {
    let hex = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);

    if hex.len() != 40 {
        return Err(DecodeError::invalid_address(
            input,
            format!("expected 40 hex characters, got {}", hex.len()),
        ));
    }
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(DecodeError::invalid_address(input, "not hexadecimal"));
    }

    let has_lower = hex.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = hex.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        let prefixed = format!("0x{hex}");
        return Address::parse_checksummed(&prefixed, None)
            .map_err(|e| DecodeError::invalid_address(input, e.to_string()));
    }

    Address::from_str(hex).map_err(|e| DecodeError::invalid_address(input, e.to_string()))
}
