// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-transaction composition of the four extractors
//!
//! Pure: no I/O and no state carried between calls, so transactions can be
//! processed in any order and on any thread.

use crate::errors::ExtractionError;
use crate::events::erc20::decode_erc20_transfers;
use crate::native::extract_native_transfer_with_created;
use crate::net_change::calculate_net_changes;
use crate::trace::interpreter::{capture_internal_calls, CallTracking};
use crate::trace::steps::StructLogTrace;
use crate::tracing::spans;
use crate::types::chain::{ReceiptData, TransactionData};

use super::types::TransactionEffects;

/// Extract all effects of one transaction from already-fetched data.
///
/// - ERC-20 transfers come from the receipt's logs
/// - the native transfer comes from the transaction's value, and is omitted
///   for reverted transactions since the value never moved
/// - internal calls come from the trace, and net changes from those calls
///
/// # Errors
///
/// [`ExtractionError::ReceiptMismatch`] when the receipt belongs to another
/// transaction, [`ExtractionError::Decode`] when a value-carrying contract
/// creation has no created address, or the receipt has no entry address.
pub fn extract_transaction_effects(
    tx: &TransactionData,
    receipt: &ReceiptData,
    trace: &StructLogTrace,
    tracking: CallTracking,
) -> Result<TransactionEffects, ExtractionError> {
    if receipt.transaction_hash != tx.hash {
        return Err(ExtractionError::ReceiptMismatch {
            tx_hash: tx.hash.to_string(),
            receipt_tx_hash: receipt.transaction_hash.to_string(),
        });
    }

    let erc20_transfers = decode_erc20_transfers(&receipt.logs);

    let native_transfers = if receipt.status {
        extract_native_transfer_with_created(tx, receipt.contract_address)?
    } else {
        Vec::new()
    };

    let internal_calls = {
        let span = spans::capture_internal_calls(tx.hash, trace.struct_logs.len());
        let _guard = span.enter();
        capture_internal_calls(receipt, &trace.struct_logs, tracking)?
    };
    let net_changes = calculate_net_changes(&internal_calls);

    Ok(TransactionEffects {
        tx_hash: tx.hash,
        block_number: tx.block_number,
        success: receipt.status,
        erc20_transfers,
        native_transfers,
        internal_calls,
        net_changes,
    })
}
