// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Span creation helpers for extraction operations.
//!
//! Telemetry stays out of the business logic: each instrumented operation
//! has a helper here, and the caller attaches the span with
//! [`Instrument`](tracing::Instrument) or enters it for synchronous work.

use alloy_chains::Chain;
use alloy_primitives::{BlockNumber, TxHash};
use tracing::Span;

/// Span for extracting every block in a range.
///
/// Parent: None (root span for this operation)
/// Children: extract_block spans
#[inline]
pub(crate) fn extract_range(
    chain: Chain,
    start_block: BlockNumber,
    end_block: BlockNumber,
) -> Span {
    tracing::info_span!(
        "evm_indexer.extract_range",
        chain_id = %chain,
        start_block = start_block,
        end_block = end_block,
        block_count = block_count(start_block, end_block),
    )
}

/// Number of blocks in `[start_block, end_block]`, saturating at `u64::MAX`.
fn block_count(start_block: BlockNumber, end_block: BlockNumber) -> u64 {
    end_block.saturating_sub(start_block).saturating_add(1)
}

/// Span for extracting one block.
///
/// Parent: extract_range span, or None
/// Children: extract_transaction spans
#[inline]
pub(crate) fn extract_block(chain: Chain, block_number: BlockNumber) -> Span {
    tracing::debug_span!(
        "evm_indexer.extract_block",
        chain_id = %chain,
        block_number = block_number,
    )
}

/// Span for fetching and processing one transaction.
///
/// Parent: extract_block span
/// Children: capture_internal_calls span
#[inline]
pub(crate) fn extract_transaction(tx_hash: TxHash) -> Span {
    tracing::debug_span!("evm_indexer.extract_transaction", tx_hash = %tx_hash)
}

/// Span for interpreting a trace.
///
/// Parent: extract_transaction span
/// Children: None
#[inline]
pub(crate) fn capture_internal_calls(tx_hash: TxHash, steps: usize) -> Span {
    tracing::trace_span!(
        "evm_indexer.capture_internal_calls",
        tx_hash = %tx_hash,
        steps = steps,
    )
}
