// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Test helpers for evm-indexer integration tests
//!
//! Provides an in-memory chain data source and builders for transactions,
//! receipts, logs and trace steps, so the pipeline can be tested without a
//! real node.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, BlockNumber, Log, LogData, TxHash, B256, U256};
use alloy_sol_types::SolEvent;
use async_trait::async_trait;
use evm_indexer::{
    BlockData, ChainDataSource, ReceiptData, RpcError, StructLogTrace, TraceStep, TransactionData,
    Transfer,
};

/// In-memory ChainDataSource
///
/// Anything not registered is reported as not found. Optionally delays every
/// request and records the highest number of requests in flight.
///
/// # Example
///
/// ```rust,ignore
/// let tx = transaction(1, SENDER, Some(CONTRACT), 100);
/// let mock = MockChainDataSource::new()
///     .with_block(7, vec![tx.clone()])
///     .with_receipt(receipt(&tx, true, vec![]))
///     .with_trace(tx.hash, vec![]);
///
/// let extractor = EffectsExtractor::new(mock, NamedChain::Mainnet);
/// ```
#[derive(Default)]
pub struct MockChainDataSource {
    blocks: HashMap<BlockNumber, BlockData>,
    receipts: HashMap<TxHash, ReceiptData>,
    traces: HashMap<TxHash, StructLogTrace>,
    latest: BlockNumber,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    requests: AtomicUsize,
}

impl MockChainDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block; the chain head follows the highest block added.
    pub fn with_block(mut self, number: BlockNumber, transactions: Vec<TransactionData>) -> Self {
        self.latest = self.latest.max(number);
        self.blocks.insert(
            number,
            BlockData {
                number,
                transactions,
            },
        );
        self
    }

    pub fn with_receipt(mut self, receipt: ReceiptData) -> Self {
        self.receipts.insert(receipt.transaction_hash, receipt);
        self
    }

    pub fn with_trace(mut self, tx_hash: TxHash, steps: Vec<TraceStep>) -> Self {
        self.traces.insert(tx_hash, StructLogTrace::from_steps(steps));
        self
    }

    /// Register a successful transaction with its receipt and trace in one go.
    pub fn with_transaction(self, tx: &TransactionData, logs: Vec<Log>, steps: Vec<TraceStep>) -> Self {
        self.with_receipt(receipt(tx, true, logs)).with_trace(tx.hash, steps)
    }

    /// Delay every request, so concurrent requests overlap.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Highest number of requests observed in flight at once.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Total number of requests served.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    async fn request<T>(&self, result: Result<T, RpcError>) -> Result<T, RpcError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl ChainDataSource for MockChainDataSource {
    async fn get_block(&self, block_number: BlockNumber) -> Result<BlockData, RpcError> {
        let block = self
            .blocks
            .get(&block_number)
            .cloned()
            .ok_or(RpcError::BlockNotFound { block_number });
        self.request(block).await
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<ReceiptData, RpcError> {
        let receipt = self
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| RpcError::ReceiptNotFound {
                tx_hash: tx_hash.to_string(),
            });
        self.request(receipt).await
    }

    async fn get_trace(&self, tx_hash: TxHash) -> Result<StructLogTrace, RpcError> {
        let trace = self
            .traces
            .get(&tx_hash)
            .cloned()
            .ok_or_else(|| RpcError::TraceNotFound {
                tx_hash: tx_hash.to_string(),
            });
        self.request(trace).await
    }

    async fn get_latest_block_number(&self) -> Result<BlockNumber, RpcError> {
        self.request(Ok(self.latest)).await
    }
}

/// Deterministic transaction hash
pub fn tx_hash(n: u8) -> TxHash {
    B256::repeat_byte(n)
}

pub fn transaction(n: u8, from: Address, to: Option<Address>, value: u64) -> TransactionData {
    TransactionData {
        hash: tx_hash(n),
        block_number: None,
        from,
        to,
        value: U256::from(value),
    }
}

pub fn receipt(tx: &TransactionData, status: bool, logs: Vec<Log>) -> ReceiptData {
    ReceiptData {
        transaction_hash: tx.hash,
        status,
        from: tx.from,
        to: tx.to,
        contract_address: None,
        logs,
    }
}

/// A well-formed ERC-20 Transfer log emitted by `token`.
pub fn transfer_log(token: Address, from: Address, to: Address, amount: u64) -> Log {
    let data = LogData::new_unchecked(
        vec![Transfer::SIGNATURE_HASH, from.into_word(), to.into_word()],
        U256::from(amount).to_be_bytes_vec().into(),
    );
    Log {
        address: token,
        data,
    }
}

/// A CALL-family trace step targeting `to` with `value`.
pub fn call_step(op: &str, to: Address, value: u64) -> TraceStep {
    TraceStep::new(
        op,
        vec![
            "0x0".into(),
            "0x0".into(),
            "0x0".into(),
            "0x0".into(),
            format!("{:#x}", U256::from(value)),
            format!("{to:#x}"),
            "0x2710".into(),
        ],
    )
}
