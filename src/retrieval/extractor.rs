// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Block and range extraction over a [`ChainDataSource`]
//!
//! [`EffectsExtractor`] fetches blocks, receipts and traces and runs
//! [`extract_transaction_effects`] on each transaction.
//!
//! # Usage
//!
//! ```ignore
//! use evm_indexer::{create_http_provider, AlloyChainDataSource, EffectsExtractor, ProviderConfig};
//! use alloy_chains::Chain;
//!
//! let provider = create_http_provider(ProviderConfig::local_node("http://localhost:8545"))?;
//! let source = AlloyChainDataSource::connect(provider).await?;
//! let chain = Chain::from_id(source.chain_id());
//! let extractor = EffectsExtractor::new(source, chain);
//!
//! let effects = extractor.extract_block(19_000_000).await?;
//! for transfer in effects.erc20_transfers() {
//!     println!("{transfer}");
//! }
//! ```
//!
//! The extractor automatically handles:
//! - Bounding requests in flight to the configured concurrency
//! - Per-request timeouts
//! - Error recovery (skips unavailable transactions and blocks and reports them)

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy_chains::Chain;
use alloy_primitives::BlockNumber;
use futures::stream::{self, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn, Instrument};

use crate::config::IndexerConfig;
use crate::errors::{ExtractionError, RpcError};
use crate::source::ChainDataSource;
use crate::tracing::spans;
use crate::types::chain::TransactionData;

use super::effects::extract_transaction_effects;
use super::types::{
    BlockEffects, RangeEffects, SkippedTransaction, TransactionEffects, UnavailableBlock,
};

/// Extracts transaction effects from a chain data source.
///
/// Cloning is cheap and clones share the same source and request budget.
pub struct EffectsExtractor<S: ChainDataSource> {
    source: Arc<S>,
    chain: Chain,
    config: IndexerConfig,
    permits: Arc<Semaphore>,
}

impl<S: ChainDataSource> Clone for EffectsExtractor<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            chain: self.chain,
            config: self.config.clone(),
            permits: Arc::clone(&self.permits),
        }
    }
}

impl<S: ChainDataSource> EffectsExtractor<S> {
    /// Create a new extractor with default configuration
    pub fn new(source: S, chain: impl Into<Chain>) -> Self {
        Self::with_config(source, chain, IndexerConfig::default())
    }

    /// Create a new extractor with custom configuration
    pub fn with_config(source: S, chain: impl Into<Chain>, config: IndexerConfig) -> Self {
        Self::from_shared(Arc::new(source), chain, config)
    }

    /// Create an extractor over a source that is also used elsewhere
    pub fn from_shared(source: Arc<S>, chain: impl Into<Chain>, config: IndexerConfig) -> Self {
        let chain = chain.into();
        let permits = Arc::new(Semaphore::new(config.get_max_concurrency(chain).get()));
        Self {
            source,
            chain,
            config,
            permits,
        }
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn config(&self) -> &IndexerConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn concurrency(&self) -> usize {
        self.config.get_max_concurrency(self.chain).get()
    }

    fn timeout(&self) -> Duration {
        self.config.get_rpc_timeout(self.chain)
    }

    /// Run one chain data request under the concurrency bound and timeout.
    async fn fetch<T, F>(&self, operation: String, request: F) -> Result<T, RpcError>
    where
        F: Future<Output = Result<T, RpcError>>,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| RpcError::chain_connection_failed(operation.clone(), e))?;

        match tokio::time::timeout(self.timeout(), request).await {
            Ok(result) => result,
            Err(elapsed) => Err(RpcError::chain_connection_failed(operation, elapsed)),
        }
    }

    /// Fetch receipt and trace for one transaction and extract its effects.
    ///
    /// The trace is only requested once the receipt shows the transaction
    /// is to be reported.
    ///
    /// # Errors
    ///
    /// - [`ExtractionError::Rpc`] when the receipt or trace is unavailable
    /// - [`ExtractionError::Reverted`] when the transaction reverted and
    ///   failed transactions are not included
    /// - [`ExtractionError::ReceiptMismatch`] / [`ExtractionError::Decode`]
    ///   for inconsistent chain data
    pub async fn extract_transaction(
        &self,
        tx: &TransactionData,
    ) -> Result<TransactionEffects, ExtractionError> {
        self.process_transaction(tx)
            .instrument(spans::extract_transaction(tx.hash))
            .await
    }

    async fn process_transaction(
        &self,
        tx: &TransactionData,
    ) -> Result<TransactionEffects, ExtractionError> {
        let tx_hash = tx.hash;

        let receipt = self
            .fetch(
                format!("eth_getTransactionReceipt({tx_hash})"),
                self.source.get_transaction_receipt(tx_hash),
            )
            .await?;

        // Excluded transactions are never traced
        if !receipt.status && !self.config.include_failed {
            return Err(ExtractionError::reverted(tx_hash));
        }

        let trace = self
            .fetch(
                format!("debug_traceTransaction({tx_hash})"),
                self.source.get_trace(tx_hash),
            )
            .await?;

        let effects = extract_transaction_effects(tx, &receipt, &trace, self.config.call_tracking)?;

        debug!(
            erc20_transfers = effects.erc20_transfers.len(),
            native_transfers = effects.native_transfers.len(),
            internal_calls = effects.internal_calls.len(),
            "Extracted transaction effects"
        );

        Ok(effects)
    }

    /// Extract every transaction in a block, in transaction order.
    ///
    /// Transactions that cannot be extracted are listed in
    /// [`BlockEffects::skipped`] instead of failing the block.
    ///
    /// # Errors
    ///
    /// Returns [`RpcError`] only when the block itself is unavailable.
    pub async fn extract_block(&self, block_number: BlockNumber) -> Result<BlockEffects, RpcError> {
        self.process_block(block_number)
            .instrument(spans::extract_block(self.chain, block_number))
            .await
    }

    async fn process_block(&self, block_number: BlockNumber) -> Result<BlockEffects, RpcError> {
        let block = self
            .fetch(
                format!("eth_getBlockByNumber({block_number})"),
                self.source.get_block(block_number),
            )
            .await?;

        let results: Vec<_> = stream::iter(block.transactions.iter())
            .map(|tx| self.extract_transaction(tx))
            .buffered(self.concurrency())
            .collect()
            .await;

        let mut effects = BlockEffects {
            block_number,
            ..Default::default()
        };

        for (tx, result) in block.transactions.iter().zip(results) {
            match result {
                Ok(tx_effects) => effects.transactions.push(tx_effects),
                Err(error @ ExtractionError::Reverted { .. }) => {
                    debug!(tx_hash = %tx.hash, "Skipping reverted transaction");
                    effects.skipped.push(SkippedTransaction::new(tx.hash, &error));
                }
                Err(error) => {
                    warn!(tx_hash = %tx.hash, error = %error, "Skipping transaction");
                    effects.skipped.push(SkippedTransaction::new(tx.hash, &error));
                }
            }
        }

        info!(
            transactions = block.transactions.len(),
            extracted = effects.transactions.len(),
            skipped = effects.skipped.len(),
            "Extracted block"
        );

        Ok(effects)
    }

    /// Extract every block in `[start_block, end_block]`, in block order.
    ///
    /// Unavailable blocks are listed in [`RangeEffects::unavailable`]. An
    /// inverted range yields an empty result.
    pub async fn extract_range(
        &self,
        start_block: BlockNumber,
        end_block: BlockNumber,
    ) -> RangeEffects {
        if start_block > end_block {
            warn!(start_block, end_block, "Empty block range");
            return RangeEffects::default();
        }

        async {
            let results: Vec<_> = stream::iter(start_block..=end_block)
                .map(|block_number| async move {
                    (block_number, self.extract_block(block_number).await)
                })
                .buffered(self.concurrency())
                .collect()
                .await;

            let mut range = RangeEffects::default();
            for (block_number, result) in results {
                match result {
                    Ok(block) => range.blocks.push(block),
                    Err(error) => {
                        warn!(block_number, error = %error, "Skipping unavailable block");
                        range.unavailable.push(UnavailableBlock::new(block_number, &error));
                    }
                }
            }

            info!(
                blocks = range.blocks.len(),
                unavailable = range.unavailable.len(),
                transactions = range.transaction_count(),
                "Extracted block range"
            );

            range
        }
        .instrument(spans::extract_range(self.chain, start_block, end_block))
        .await
    }

    /// Extract the block at the current chain head.
    pub async fn extract_latest(&self) -> Result<BlockEffects, RpcError> {
        let latest = self
            .fetch("eth_blockNumber".to_string(), self.source.get_latest_block_number())
            .await?;
        self.extract_block(latest).await
    }
}
