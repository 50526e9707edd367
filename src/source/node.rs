// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! [`ChainDataSource`] backed by an alloy provider

use alloy_consensus::BlockHeader;
use alloy_eips::BlockNumberOrTag;
use alloy_json_rpc::RpcError as JsonRpcError;
use alloy_network::{Ethereum, ReceiptResponse, TransactionResponse};
use alloy_primitives::{BlockNumber, TxHash};
use alloy_provider::Provider;
use alloy_rpc_types::{Transaction, TransactionReceipt, TransactionTrait};
use alloy_transport::TransportError;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use super::ChainDataSource;
use crate::errors::RpcError;
use crate::trace::steps::StructLogTrace;
use crate::types::chain::{BlockData, ReceiptData, TransactionData};

/// Options for geth's default struct logger. Storage and memory are never
/// read, so they are not requested.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructLoggerOptions {
    disable_storage: bool,
    enable_memory: bool,
    enable_return_data: bool,
}

const STRUCT_LOGGER_OPTIONS: StructLoggerOptions = StructLoggerOptions {
    disable_storage: true,
    enable_memory: false,
    enable_return_data: false,
};

/// Chain data from a JSON-RPC node through an alloy [`Provider`].
///
/// Traces require the node to expose `debug_traceTransaction`.
///
/// # Example
///
/// ```rust,ignore
/// use evm_indexer::{create_http_provider, AlloyChainDataSource, ProviderConfig};
///
/// let provider = create_http_provider(ProviderConfig::new("http://localhost:8545"))?;
/// // Fails fast when the node is unreachable
/// let source = AlloyChainDataSource::connect(provider).await?;
/// let block = source.get_block(32_582_884).await?;
/// ```
#[derive(Debug, Clone)]
pub struct AlloyChainDataSource<P> {
    provider: P,
    chain_id: u64,
}

impl<P: Provider<Ethereum>> AlloyChainDataSource<P> {
    /// Wrap `provider` after checking that the node answers.
    ///
    /// # Errors
    ///
    /// [`RpcError::ChainConnectionFailed`] when `eth_chainId` fails.
    pub async fn connect(provider: P) -> Result<Self, RpcError> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| RpcError::chain_connection_failed("eth_chainId", e))?;
        info!(chain_id, "Connected to chain data source");
        Ok(Self { provider, chain_id })
    }

    /// Chain id reported by the node at connection time.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get a reference to the inner provider
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P> ChainDataSource for AlloyChainDataSource<P>
where
    P: Provider<Ethereum> + Send + Sync,
{
    async fn get_block(&self, block_number: BlockNumber) -> Result<BlockData, RpcError> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block_number))
            .full()
            .await
            .map_err(|e| RpcError::get_block_failed(block_number, e))?
            .ok_or(RpcError::BlockNotFound { block_number })?;

        if block.header.number() != block_number {
            return Err(RpcError::malformed(
                format!("eth_getBlockByNumber({block_number})"),
                format!("node returned block {}", block.header.number()),
            ));
        }

        if block.transactions.is_hashes() && !block.transactions.is_empty() {
            return Err(RpcError::malformed(
                format!("eth_getBlockByNumber({block_number})"),
                "node returned transaction hashes instead of bodies",
            ));
        }

        let transactions = block.transactions.txns().map(transaction_data).collect();
        Ok(BlockData {
            number: block_number,
            transactions,
        })
    }

    async fn get_transaction_receipt(&self, tx_hash: TxHash) -> Result<ReceiptData, RpcError> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| {
                RpcError::chain_connection_failed(format!("eth_getTransactionReceipt({tx_hash})"), e)
            })?
            .ok_or_else(|| RpcError::ReceiptNotFound {
                tx_hash: tx_hash.to_string(),
            })?;
        Ok(receipt_data(&receipt))
    }

    async fn get_trace(&self, tx_hash: TxHash) -> Result<StructLogTrace, RpcError> {
        let trace: Option<StructLogTrace> = self
            .provider
            .raw_request(
                "debug_traceTransaction".into(),
                (tx_hash, STRUCT_LOGGER_OPTIONS),
            )
            .await
            .map_err(|e| trace_error(tx_hash, e))?;

        let trace = trace.ok_or_else(|| RpcError::TraceNotFound {
            tx_hash: tx_hash.to_string(),
        })?;
        debug!(tx_hash = %tx_hash, steps = trace.struct_logs.len(), "Fetched trace");
        Ok(trace)
    }

    async fn get_latest_block_number(&self) -> Result<BlockNumber, RpcError> {
        self.provider
            .get_block_number()
            .await
            .map_err(RpcError::get_block_number_failed)
    }
}

fn transaction_data(tx: &Transaction) -> TransactionData {
    TransactionData {
        hash: TransactionResponse::tx_hash(tx),
        block_number: TransactionResponse::block_number(tx),
        from: TransactionResponse::from(tx),
        to: TransactionTrait::to(tx),
        value: TransactionTrait::value(tx),
    }
}

fn receipt_data(receipt: &TransactionReceipt) -> ReceiptData {
    ReceiptData {
        transaction_hash: ReceiptResponse::transaction_hash(receipt),
        status: ReceiptResponse::status(receipt),
        from: ReceiptResponse::from(receipt),
        to: ReceiptResponse::to(receipt),
        contract_address: ReceiptResponse::contract_address(receipt),
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    }
}

/// Geth answers an unknown hash with an error response rather than `null`.
fn trace_error(tx_hash: TxHash, error: TransportError) -> RpcError {
    match &error {
        JsonRpcError::ErrorResp(payload) if payload.message.contains("not found") => {
            RpcError::TraceNotFound {
                tx_hash: tx_hash.to_string(),
            }
        }
        JsonRpcError::DeserError { err, .. } => {
            RpcError::malformed(format!("debug_traceTransaction({tx_hash})"), err.to_string())
        }
        _ => RpcError::chain_connection_failed(format!("debug_traceTransaction({tx_hash})"), error),
    }
}
