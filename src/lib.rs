// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transaction effect extraction for EVM chains.
//!
//! Given blocks, receipts and struct-log traces, the crate reports what each
//! transaction moved:
//! - ERC-20 `Transfer` events decoded from receipt logs ([`decode_erc20_transfers`])
//! - the native value transfer of the transaction itself ([`extract_native_transfer`])
//! - internal calls found in the execution trace ([`capture_internal_calls`])
//! - the per-address net value change over those calls ([`calculate_net_changes`])
//!
//! The decoders are pure functions. [`EffectsExtractor`] drives them over a
//! [`ChainDataSource`], which [`AlloyChainDataSource`] implements for any
//! alloy provider.
//!
//! # Example
//!
//! ```rust
//! use evm_indexer::{calculate_net_changes, CallOpcode, InternalCall};
//! use alloy_primitives::{address, I256, U256};
//!
//! let a = address!("0x1111111111111111111111111111111111111111");
//! let b = address!("0x2222222222222222222222222222222222222222");
//! let calls = [InternalCall::new(CallOpcode::Call, a, b, U256::from(100))];
//!
//! let net = calculate_net_changes(&calls);
//! assert_eq!(net.get(&a), I256::try_from(-100).unwrap());
//! assert_eq!(net.total(), I256::ZERO);
//! ```

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod events;
pub mod native;
pub mod net_change;
pub mod provider;
pub mod retrieval;
pub mod source;
pub mod trace;
pub mod tracing;
pub mod transport;
pub mod types;

pub use config::{ChainConfig, IndexerConfig, IndexerConfigBuilder};
pub use errors::{DecodeError, ExtractionError, IndexerError, RpcError};
pub use events::{decode_erc20_transfer, decode_erc20_transfers, Transfer};
pub use native::{
    extract_native_transfer, extract_native_transfer_from_hex, extract_native_transfer_with_created,
    parse_address,
};
pub use net_change::{calculate_net_changes, NetChangeMap};
pub use provider::{create_http_provider, EthereumHttpProvider, ProviderConfig};
pub use retrieval::{
    extract_transaction_effects, BlockEffects, EffectsExtractor, RangeEffects, SkippedTransaction,
    TransactionEffects, UnavailableBlock,
};
pub use source::{AlloyChainDataSource, ChainDataSource};
pub use trace::{
    capture_internal_calls, parse_stack_word, CallContext, CallTracking, InternalCallTracer,
    StructLogTrace, TraceStep,
};
pub use transport::{RetryLayer, RetryPolicy};
pub use types::call::{CallOpcode, InternalCall};
pub use types::chain::{BlockData, ReceiptData, TransactionData};
pub use types::limits::MaxConcurrency;
pub use types::transfer::TransferRecord;
