// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Configuration for extraction runs
//!
//! Controls how hard the extractor leans on the node (request concurrency,
//! timeouts) and what it reports (failed transactions, call tracking mode).
//!
//! # Example: Using defaults
//!
//! ```rust
//! use evm_indexer::IndexerConfig;
//!
//! // 8 requests in flight, 30s timeout, Base and Sonic throttled to 2
//! let config = IndexerConfig::default();
//! ```
//!
//! # Example: Custom configuration
//!
//! ```rust
//! use evm_indexer::{CallTracking, IndexerConfigBuilder};
//! use alloy_chains::NamedChain;
//! use std::time::Duration;
//!
//! let config = IndexerConfigBuilder::with_defaults()
//!     .max_concurrency(16)
//!     .call_tracking(CallTracking::DepthAware)
//!     .chain_max_concurrency(NamedChain::Polygon, 4)
//!     .rpc_timeout(Duration::from_secs(60))
//!     .build();
//! ```

use std::collections::HashMap;
use std::time::Duration;

use alloy_chains::{Chain, NamedChain};

use crate::trace::interpreter::CallTracking;
use crate::types::limits::MaxConcurrency;

/// Configuration for [`EffectsExtractor`](crate::EffectsExtractor)
///
/// Use [`IndexerConfigBuilder`] for a fluent API to construct instances.
#[derive(Debug, Clone)]
pub struct IndexerConfig {
    /// Maximum chain data requests in flight
    /// Default: 8
    pub max_concurrency: MaxConcurrency,

    /// Timeout for a single chain data request
    /// Default: 30 seconds
    pub rpc_timeout: Duration,

    /// Report reverted transactions instead of skipping them
    /// Default: false
    pub include_failed: bool,

    /// How internal call callers are attributed
    /// Default: [`CallTracking::Linear`]
    pub call_tracking: CallTracking,

    /// Chain-specific overrides
    pub chain_overrides: HashMap<Chain, ChainConfig>,
}

/// Chain-specific configuration overrides
#[derive(Debug, Clone, Default)]
pub struct ChainConfig {
    /// Override request concurrency for this chain
    pub max_concurrency: Option<MaxConcurrency>,

    /// Override request timeout for this chain
    pub rpc_timeout: Option<Duration>,
}

impl Default for IndexerConfig {
    fn default() -> Self {
        Self::with_common_defaults()
    }
}

impl IndexerConfig {
    /// Defaults for hosted RPC providers.
    ///
    /// Base and Sonic endpoints tend to rate-limit debug calls harder, so
    /// they get 2 concurrent requests instead of 8.
    pub fn with_common_defaults() -> Self {
        let mut config = Self::minimal();

        for chain in [NamedChain::Base, NamedChain::Sonic] {
            config.set_chain_override(
                chain,
                ChainConfig {
                    max_concurrency: Some(MaxConcurrency::new(2)),
                    rpc_timeout: None,
                },
            );
        }

        config
    }

    /// Defaults without chain overrides.
    pub fn minimal() -> Self {
        Self {
            max_concurrency: MaxConcurrency::default(),
            rpc_timeout: Duration::from_secs(30),
            include_failed: false,
            call_tracking: CallTracking::Linear,
            chain_overrides: HashMap::new(),
        }
    }

    /// Effective request concurrency for `chain`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use evm_indexer::{IndexerConfig, MaxConcurrency};
    /// use alloy_chains::NamedChain;
    ///
    /// let config = IndexerConfig::default();
    /// assert_eq!(config.get_max_concurrency(NamedChain::Base), MaxConcurrency::new(2));
    /// assert_eq!(config.get_max_concurrency(NamedChain::Mainnet), MaxConcurrency::new(8));
    /// ```
    pub fn get_max_concurrency(&self, chain: impl Into<Chain>) -> MaxConcurrency {
        self.chain_overrides
            .get(&chain.into())
            .and_then(|c| c.max_concurrency)
            .unwrap_or(self.max_concurrency)
    }

    /// Effective request timeout for `chain`.
    pub fn get_rpc_timeout(&self, chain: impl Into<Chain>) -> Duration {
        self.chain_overrides
            .get(&chain.into())
            .and_then(|c| c.rpc_timeout)
            .unwrap_or(self.rpc_timeout)
    }

    /// Set chain-specific override
    pub fn set_chain_override(&mut self, chain: impl Into<Chain>, config: ChainConfig) {
        self.chain_overrides.insert(chain.into(), config);
    }
}

/// Builder for [`IndexerConfig`]
pub struct IndexerConfigBuilder {
    config: IndexerConfig,
}

impl Default for IndexerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexerConfigBuilder {
    /// Start from [`IndexerConfig::minimal`].
    pub fn new() -> Self {
        Self {
            config: IndexerConfig::minimal(),
        }
    }

    /// Start from [`IndexerConfig::with_common_defaults`].
    pub fn with_defaults() -> Self {
        Self {
            config: IndexerConfig::with_common_defaults(),
        }
    }

    /// Set global request concurrency
    pub fn max_concurrency(mut self, max: usize) -> Self {
        self.config.max_concurrency = MaxConcurrency::new(max);
        self
    }

    /// Set global request timeout
    pub fn rpc_timeout(mut self, timeout: Duration) -> Self {
        self.config.rpc_timeout = timeout;
        self
    }

    /// Report reverted transactions
    pub fn include_failed(mut self, include: bool) -> Self {
        self.config.include_failed = include;
        self
    }

    /// Select the call tracking mode
    pub fn call_tracking(mut self, tracking: CallTracking) -> Self {
        self.config.call_tracking = tracking;
        self
    }

    /// Add chain-specific configuration
    pub fn chain_config(mut self, chain: impl Into<Chain>, config: ChainConfig) -> Self {
        self.config.set_chain_override(chain, config);
        self
    }

    /// Convenience: set request concurrency for a specific chain
    pub fn chain_max_concurrency(mut self, chain: impl Into<Chain>, max: usize) -> Self {
        let chain = chain.into();
        let entry = self.config.chain_overrides.entry(chain).or_default();
        entry.max_concurrency = Some(MaxConcurrency::new(max));
        self
    }

    /// Convenience: set request timeout for a specific chain
    pub fn chain_rpc_timeout(mut self, chain: impl Into<Chain>, timeout: Duration) -> Self {
        let chain = chain.into();
        let entry = self.config.chain_overrides.entry(chain).or_default();
        entry.rpc_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> IndexerConfig {
        self.config
    }
}
