// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Provider configuration options

use crate::transport::RetryPolicy;

/// Configuration for creating providers
///
/// # Example
///
/// ```rust
/// use evm_indexer::ProviderConfig;
///
/// let config = ProviderConfig::new("https://seed.omchain.io").with_max_retries(5);
/// assert_eq!(config.retry.max_retries, 5);
/// ```
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// RPC endpoint URL
    pub url: String,
    /// Retry behaviour for transient transport failures
    pub retry: RetryPolicy,
}

impl ProviderConfig {
    /// Create a configuration with the default retry policy
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Keep the backoff bounds, change only the retry budget
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Disable retries
    #[must_use]
    pub fn without_retry(self) -> Self {
        self.with_retry(RetryPolicy::NONE)
    }

    #[must_use]
    pub fn has_retries(&self) -> bool {
        self.retry.max_retries > 0
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::local_node("http://localhost:8545")
    }
}

/// Preset configurations
impl ProviderConfig {
    /// Local nodes fail for real, not transiently; no retries.
    #[must_use]
    pub fn local_node(url: impl Into<String>) -> Self {
        Self::new(url).without_retry()
    }

    /// Public endpoints throttle debug calls; retry patiently.
    #[must_use]
    pub fn public_endpoint(url: impl Into<String>) -> Self {
        Self::new(url).with_retry(RetryPolicy::patient())
    }
}
