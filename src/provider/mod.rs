// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP provider construction
//!
//! ```rust,ignore
//! use evm_indexer::{create_http_provider, AlloyChainDataSource, ProviderConfig};
//!
//! let provider = create_http_provider(ProviderConfig::public_endpoint(rpc_url))?;
//! let source = AlloyChainDataSource::connect(provider).await?;
//! ```

mod config;

pub use config::ProviderConfig;

use alloy_network::Ethereum;
use alloy_provider::RootProvider;
use alloy_rpc_client::{ClientBuilder, RpcClient};
use alloy_transport_http::Http;

use crate::errors::RpcError;
use crate::transport::RetryLayer;

/// HTTP provider for Ethereum-compatible chains
pub type EthereumHttpProvider = RootProvider<Ethereum>;

/// Create an HTTP provider with the given configuration
///
/// The provider is read-only: no fillers, no signer.
///
/// # Errors
///
/// [`RpcError::ProviderUrlInvalid`] when the URL cannot be parsed.
pub fn create_http_provider(config: ProviderConfig) -> Result<EthereumHttpProvider, RpcError> {
    let url: url::Url = config
        .url
        .parse()
        .map_err(|e| RpcError::ProviderUrlInvalid(format!("{e}")))?;

    let http = Http::new(url);
    let client = if config.has_retries() {
        ClientBuilder::default()
            .layer(RetryLayer::new(config.retry))
            .transport(http, false)
    } else {
        RpcClient::new(http, false)
    };

    Ok(RootProvider::new(client))
}
