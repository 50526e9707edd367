// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::io::Write;
use std::str::FromStr;

use alloy_chains::Chain;
use alloy_primitives::BlockNumber;
use anyhow::{anyhow, bail, Context};
use dotenvy::dotenv;
use tracing::info;

use crate::{
    create_http_provider, AlloyChainDataSource, CallTracking, ChainDataSource, EffectsExtractor,
    IndexerConfigBuilder, ProviderConfig,
};

/// Main entry point for the application.
///
/// Extracts the effects of every transaction in `START_BLOCK..=END_BLOCK`
/// and writes them to stdout as JSON.
pub async fn run() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let rpc_url = dotenvy::var("RPC_URL").context("RPC_URL must be set")?;

    let mut provider_config = ProviderConfig::public_endpoint(rpc_url);
    if let Some(max_retries) = env_var::<u32>("MAX_RETRIES")? {
        provider_config = provider_config.with_max_retries(max_retries);
    }

    // Fails fast when the node is unreachable
    let provider = create_http_provider(provider_config)?;
    let source = AlloyChainDataSource::connect(provider).await?;

    let chain = Chain::from_id(source.chain_id());
    if let Some(expected) = env_var::<u64>("CHAIN_ID")? {
        if expected != chain.id() {
            bail!("CHAIN_ID is {expected} but the node reports chain {}", chain.id());
        }
    }

    let (start_block, end_block) = match (env_var("START_BLOCK")?, env_var("END_BLOCK")?) {
        (Some(start), Some(end)) => (start, end),
        (start, end) => block_range(start, end, source.get_latest_block_number().await?),
    };

    let mut builder = IndexerConfigBuilder::with_defaults();
    if let Some(max_concurrency) = env_var::<usize>("MAX_CONCURRENCY")? {
        builder = builder.max_concurrency(max_concurrency);
    }
    if let Some(call_tracking) = env_var::<CallTracking>("CALL_TRACKING")? {
        builder = builder.call_tracking(call_tracking);
    }
    if let Some(include_failed) = env_var::<bool>("INCLUDE_FAILED")? {
        builder = builder.include_failed(include_failed);
    }
    let config = builder.build();

    info!(
        chain_id = %chain,
        start_block,
        end_block,
        call_tracking = %config.call_tracking,
        "Starting extraction"
    );

    let extractor = EffectsExtractor::with_config(source, chain, config);
    let effects = extractor.extract_range(start_block, end_block).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &effects)?;
    writeln!(stdout)?;

    Ok(())
}

/// Read and parse an optional environment variable.
fn env_var<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match dotenvy::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow!("Invalid {name} '{value}': {e}")),
        Err(_) => Ok(None),
    }
}

/// Fill in missing range bounds from the chain head.
///
/// A missing start never lies past the end, so `END_BLOCK` alone below the
/// head selects that single block.
fn block_range(
    start: Option<BlockNumber>,
    end: Option<BlockNumber>,
    head: BlockNumber,
) -> (BlockNumber, BlockNumber) {
    let end = end.unwrap_or(head);
    let start = start.unwrap_or_else(|| head.min(end));
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_range_defaults_to_head() {
        assert_eq!(block_range(None, None, 100), (100, 100));
        assert_eq!(block_range(Some(90), None, 100), (90, 100));
        assert_eq!(block_range(Some(90), Some(95), 100), (90, 95));
    }

    #[test]
    fn test_block_range_start_defaults_to_head_capped_at_end() {
        assert_eq!(block_range(None, Some(80), 100), (80, 80));
        assert_eq!(block_range(None, Some(120), 100), (100, 120));
    }
}
