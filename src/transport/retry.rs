// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower retry layer with exponential backoff for the alloy RPC client.
//!
//! Only errors alloy classifies as retryable (connection failures, HTTP 5xx,
//! rate limiting, null responses) are retried; everything else is returned
//! on the first attempt. The delay before retry `n` (0-based) is:
//!
//! ```text
//! delay = min(base_delay * 2^n, max_delay)
//! ```

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
    time::Duration,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket, RpcError as JsonRpcError};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, warn};

/// Retry budget and backoff bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub const NONE: Self = Self {
        max_retries: 0,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };

    /// Longer waits for endpoints that need time to recover, such as public
    /// nodes throttling `debug_traceTransaction`.
    pub fn patient() -> Self {
        Self {
            max_retries: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .unwrap_or(self.max_delay)
            .min(self.max_delay)
    }
}

/// A Tower layer that retries failed RPC requests per a [`RetryPolicy`].
///
/// # Example
///
/// ```rust,ignore
/// use evm_indexer::transport::{RetryLayer, RetryPolicy};
/// use alloy_rpc_client::ClientBuilder;
///
/// let client = ClientBuilder::default()
///     .layer(RetryLayer::new(RetryPolicy::patient()))
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RetryLayer {
    policy: Arc<RetryPolicy>,
}

impl RetryLayer {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<S> Layer<S> for RetryLayer {
    type Service = RetryService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RetryService {
            service,
            policy: self.policy.clone(),
        }
    }
}

/// Service produced by [`RetryLayer`].
#[derive(Clone, Debug)]
pub struct RetryService<S> {
    service: S,
    policy: Arc<RetryPolicy>,
}

impl<S> tower::Service<RequestPacket> for RetryService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let service = self.service.clone();
        let policy = self.policy.clone();

        Box::pin(async move {
            let mut attempt = 0u32;
            loop {
                let result = service.clone().call(request.clone()).await;
                let error = match result {
                    Ok(response) => {
                        if attempt > 0 {
                            debug!(attempt, "Request succeeded after retry");
                        }
                        return Ok(response);
                    }
                    Err(error) => error,
                };

                if !is_retryable(&error) || attempt >= policy.max_retries {
                    if attempt > 0 {
                        warn!(error = %error, attempts = attempt + 1, "Giving up on request");
                    }
                    return Err(error);
                }

                let delay = policy.backoff(attempt);
                warn!(
                    error = %error,
                    attempt = attempt + 1,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis(),
                    "Retryable error, backing off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        })
    }
}

fn is_retryable(error: &TransportError) -> bool {
    match error {
        JsonRpcError::Transport(kind) => kind.is_retry_err(),
        JsonRpcError::ErrorResp(payload) => payload.is_retry_err(),
        JsonRpcError::NullResp => true,
        // A truncated body from an overloaded node deserializes badly once
        JsonRpcError::DeserError { .. } => true,
        _ => false,
    }
}
