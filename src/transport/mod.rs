// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transport layer utilities for alloy providers.
//!
//! Tower middleware layered under the RPC client. Used by
//! [`create_http_provider`](crate::create_http_provider); also usable with a
//! hand-built `ClientBuilder`.

mod retry;

pub use retry::{RetryLayer, RetryPolicy, RetryService};
