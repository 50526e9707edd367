// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types shared across the extractors.
//!
//! - Transfer records produced by the log decoder and native extractor
//! - Internal calls produced by the trace interpreter
//! - Chain data records consumed from a [`ChainDataSource`](crate::ChainDataSource)

pub mod call;
pub mod chain;
pub mod limits;
pub mod transfer;

// Note: Public types are re-exported from lib.rs, not here
