// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Transaction effect retrieval.
//!
//! This module assembles the decoders into a pipeline:
//! - Pure per-transaction composition ([`extract_transaction_effects`])
//! - Block and range extraction with bounded concurrency ([`EffectsExtractor`])
//! - Result types that record what was skipped and why

mod effects;
mod extractor;
mod types;

pub use effects::extract_transaction_effects;
pub use extractor::EffectsExtractor;
pub use types::{BlockEffects, RangeEffects, SkippedTransaction, TransactionEffects, UnavailableBlock};
