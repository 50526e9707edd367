// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Struct-log execution traces
//!
//! Mirrors the JSON produced by geth's default struct logger. Only the
//! fields the interpreter needs are typed; everything else is ignored on
//! deserialization.

use alloy_primitives::U256;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::DecodeError;

/// The full trace of one transaction, as returned by `debug_traceTransaction`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructLogTrace {
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub gas: u64,
    #[serde(default)]
    pub return_value: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub struct_logs: Vec<TraceStep>,
}

impl StructLogTrace {
    /// Build a trace from steps alone.
    pub fn from_steps(struct_logs: Vec<TraceStep>) -> Self {
        Self {
            struct_logs,
            ..Default::default()
        }
    }
}

/// One executed instruction.
///
/// The stack is ordered bottom to top: the last element is the top of the
/// stack. Words are hex strings, with or without a `0x` prefix depending on
/// the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceStep {
    pub op: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stack: Vec<String>,
    /// Call depth, starting at 1 for the outermost frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pc: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_cost: Option<u64>,
}

impl TraceStep {
    /// A step with just an opcode and a stack.
    pub fn new(op: impl Into<String>, stack: Vec<String>) -> Self {
        Self {
            op: op.into(),
            stack,
            ..Default::default()
        }
    }

    /// Attach the call depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// The stack entry `offset` positions below the top (0 is the top).
    pub fn stack_from_top(&self, offset: usize) -> Option<&str> {
        let index = self.stack.len().checked_sub(offset + 1)?;
        self.stack.get(index).map(String::as_str)
    }
}

/// Parse a hex stack word into a 256-bit value.
///
/// # Examples
///
/// ```
/// use alloy_primitives::U256;
/// use evm_indexer::parse_stack_word;
///
/// assert_eq!(parse_stack_word("0x32").unwrap(), U256::from(50));
/// assert_eq!(parse_stack_word("0000000000000000000000000000000000000000000000000000000000000032").unwrap(), U256::from(50));
/// assert!(parse_stack_word("0xzz").is_err());
/// ```
pub fn parse_stack_word(word: &str) -> Result<U256, DecodeError> {
    let hex = word
        .strip_prefix("0x")
        .or_else(|| word.strip_prefix("0X"))
        .unwrap_or(word);
    if hex.is_empty() {
        return Err(DecodeError::InvalidStackWord {
            word: word.to_string(),
        });
    }
    U256::from_str_radix(hex, 16).map_err(|_| DecodeError::InvalidStackWord {
        word: word.to_string(),
    })
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
