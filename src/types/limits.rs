// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Strong types for configuration values

use serde::{Deserialize, Serialize};

/// Maximum number of chain data requests in flight at once.
///
/// Never zero: [`MaxConcurrency::new`] clamps to 1.
///
/// # Examples
///
/// ```
/// use evm_indexer::MaxConcurrency;
///
/// assert_eq!(MaxConcurrency::new(8).get(), 8);
/// assert_eq!(MaxConcurrency::new(0).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxConcurrency(usize);

impl MaxConcurrency {
    /// One request at a time.
    pub const SEQUENTIAL: Self = Self(1);

    pub const fn new(value: usize) -> Self {
        if value == 0 {
            Self(1)
        } else {
            Self(value)
        }
    }

    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for MaxConcurrency {
    fn default() -> Self {
        Self(8)
    }
}

impl From<usize> for MaxConcurrency {
    fn from(value: usize) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for MaxConcurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
