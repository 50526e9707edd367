// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Per-address net balance changes from internal calls
//!
//! Each call debits `from` and credits `to` by its value. Every address that
//! appears in a call gets an entry, even when all its calls carry zero value.
//!
//! Arithmetic wraps on 256 bits, so the entries always sum to zero. Values
//! at or above `2^255` read back as negative; no real balance reaches that.

use std::collections::btree_map::{self, BTreeMap};

use alloy_primitives::{Address, I256};
use serde::{Deserialize, Serialize};

use crate::types::call::InternalCall;

/// Signed balance delta per address, zero for addresses never seen.
///
/// Backed by a `BTreeMap` so iteration and serialization are in address
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetChangeMap(BTreeMap<Address, I256>);

impl NetChangeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Net change of `address`, `I256::ZERO` when it never appeared.
    #[must_use]
    pub fn get(&self, address: &Address) -> I256 {
        self.0.get(address).copied().unwrap_or(I256::ZERO)
    }

    /// Returns true when `address` appeared in any applied call.
    #[must_use]
    pub fn contains(&self, address: &Address) -> bool {
        self.0.contains_key(address)
    }

    /// Fold one call into the map.
    pub fn apply(&mut self, call: &InternalCall) {
        let value = I256::from_raw(call.value);

        let from = self.0.entry(call.from).or_insert(I256::ZERO);
        *from = from.wrapping_sub(value);

        let to = self.0.entry(call.to).or_insert(I256::ZERO);
        *to = to.wrapping_add(value);
    }

    /// Sum of all entries. Always zero for maps built from calls.
    #[must_use]
    pub fn total(&self) -> I256 {
        self.0
            .values()
            .fold(I256::ZERO, |acc, delta| acc.wrapping_add(*delta))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in address order.
    pub fn iter(&self) -> btree_map::Iter<'_, Address, I256> {
        self.0.iter()
    }

    pub fn into_inner(self) -> BTreeMap<Address, I256> {
        self.0
    }
}

impl<'a> FromIterator<&'a InternalCall> for NetChangeMap {
    fn from_iter<T: IntoIterator<Item = &'a InternalCall>>(iter: T) -> Self {
        let mut map = Self::new();
        for call in iter {
            map.apply(call);
        }
        map
    }
}

impl<'a> IntoIterator for &'a NetChangeMap {
    type Item = (&'a Address, &'a I256);
    type IntoIter = btree_map::Iter<'a, Address, I256>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Fold internal calls into per-address net changes.
///
/// # Examples
///
/// ```
/// use alloy_primitives::{address, I256, U256};
/// use evm_indexer::{calculate_net_changes, CallOpcode, InternalCall};
///
/// let a = address!("1111111111111111111111111111111111111111");
/// let b = address!("2222222222222222222222222222222222222222");
/// let calls = [InternalCall::new(CallOpcode::Call, a, b, U256::from(50))];
///
/// let changes = calculate_net_changes(&calls);
/// assert_eq!(changes.get(&a), I256::try_from(-50).unwrap());
/// assert_eq!(changes.get(&b), I256::try_from(50).unwrap());
/// assert_eq!(changes.total(), I256::ZERO);
/// ```
pub fn calculate_net_changes(calls: &[InternalCall]) -> NetChangeMap {
    calls.iter().collect()
}
