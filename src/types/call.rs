// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Internal calls reconstructed from an execution trace

use std::fmt;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// The CALL-family instructions that invoke another contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallOpcode {
    Call,
    CallCode,
    DelegateCall,
    StaticCall,
}

impl CallOpcode {
    /// Parse an opcode mnemonic as it appears in a struct log (`"CALL"`, ...).
    ///
    /// Returns `None` for every other instruction.
    #[must_use]
    pub fn from_mnemonic(op: &str) -> Option<Self> {
        match op {
            "CALL" => Some(Self::Call),
            "CALLCODE" => Some(Self::CallCode),
            "DELEGATECALL" => Some(Self::DelegateCall),
            "STATICCALL" => Some(Self::StaticCall),
            _ => None,
        }
    }

    /// The instruction mnemonic.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Call => "CALL",
            Self::CallCode => "CALLCODE",
            Self::DelegateCall => "DELEGATECALL",
            Self::StaticCall => "STATICCALL",
        }
    }

    /// Only a plain CALL moves native balance to the callee.
    #[must_use]
    pub const fn transfers_value(&self) -> bool {
        matches!(self, Self::Call)
    }

    /// DELEGATECALL and CALLCODE run the callee's code in the caller's context.
    #[must_use]
    pub const fn runs_in_caller_context(&self) -> bool {
        matches!(self, Self::DelegateCall | Self::CallCode)
    }
}

impl fmt::Display for CallOpcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contract-to-contract invocation observed during execution.
///
/// `value` is only ever non-zero for [`CallOpcode::Call`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InternalCall {
    pub opcode: CallOpcode,
    pub from: Address,
    pub to: Address,
    pub value: U256,
}

impl InternalCall {
    /// Build a call record, zeroing the value for opcodes that cannot move it.
    pub fn new(opcode: CallOpcode, from: Address, to: Address, value: U256) -> Self {
        let value = if opcode.transfers_value() {
            value
        } else {
            U256::ZERO
        };
        Self {
            opcode,
            from,
            to,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_mnemonic_round_trip() {
        for op in [
            CallOpcode::Call,
            CallOpcode::CallCode,
            CallOpcode::DelegateCall,
            CallOpcode::StaticCall,
        ] {
            assert_eq!(CallOpcode::from_mnemonic(op.as_str()), Some(op));
        }
        assert_eq!(CallOpcode::from_mnemonic("CREATE2"), None);
        assert_eq!(CallOpcode::from_mnemonic("call"), None);
    }

    #[test]
    fn test_non_call_opcodes_drop_value() {
        let a = address!("1111111111111111111111111111111111111111");
        let b = address!("2222222222222222222222222222222222222222");
        let value = U256::from(50);

        assert_eq!(InternalCall::new(CallOpcode::Call, a, b, value).value, value);
        assert_eq!(
            InternalCall::new(CallOpcode::DelegateCall, a, b, value).value,
            U256::ZERO
        );
        assert_eq!(
            InternalCall::new(CallOpcode::StaticCall, a, b, value).value,
            U256::ZERO
        );
        assert_eq!(
            InternalCall::new(CallOpcode::CallCode, a, b, value).value,
            U256::ZERO
        );
    }

    #[test]
    fn test_opcode_serializes_as_mnemonic() {
        let json = serde_json::to_string(&CallOpcode::DelegateCall).unwrap();
        assert_eq!(json, "\"DELEGATECALL\"");
    }
}
