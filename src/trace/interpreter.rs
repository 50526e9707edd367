// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Internal call reconstruction from struct logs
//!
//! Struct logs record every executed instruction with its operand stack but
//! say nothing about who called whom. [`InternalCallTracer`] rebuilds that by
//! watching CALL-family instructions:
//!
//! - callee address: stack word at offset -2 (just below `gas`), low 20 bytes
//! - value: stack word at offset -3, for plain `CALL` only
//!
//! # Call tracking
//!
//! [`CallTracking::Linear`] (the default) keeps a single context: each call
//! is attributed to the most recently entered callee and the caller context
//! is never restored on return. Calls made by an outer frame after a nested
//! call returns are therefore attributed to the nested callee.
//!
//! [`CallTracking::DepthAware`] uses the struct log `depth` field to keep a
//! frame per call depth, so returning to an outer frame restores its
//! address. It must be selected explicitly.

use alloy_primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::DecodeError;
use crate::trace::steps::{parse_stack_word, TraceStep};
use crate::types::call::{CallOpcode, InternalCall};
use crate::types::chain::ReceiptData;

/// Minimum stack height for a CALL-family instruction.
const MIN_CALL_STACK: usize = 7;

/// Offset from the top of the stack of the callee address.
const CALLEE_OFFSET: usize = 1;

/// Offset from the top of the stack of the transferred value (CALL only).
const VALUE_OFFSET: usize = 2;

/// How the caller of each internal call is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallTracking {
    /// Single context, updated on every call and never restored.
    #[default]
    Linear,
    /// One frame per call depth; steps without `depth` fall back to linear.
    DepthAware,
}

impl std::str::FromStr for CallTracking {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "depth_aware" | "depth-aware" | "depth" => Ok(Self::DepthAware),
            other => Err(format!("unknown call tracking mode: {other}")),
        }
    }
}

impl std::fmt::Display for CallTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::DepthAware => write!(f, "depth_aware"),
        }
    }
}

/// The call currently being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub from: Address,
    pub to: Address,
}

/// Walks trace steps in execution order and emits [`InternalCall`]s.
///
/// # Example
///
/// ```rust
/// use alloy_primitives::{address, U256};
/// use evm_indexer::{InternalCallTracer, TraceStep};
///
/// let origin = address!("1111111111111111111111111111111111111111");
/// let entry = address!("2222222222222222222222222222222222222222");
/// let stack = ["0x0", "0x0", "0x0", "0x0", "0x32", "0x3333333333333333333333333333333333333333", "0x2710"]
///     .map(String::from)
///     .to_vec();
///
/// let calls = InternalCallTracer::new(origin, entry).capture(&[TraceStep::new("CALL", stack)]);
/// assert_eq!(calls.len(), 1);
/// assert_eq!(calls[0].from, entry);
/// assert_eq!(calls[0].value, U256::from(50));
/// ```
#[derive(Debug, Clone)]
pub struct InternalCallTracer {
    tracking: CallTracking,
    context: CallContext,
    /// Executing frame per depth, index 0 is depth 1. Only used by
    /// [`CallTracking::DepthAware`].
    frames: Vec<Frame>,
    /// Address of each CREATE/CREATE2 seen, once its frame has returned.
    created: Vec<Option<Address>>,
    /// CREATE frames not yet returned, as `(depth of the CREATE step, index)`.
    open_creations: Vec<(u64, usize)>,
    /// Calls made from a contract under construction, as
    /// `(position among emitted calls, creation index)`.
    deferred: Vec<(usize, usize)>,
    emitted: usize,
}

/// The code running at one call depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Address(Address),
    /// Constructor of the n-th creation, address unknown until it returns.
    Creation(usize),
}

impl InternalCallTracer {
    /// Start from the outermost call, `origin` into `entry`.
    pub fn new(origin: Address, entry: Address) -> Self {
        Self {
            tracking: CallTracking::default(),
            context: CallContext {
                from: origin,
                to: entry,
            },
            frames: vec![Frame::Address(entry)],
            created: Vec::new(),
            open_creations: Vec::new(),
            deferred: Vec::new(),
            emitted: 0,
        }
    }

    /// Select the tracking mode.
    #[must_use]
    pub fn with_tracking(mut self, tracking: CallTracking) -> Self {
        self.tracking = tracking;
        self
    }

    /// The current call context.
    pub fn context(&self) -> CallContext {
        self.context
    }

    /// Feed one step. Returns the call it represents, if any.
    ///
    /// Non-CALL instructions and malformed CALL steps leave the call context
    /// untouched.
    ///
    /// With [`CallTracking::DepthAware`], calls made by a constructor are
    /// returned with a zero `from` because the created address is only
    /// known once the constructor returns. [`capture`](Self::capture) fills
    /// them in; callers driving `step` directly use
    /// [`resolve_created`](Self::resolve_created).
    pub fn step(&mut self, step: &TraceStep) -> Option<InternalCall> {
        let depth = match self.tracking {
            CallTracking::DepthAware => step.depth,
            CallTracking::Linear => None,
        };

        if let Some(depth) = depth {
            self.close_creations(step, depth);
            if matches!(step.op.as_str(), "CREATE" | "CREATE2") {
                self.enter_creation(depth);
                return None;
            }
        }

        let opcode = CallOpcode::from_mnemonic(&step.op)?;

        let (callee, value) = match call_operands(step, opcode) {
            Ok(Some(operands)) => operands,
            Ok(None) => {
                debug!(
                    op = %opcode,
                    stack_len = step.stack.len(),
                    pc = ?step.pc,
                    "Skipping call step with truncated stack"
                );
                return None;
            }
            Err(error) => {
                debug!(op = %opcode, pc = ?step.pc, error = %error, "Skipping malformed call step");
                return None;
            }
        };

        let caller = match depth {
            Some(depth) => self.frame_at(depth),
            None => Frame::Address(self.context.to),
        };

        let executing = match depth {
            Some(depth) => self.enter_frame(depth, opcode, caller, callee),
            None => Frame::Address(callee),
        };

        let from = self.address_of(caller);
        if let Frame::Creation(index) = caller {
            self.deferred.push((self.emitted, index));
        }
        self.emitted += 1;

        self.context = CallContext {
            from,
            to: self.address_of(executing),
        };

        Some(InternalCall::new(opcode, from, callee, value))
    }

    /// Feed all steps and return the calls in execution order.
    pub fn capture(mut self, steps: &[TraceStep]) -> Vec<InternalCall> {
        let mut calls: Vec<_> = steps.iter().filter_map(|step| self.step(step)).collect();
        self.resolve_created(&mut calls);
        calls
    }

    /// Set the `from` of constructor calls whose creation has returned.
    ///
    /// `calls` are all calls returned by [`step`](Self::step), in order.
    pub fn resolve_created(&self, calls: &mut [InternalCall]) {
        for &(position, index) in &self.deferred {
            let created = self.created.get(index).copied().flatten();
            if let (Some(call), Some(address)) = (calls.get_mut(position), created) {
                call.from = address;
            }
        }
    }

    fn address_of(&self, frame: Frame) -> Address {
        match frame {
            Frame::Address(address) => address,
            Frame::Creation(index) => self
                .created
                .get(index)
                .copied()
                .flatten()
                .unwrap_or(Address::ZERO),
        }
    }

    fn frame_at(&self, depth: u64) -> Frame {
        let index = usize::try_from(depth).unwrap_or(usize::MAX).saturating_sub(1);
        self.frames
            .get(index)
            .or_else(|| self.frames.last())
            .copied()
            .unwrap_or(Frame::Address(self.context.to))
    }

    /// Discard frames that returned, then push the callee's frame.
    ///
    /// DELEGATECALL and CALLCODE run in the caller's context, so their frame
    /// is the caller's.
    fn enter_frame(
        &mut self,
        depth: u64,
        opcode: CallOpcode,
        caller: Frame,
        callee: Address,
    ) -> Frame {
        let keep = usize::try_from(depth).unwrap_or(usize::MAX);
        self.frames.truncate(keep);
        let executing = if opcode.runs_in_caller_context() {
            caller
        } else {
            Frame::Address(callee)
        };
        self.frames.push(executing);
        executing
    }

    /// A CREATE at `depth` opens a constructor frame at `depth + 1`.
    fn enter_creation(&mut self, depth: u64) {
        let keep = usize::try_from(depth).unwrap_or(usize::MAX);
        self.frames.truncate(keep);
        let index = self.created.len();
        self.created.push(None);
        self.frames.push(Frame::Creation(index));
        self.open_creations.push((depth, index));
    }

    /// Record created addresses for constructors that have returned.
    ///
    /// The first step back at the CREATE's depth has the new address (zero
    /// when creation failed) on top of the stack.
    fn close_creations(&mut self, step: &TraceStep, depth: u64) {
        while let Some(&(create_depth, index)) = self.open_creations.last() {
            if depth > create_depth {
                break;
            }
            self.open_creations.pop();
            if depth < create_depth {
                continue;
            }
            let created = step
                .stack_from_top(0)
                .map(parse_stack_word)
                .transpose()
                .ok()
                .flatten()
                .map(|word| Address::from_word(B256::from(word)))
                .filter(|address| !address.is_zero());
            if created.is_none() {
                debug!(op = %step.op, pc = ?step.pc, "No created address after CREATE");
            }
            if let Some(slot) = self.created.get_mut(index) {
                *slot = created;
            }
        }
    }
}

/// Read the callee and value operands, `Ok(None)` when the stack is too short.
fn call_operands(
    step: &TraceStep,
    opcode: CallOpcode,
) -> Result<Option<(Address, U256)>, DecodeError> {
    if step.stack.len() < MIN_CALL_STACK {
        return Ok(None);
    }
    let Some(callee_word) = step.stack_from_top(CALLEE_OFFSET) else {
        return Ok(None);
    };
    let callee = Address::from_word(B256::from(parse_stack_word(callee_word)?));

    let value = if opcode.transfers_value() {
        match step.stack_from_top(VALUE_OFFSET) {
            Some(word) => parse_stack_word(word)?,
            None => return Ok(None),
        }
    } else {
        U256::ZERO
    };

    Ok(Some((callee, value)))
}

/// Reconstruct the internal calls of one transaction.
///
/// The outermost call goes from `receipt.from` into `receipt.to` (or the
/// created contract for deployments).
///
/// # Errors
///
/// [`DecodeError::MissingRecipient`] when the receipt names neither a
/// recipient nor a created contract.
pub fn capture_internal_calls(
    receipt: &ReceiptData,
    steps: &[TraceStep],
    tracking: CallTracking,
) -> Result<Vec<InternalCall>, DecodeError> {
    let entry = receipt
        .entry_address()
        .ok_or_else(|| DecodeError::MissingRecipient {
            tx_hash: receipt.transaction_hash.to_string(),
        })?;
    Ok(InternalCallTracer::new(receipt.from, entry)
        .with_tracking(tracking)
        .capture(steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, TxHash};

    const ORIGIN: Address = address!("1111111111111111111111111111111111111111");
    const ENTRY: Address = address!("2222222222222222222222222222222222222222");
    const B: Address = address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
    const C: Address = address!("cccccccccccccccccccccccccccccccccccccccc");
    const D: Address = address!("dddddddddddddddddddddddddddddddddddddddd");

    /// Stack for a call to `to` with `value`, top of stack last.
    fn call_stack(to: Address, value: u64) -> Vec<String> {
        vec![
            "0x0".into(),
            "0x0".into(),
            "0x0".into(),
            "0x0".into(),
            format!("{:#x}", U256::from(value)),
            format!("{to:#x}"),
            "0x2710".into(),
        ]
    }

    fn call(op: &str, to: Address, value: u64) -> TraceStep {
        TraceStep::new(op, call_stack(to, value))
    }

    #[test]
    fn test_single_call_from_entry() {
        let mut tracer = InternalCallTracer::new(ORIGIN, ENTRY);
        let emitted = tracer.step(&call("CALL", B, 50)).unwrap();

        assert_eq!(
            emitted,
            InternalCall::new(CallOpcode::Call, ENTRY, B, U256::from(50))
        );
        assert_eq!(tracer.context(), CallContext { from: ENTRY, to: B });
    }

    #[test]
    fn test_subsequent_call_originates_from_previous_callee() {
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .capture(&[call("CALL", B, 50), call("CALL", C, 10)]);
        assert_eq!(calls[1].from, B);
        assert_eq!(calls[1].to, C);
    }

    #[test]
    fn test_value_ignored_for_non_call_opcodes() {
        for op in ["DELEGATECALL", "STATICCALL", "CALLCODE"] {
            let calls = InternalCallTracer::new(ORIGIN, ENTRY).capture(&[call(op, B, 999)]);
            assert_eq!(calls.len(), 1, "{op}");
            assert_eq!(calls[0].value, U256::ZERO, "{op}");
            assert_eq!(calls[0].to, B, "{op}");
        }
    }

    #[test]
    fn test_non_call_value_word_is_not_parsed() {
        let mut stack = call_stack(B, 0);
        stack[4] = "garbage".into();
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .capture(&[TraceStep::new("STATICCALL", stack)]);
        assert_eq!(calls.len(), 1);
    }

    #[test]
    fn test_other_opcodes_are_ignored() {
        let steps = vec![
            TraceStep::new("PUSH1", vec!["0x1".into()]),
            TraceStep::new("SSTORE", call_stack(B, 1)),
            TraceStep::new("RETURN", vec![]),
        ];
        let mut tracer = InternalCallTracer::new(ORIGIN, ENTRY);
        for step in &steps {
            assert!(tracer.step(step).is_none());
        }
        assert_eq!(tracer.context(), CallContext { from: ORIGIN, to: ENTRY });
    }

    #[test]
    fn test_truncated_stack_is_skipped() {
        let mut stack = call_stack(B, 50);
        stack.remove(0);
        let mut tracer = InternalCallTracer::new(ORIGIN, ENTRY);
        assert!(tracer.step(&TraceStep::new("CALL", stack)).is_none());
        assert_eq!(tracer.context().to, ENTRY);
    }

    #[test]
    fn test_malformed_word_is_skipped() {
        let mut stack = call_stack(B, 50);
        stack[5] = "0xnot-an-address".into();
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .capture(&[TraceStep::new("CALL", stack), call("CALL", C, 1)]);
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].from, ENTRY);
        assert_eq!(calls[0].to, C);
    }

    #[test]
    fn test_unprefixed_padded_words() {
        let stack = vec![
            "0".repeat(64),
            "0".repeat(64),
            "0".repeat(64),
            "0".repeat(64),
            format!("{}{}", "0".repeat(62), "32"),
            format!("{}{}", "0".repeat(24), "b".repeat(40)),
            format!("{}{}", "0".repeat(60), "2710"),
        ];
        let calls = InternalCallTracer::new(ORIGIN, ENTRY).capture(&[TraceStep::new("CALL", stack)]);
        assert_eq!(calls[0].to, B);
        assert_eq!(calls[0].value, U256::from(50));
    }

    /// ENTRY calls B, B calls C and returns, then ENTRY calls D.
    fn nested_trace() -> Vec<TraceStep> {
        vec![
            call("CALL", B, 5).with_depth(1),
            TraceStep::new("PUSH1", vec![]).with_depth(2),
            call("CALL", C, 2).with_depth(2),
            TraceStep::new("STOP", vec![]).with_depth(3),
            TraceStep::new("RETURN", vec![]).with_depth(2),
            call("CALL", D, 1).with_depth(1),
        ]
    }

    #[test]
    fn test_linear_tracking_misattributes_after_return() {
        let calls = InternalCallTracer::new(ORIGIN, ENTRY).capture(&nested_trace());
        let pairs: Vec<_> = calls.iter().map(|c| (c.from, c.to)).collect();
        assert_eq!(pairs, vec![(ENTRY, B), (B, C), (C, D)]);
    }

    #[test]
    fn test_depth_aware_tracking_restores_caller() {
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .with_tracking(CallTracking::DepthAware)
            .capture(&nested_trace());
        let pairs: Vec<_> = calls.iter().map(|c| (c.from, c.to)).collect();
        assert_eq!(pairs, vec![(ENTRY, B), (B, C), (ENTRY, D)]);
    }

    /// CALL B returns, then ENTRY deploys a contract whose constructor calls C.
    fn creation_trace() -> Vec<TraceStep> {
        vec![
            call("CALL", B, 0).with_depth(1),
            TraceStep::new("STOP", vec![]).with_depth(2),
            TraceStep::new("CREATE2", vec!["0x0".to_string(); 4]).with_depth(1),
            call("CALL", C, 5).with_depth(2),
            TraceStep::new("RETURN", vec!["0x0".into(), "0x0".into()]).with_depth(2),
            TraceStep::new("POP", vec![format!("{D:#x}")]).with_depth(1),
            call("CALL", B, 1).with_depth(1),
        ]
    }

    #[test]
    fn test_depth_aware_constructor_calls_come_from_created_contract() {
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .with_tracking(CallTracking::DepthAware)
            .capture(&creation_trace());
        let pairs: Vec<_> = calls.iter().map(|c| (c.from, c.to)).collect();
        assert_eq!(pairs, vec![(ENTRY, B), (D, C), (ENTRY, B)]);
        assert_eq!(calls[1].value, U256::from(5));
    }

    #[test]
    fn test_depth_aware_unfinished_constructor_is_not_attributed_to_sibling() {
        let steps = &creation_trace()[..4];
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .with_tracking(CallTracking::DepthAware)
            .capture(steps);
        assert_eq!(calls.len(), 2);
        assert_ne!(calls[1].from, B);
        assert_eq!(calls[1].from, Address::ZERO);
    }

    #[test]
    fn test_step_defers_constructor_caller_until_resolved() {
        let steps = creation_trace();
        let mut tracer =
            InternalCallTracer::new(ORIGIN, ENTRY).with_tracking(CallTracking::DepthAware);
        let mut calls: Vec<_> = steps.iter().filter_map(|step| tracer.step(step)).collect();
        assert_eq!(calls[1].from, Address::ZERO);

        tracer.resolve_created(&mut calls);
        assert_eq!(calls[1].from, D);
    }

    #[test]
    fn test_linear_tracking_ignores_create() {
        let calls = InternalCallTracer::new(ORIGIN, ENTRY).capture(&creation_trace());
        let pairs: Vec<_> = calls.iter().map(|c| (c.from, c.to)).collect();
        assert_eq!(pairs, vec![(ENTRY, B), (B, C), (C, B)]);
    }

    #[test]
    fn test_depth_aware_delegatecall_keeps_caller_address() {
        let steps = vec![
            call("DELEGATECALL", B, 0).with_depth(1),
            call("CALL", C, 3).with_depth(2),
        ];
        let calls = InternalCallTracer::new(ORIGIN, ENTRY)
            .with_tracking(CallTracking::DepthAware)
            .capture(&steps);
        assert_eq!(calls[0].to, B);
        assert_eq!(calls[1].from, ENTRY);
        assert_eq!(calls[1].value, U256::from(3));
    }

    #[test]
    fn test_depth_aware_without_depth_behaves_linearly() {
        let steps = vec![call("CALL", B, 1), call("CALL", C, 1)];
        let linear = InternalCallTracer::new(ORIGIN, ENTRY).capture(&steps);
        let depth_aware = InternalCallTracer::new(ORIGIN, ENTRY)
            .with_tracking(CallTracking::DepthAware)
            .capture(&steps);
        assert_eq!(linear, depth_aware);
    }

    #[test]
    fn test_capture_from_receipt_uses_created_contract() {
        let receipt = ReceiptData {
            transaction_hash: TxHash::with_last_byte(1),
            status: true,
            from: ORIGIN,
            to: None,
            contract_address: Some(ENTRY),
            logs: vec![],
        };
        let calls =
            capture_internal_calls(&receipt, &[call("CALL", B, 1)], CallTracking::Linear).unwrap();
        assert_eq!(calls[0].from, ENTRY);
    }

    #[test]
    fn test_capture_requires_entry_address() {
        let receipt = ReceiptData {
            transaction_hash: TxHash::with_last_byte(1),
            status: true,
            from: ORIGIN,
            to: None,
            contract_address: None,
            logs: vec![],
        };
        assert!(capture_internal_calls(&receipt, &[], CallTracking::Linear).is_err());
    }

    #[test]
    fn test_tracking_from_str() {
        assert_eq!("linear".parse::<CallTracking>(), Ok(CallTracking::Linear));
        assert_eq!("depth-aware".parse::<CallTracking>(), Ok(CallTracking::DepthAware));
        assert!("stack".parse::<CallTracking>().is_err());
    }

    #[test]
    fn test_rerun_is_identical() {
        let steps = nested_trace();
        let first = InternalCallTracer::new(ORIGIN, ENTRY).capture(&steps);
        let second = InternalCallTracer::new(ORIGIN, ENTRY).capture(&steps);
        assert_eq!(first, second);
    }
}
