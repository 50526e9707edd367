// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Execution traces and internal call reconstruction.
//!
//! - [`steps`]: the struct-log trace returned by `debug_traceTransaction`
//! - [`interpreter`]: walks the steps and rebuilds CALL-family invocations

pub mod interpreter;
pub mod steps;

pub use interpreter::{capture_internal_calls, CallContext, CallTracking, InternalCallTracer};
pub use steps::{parse_stack_word, StructLogTrace, TraceStep};
