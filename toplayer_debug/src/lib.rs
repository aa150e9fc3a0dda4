// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing, recording, and JSON timeline export for toplayer
//! diagnostics.
//!
//! This crate provides [`TraceSink`](toplayer_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`timeline::export`]: writes Chrome Trace Event Format JSON from
//!   recorded bytes.

pub mod pretty;
pub mod recorder;
pub mod timeline;
