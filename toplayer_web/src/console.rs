// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser console trace output.

use toplayer_core::trace::{ChangeEvent, IgnoredEvent, ReapEvent, TraceSink, TransitionEvent};
use wasm_bindgen::JsValue;

/// Writes one console line per trace event.
///
/// Membership changes go to `console.log`; ignored inputs go to
/// `console.debug` so they stay hidden unless verbose output is enabled.
///
/// ```rust,ignore
/// toplayer_web::set_trace_sink(ConsoleSink::new());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    _private: (),
}

impl ConsoleSink {
    /// Creates a console sink.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

fn log(line: &str) {
    web_sys::console::log_1(&JsValue::from_str(line));
}

fn debug(line: &str) {
    web_sys::console::debug_1(&JsValue::from_str(line));
}

impl TraceSink for ConsoleSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        log(&format!(
            "[toplayer] {} {:?} gen={} depth={}",
            e.kind.as_str(),
            e.direction,
            e.generation,
            e.depth,
        ));
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        debug(&format!(
            "[toplayer] ignored {:?} gen={}",
            e.reason, e.generation,
        ));
    }

    fn on_reap(&mut self, e: &ReapEvent) {
        log(&format!(
            "[toplayer] reaped {} gen={} depth={}",
            e.kind.as_str(),
            e.generation,
            e.depth,
        ));
    }

    fn on_change(&mut self, e: &ChangeEvent) {
        debug(&format!(
            "[toplayer] change gen={} depth={} source={:?}",
            e.generation, e.depth, e.source,
        ));
    }

    #[cfg(feature = "trace-rich")]
    fn on_mutation_batch(&mut self, e: &toplayer_core::trace::MutationBatchEvent) {
        debug(&format!(
            "[toplayer] mutations gen={} removed={} reaped={}",
            e.generation, e.removed_nodes, e.reaped,
        ));
    }
}
