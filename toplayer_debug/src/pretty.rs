// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use toplayer_core::trace::{
    ChangeEvent, Direction, IgnoreReason, IgnoredEvent, MutationBatchEvent, ReapEvent, Source,
    TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn direction_name(direction: Direction) -> &'static str {
    match direction {
        Direction::Entered => "enter",
        Direction::Exited => "exit",
    }
}

fn reason_name(reason: IgnoreReason) -> &'static str {
    match reason {
        IgnoreReason::NoTarget => "no-target",
        IgnoreReason::UnsupportedKind => "unsupported-kind",
        IgnoreReason::AlreadyTracked => "already-tracked",
        IgnoreReason::NotTracked => "not-tracked",
    }
}

fn source_name(source: Source) -> &'static str {
    match source {
        Source::Toggle => "toggle",
        Source::Orphan => "orphan",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[{}] gen={} {} depth={}",
            direction_name(e.direction),
            e.generation,
            e.kind.as_str(),
            e.depth,
        );
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        let _ = writeln!(
            self.writer,
            "[ignored] gen={} reason={}",
            e.generation,
            reason_name(e.reason),
        );
    }

    fn on_reap(&mut self, e: &ReapEvent) {
        let _ = writeln!(
            self.writer,
            "[reap] gen={} {} depth={}",
            e.generation,
            e.kind.as_str(),
            e.depth,
        );
    }

    fn on_change(&mut self, e: &ChangeEvent) {
        let _ = writeln!(
            self.writer,
            "[change] gen={} depth={} source={}",
            e.generation,
            e.depth,
            source_name(e.source),
        );
    }

    fn on_mutation_batch(&mut self, e: &MutationBatchEvent) {
        let _ = writeln!(
            self.writer,
            "[mutations] gen={} removed={} reaped={}",
            e.generation, e.removed_nodes, e.reaped,
        );
    }
}
