// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for registry changes.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! detection and reaping paths call as they classify input. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! Events never carry element handles. They describe what happened in terms
//! of [`ElementKind`], registry generation, and registry depth, so sinks stay
//! independent of the host's element type.
//!
//! # Crate features
//!
//! - `trace`: Enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): Gates [`MutationBatchEvent`] and the
//!   corresponding `TraceSink` method.

use crate::element::ElementKind;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Direction of a top-layer transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The element became part of the top layer.
    Entered,
    /// The element left the top layer.
    Exited,
}

impl Direction {
    /// Returns the `inTopLayer` value announced for this direction.
    #[must_use]
    pub const fn in_top_layer(self) -> bool {
        matches!(self, Self::Entered)
    }
}

/// Which producer caused a registry change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// A native toggle notification.
    Toggle,
    /// A tree mutation that detached a tracked element.
    Orphan,
}

/// Why an input was classified as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// The notification had no target, or the target was not an element.
    NoTarget,
    /// The target is neither a dialog nor a popover.
    UnsupportedKind,
    /// An entry was observed for an element that is already tracked.
    AlreadyTracked,
    /// An exit was observed for an element that is not tracked.
    NotTracked,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a toggle notification changes membership.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Registry generation after the change.
    pub generation: u64,
    /// Kind of the element that moved.
    pub kind: ElementKind,
    /// Whether it entered or exited.
    pub direction: Direction,
    /// Number of tracked elements after the change.
    pub depth: usize,
}

/// Emitted when a toggle notification is ignored.
#[derive(Clone, Copy, Debug)]
pub struct IgnoredEvent {
    /// Registry generation at the time (unchanged by this input).
    pub generation: u64,
    /// Why nothing changed.
    pub reason: IgnoreReason,
}

/// Emitted when a detached element is dropped from the registry.
#[derive(Clone, Copy, Debug)]
pub struct ReapEvent {
    /// Registry generation after the removal.
    pub generation: u64,
    /// Kind of the reaped element.
    pub kind: ElementKind,
    /// Number of tracked elements after the removal.
    pub depth: usize,
}

/// Emitted once for every change signal a producer asks to be fired.
#[derive(Clone, Copy, Debug)]
pub struct ChangeEvent {
    /// Registry generation the signal announces.
    pub generation: u64,
    /// Number of tracked elements after the change.
    pub depth: usize,
    /// Which producer made the change.
    pub source: Source,
}

/// Summary of one tree-mutation batch.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct MutationBatchEvent {
    /// Registry generation after the batch.
    pub generation: u64,
    /// Number of removed element nodes delivered in the batch.
    pub removed_nodes: u32,
    /// Number of tracked elements reaped by the batch.
    pub reaped: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the detection and reaping paths.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a toggle changes membership.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a toggle is classified as a no-op.
    fn on_ignored(&mut self, e: &IgnoredEvent) {
        _ = e;
    }

    /// Called when an orphaned element is dropped.
    fn on_reap(&mut self, e: &ReapEvent) {
        _ = e;
    }

    /// Called for every change signal.
    fn on_change(&mut self, e: &ChangeEvent) {
        _ = e;
    }

    /// Called once per mutation batch (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_mutation_batch(&mut self, e: &MutationBatchEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`IgnoredEvent`].
    #[inline]
    pub fn ignored(&mut self, e: &IgnoredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_ignored(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReapEvent`].
    #[inline]
    pub fn reap(&mut self, e: &ReapEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reap(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ChangeEvent`].
    #[inline]
    pub fn change(&mut self, e: &ChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`MutationBatchEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn mutation_batch(&mut self, e: &MutationBatchEvent) {
        if let Some(s) = &mut self.sink {
            s.on_mutation_batch(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
