// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records, each prefixed by a one-byte
//! tag. [`decode`] reads them back as an iterator of [`RecordedEvent`].
//!
//! Depths are stored as `u32`, saturating.

use toplayer_core::element::ElementKind;
use toplayer_core::trace::{
    ChangeEvent, Direction, IgnoreReason, IgnoredEvent, MutationBatchEvent, ReapEvent, Source,
    TraceSink, TransitionEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_TRANSITION: u8 = 1;
const TAG_IGNORED: u8 = 2;
const TAG_REAP: u8 = 3;
const TAG_CHANGE: u8 = 4;
const TAG_MUTATION_BATCH: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_depth(&mut self, depth: usize) {
        self.write_u32(u32::try_from(depth).unwrap_or(u32::MAX));
    }

    fn write_kind(&mut self, kind: ElementKind) {
        self.write_u8(match kind {
            ElementKind::Dialog => 0,
            ElementKind::Popover => 1,
        });
    }

    fn write_direction(&mut self, direction: Direction) {
        self.write_u8(match direction {
            Direction::Entered => 0,
            Direction::Exited => 1,
        });
    }

    fn write_reason(&mut self, reason: IgnoreReason) {
        self.write_u8(match reason {
            IgnoreReason::NoTarget => 0,
            IgnoreReason::UnsupportedKind => 1,
            IgnoreReason::AlreadyTracked => 2,
            IgnoreReason::NotTracked => 3,
        });
    }

    fn write_source(&mut self, source: Source) {
        self.write_u8(match source {
            Source::Toggle => 0,
            Source::Orphan => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_u64(e.generation);
        self.write_kind(e.kind);
        self.write_direction(e.direction);
        self.write_depth(e.depth);
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        self.write_u8(TAG_IGNORED);
        self.write_u64(e.generation);
        self.write_reason(e.reason);
    }

    fn on_reap(&mut self, e: &ReapEvent) {
        self.write_u8(TAG_REAP);
        self.write_u64(e.generation);
        self.write_kind(e.kind);
        self.write_depth(e.depth);
    }

    fn on_change(&mut self, e: &ChangeEvent) {
        self.write_u8(TAG_CHANGE);
        self.write_u64(e.generation);
        self.write_depth(e.depth);
        self.write_source(e.source);
    }

    fn on_mutation_batch(&mut self, e: &MutationBatchEvent) {
        self.write_u8(TAG_MUTATION_BATCH);
        self.write_u64(e.generation);
        self.write_u32(e.removed_nodes);
        self.write_u32(e.reaped);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// An [`IgnoredEvent`].
    Ignored(IgnoredEvent),
    /// A [`ReapEvent`].
    Reap(ReapEvent),
    /// A [`ChangeEvent`].
    Change(ChangeEvent),
    /// A [`MutationBatchEvent`].
    MutationBatch(MutationBatchEvent),
}

impl RecordedEvent {
    /// Returns the registry generation carried by the event.
    #[must_use]
    pub fn generation(&self) -> u64 {
        match self {
            Self::Transition(e) => e.generation,
            Self::Ignored(e) => e.generation,
            Self::Reap(e) => e.generation,
            Self::Change(e) => e.generation,
            Self::MutationBatch(e) => e.generation,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_depth(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_kind(&mut self) -> Option<ElementKind> {
        Some(match self.read_u8()? {
            0 => ElementKind::Dialog,
            _ => ElementKind::Popover,
        })
    }

    fn read_direction(&mut self) -> Option<Direction> {
        Some(match self.read_u8()? {
            0 => Direction::Entered,
            _ => Direction::Exited,
        })
    }

    fn read_reason(&mut self) -> Option<IgnoreReason> {
        Some(match self.read_u8()? {
            0 => IgnoreReason::NoTarget,
            1 => IgnoreReason::UnsupportedKind,
            2 => IgnoreReason::AlreadyTracked,
            _ => IgnoreReason::NotTracked,
        })
    }

    fn read_source(&mut self) -> Option<Source> {
        Some(match self.read_u8()? {
            0 => Source::Toggle,
            _ => Source::Orphan,
        })
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            generation: self.read_u64()?,
            kind: self.read_kind()?,
            direction: self.read_direction()?,
            depth: self.read_depth()?,
        }))
    }

    fn decode_ignored(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Ignored(IgnoredEvent {
            generation: self.read_u64()?,
            reason: self.read_reason()?,
        }))
    }

    fn decode_reap(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reap(ReapEvent {
            generation: self.read_u64()?,
            kind: self.read_kind()?,
            depth: self.read_depth()?,
        }))
    }

    fn decode_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Change(ChangeEvent {
            generation: self.read_u64()?,
            depth: self.read_depth()?,
            source: self.read_source()?,
        }))
    }

    fn decode_mutation_batch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::MutationBatch(MutationBatchEvent {
            generation: self.read_u64()?,
            removed_nodes: self.read_u32()?,
            reaped: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_u8()? {
            TAG_TRANSITION => self.decode_transition(),
            TAG_IGNORED => self.decode_ignored(),
            TAG_REAP => self.decode_reap(),
            TAG_CHANGE => self.decode_change(),
            TAG_MUTATION_BATCH => self.decode_mutation_batch(),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
