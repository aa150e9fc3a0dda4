// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ordered top-layer membership with snapshotting.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use crate::element::ElementKind;

/// Ordered set of elements currently believed to be in the top layer.
///
/// Entries are kept in entry order, most recent last. Element handles and
/// their kinds live in parallel arrays. Every insertion or deletion bumps the
/// [`generation`](Self::generation) counter; no-op calls leave it untouched.
///
/// The registry has no notification responsibility. Callers that mutate it
/// decide what to announce, based on the `bool` results of
/// [`add`](Self::add) and [`remove`](Self::remove).
pub struct TopLayerRegistry<E> {
    elements: Vec<E>,
    kinds: Vec<ElementKind>,
    generation: u64,
}

impl<E> Default for TopLayerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for TopLayerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopLayerRegistry")
            .field("len", &self.elements.len())
            .field("kinds", &self.kinds)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<E> TopLayerRegistry<E> {
    /// Creates an empty registry at generation 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elements: Vec::new(),
            kinds: Vec::new(),
            generation: 0,
        }
    }

    /// Returns the number of tracked elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if nothing is tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of membership changes applied so far.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Iterates over tracked elements and their kinds in entry order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&E, ElementKind)> + '_ {
        self.elements.iter().zip(self.kinds.iter().copied())
    }
}

impl<E: Clone + PartialEq> TopLayerRegistry<E> {
    /// Inserts `element` as the last entry if it is not already tracked.
    ///
    /// Returns `true` if the element was inserted. An element that is already
    /// tracked keeps its position and kind.
    pub fn add(&mut self, element: E, kind: ElementKind) -> bool {
        if self.contains(&element) {
            return false;
        }
        self.elements.push(element);
        self.kinds.push(kind);
        self.generation += 1;
        true
    }

    /// Removes `element` if it is tracked.
    ///
    /// Returns whether a deletion occurred. Removing an untracked element is
    /// a no-op.
    pub fn remove(&mut self, element: &E) -> bool {
        self.take(element).is_some()
    }

    /// Removes `element` if it is tracked and returns the kind it was
    /// recorded with.
    pub fn take(&mut self, element: &E) -> Option<ElementKind> {
        let idx = self.position(element)?;
        // Order must be preserved, so no swap_remove.
        self.elements.remove(idx);
        let kind = self.kinds.remove(idx);
        self.generation += 1;
        Some(kind)
    }

    /// Returns `true` if `element` is tracked.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.position(element).is_some()
    }

    /// Returns the entry-order index of `element`, if tracked.
    #[must_use]
    pub fn position(&self, element: &E) -> Option<usize> {
        self.elements.iter().position(|e| e == element)
    }

    /// Captures the current membership as an immutable [`Snapshot`].
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<E> {
        Snapshot {
            elements: Rc::from(self.elements.as_slice()),
            kinds: Rc::from(self.kinds.as_slice()),
            generation: self.generation,
        }
    }
}

/// Immutable ordered copy of top-layer membership at one instant.
///
/// Cloning is cheap (two reference-count bumps). Snapshots are never mutated;
/// every registry change yields a fresh one.
pub struct Snapshot<E> {
    elements: Rc<[E]>,
    kinds: Rc<[ElementKind]>,
    generation: u64,
}

impl<E> Clone for Snapshot<E> {
    fn clone(&self) -> Self {
        Self {
            elements: Rc::clone(&self.elements),
            kinds: Rc::clone(&self.kinds),
            generation: self.generation,
        }
    }
}

impl<E> Default for Snapshot<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: fmt::Debug> fmt::Debug for Snapshot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("elements", &self.elements)
            .field("kinds", &self.kinds)
            .field("generation", &self.generation)
            .finish()
    }
}

/// Snapshots compare by content. The generation they were taken at is
/// ignored, so a snapshot taken after an exit and re-entry of the same
/// elements in the same order equals the earlier one.
impl<E: PartialEq> PartialEq for Snapshot<E> {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements && self.kinds == other.kinds
    }
}

impl<E> Snapshot<E> {
    /// Returns a snapshot with no elements, at generation 0.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            elements: Rc::from(Vec::new()),
            kinds: Rc::from(Vec::new()),
            generation: 0,
        }
    }

    /// Returns the elements in entry order, most recent last.
    #[must_use]
    pub fn elements(&self) -> &[E] {
        &self.elements
    }

    /// Returns the kinds, parallel to [`elements`](Self::elements).
    #[must_use]
    pub fn kinds(&self) -> &[ElementKind] {
        &self.kinds
    }

    /// Returns the registry generation this snapshot was taken at.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the snapshot holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the most recently entered element.
    #[must_use]
    pub fn last(&self) -> Option<&E> {
        self.elements.last()
    }

    /// Returns the most recently entered dialog, scanning from the end.
    #[must_use]
    pub fn last_dialog(&self) -> Option<&E> {
        self.iter()
            .rev()
            .find_map(|(e, kind)| kind.is_dialog().then_some(e))
    }

    /// Iterates over elements and their kinds in entry order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&E, ElementKind)> + '_ {
        self.elements.iter().zip(self.kinds.iter().copied())
    }
}

impl<E: PartialEq> Snapshot<E> {
    /// Returns `true` if `element` is part of the snapshot.
    #[must_use]
    pub fn contains(&self, element: &E) -> bool {
        self.elements.contains(element)
    }
}
