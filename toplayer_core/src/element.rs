// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element kinds and host document queries.
//!
//! The core never owns elements. It holds clonable handles whose equality is
//! identity (for `web_sys::Element`, JS `===`), and asks a [`Probe`] about
//! their current state whenever it needs to classify one.

/// Which top-layer primitive an element is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// A `<dialog>` element, whether shown modally or as a popover.
    Dialog,
    /// Any other element carrying the `popover` attribute.
    Popover,
}

impl ElementKind {
    /// Returns `true` for [`Dialog`](Self::Dialog).
    #[must_use]
    pub const fn is_dialog(self) -> bool {
        matches!(self, Self::Dialog)
    }

    /// Returns a short lowercase label for log output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dialog => "dialog",
            Self::Popover => "popover",
        }
    }
}

/// Read-only queries against the host document.
///
/// Backends implement this over their native element handle. All queries
/// reflect the state at the moment of the call.
pub trait Probe<E> {
    /// Returns the element's top-layer kind, or `None` if it supports neither
    /// dialog nor popover semantics.
    fn kind(&self, element: &E) -> Option<ElementKind>;

    /// Returns whether the element currently matches the modal or
    /// popover-open state.
    fn is_open(&self, element: &E) -> bool;

    /// Returns whether the element is attached to the document.
    fn is_connected(&self, element: &E) -> bool;

    /// Returns whether `element` is `ancestor` or one of its descendants.
    ///
    /// Must keep answering for subtrees that were just detached.
    fn contains(&self, ancestor: &E, element: &E) -> bool;
}

impl<E, P: Probe<E> + ?Sized> Probe<E> for &P {
    fn kind(&self, element: &E) -> Option<ElementKind> {
        (**self).kind(element)
    }

    fn is_open(&self, element: &E) -> bool {
        (**self).is_open(element)
    }

    fn is_connected(&self, element: &E) -> bool {
        (**self).is_connected(element)
    }

    fn contains(&self, ancestor: &E, element: &E) -> bool {
        (**self).contains(ancestor, element)
    }
}
