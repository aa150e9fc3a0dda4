// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element view of the top layer.

use core::fmt;

use crate::registry::Snapshot;

/// A component's relationship to the top layer, derived from one snapshot.
///
/// Every field is computed by [`derive`](Self::derive) from the same
/// [`Snapshot`], so the fields can never disagree with each other or with
/// [`top_layer_list`](Self::top_layer_list). In particular
/// `is_top_element` implies `is_in_top_layer`.
#[derive(Clone, PartialEq)]
pub struct TopLayerView<E> {
    /// The most recently entered element, if any.
    pub top_element: Option<E>,
    /// The most recently entered dialog, if any. A popover opened after it
    /// does not change this.
    pub top_dialog: Option<E>,
    /// Whether the bound element is anywhere in the top layer.
    pub is_in_top_layer: bool,
    /// Whether the bound element is the top element.
    pub is_top_element: bool,
    /// The full ordered membership, most recent last.
    pub top_layer_list: Snapshot<E>,
}

impl<E: fmt::Debug> fmt::Debug for TopLayerView<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TopLayerView")
            .field("top_element", &self.top_element)
            .field("top_dialog", &self.top_dialog)
            .field("is_in_top_layer", &self.is_in_top_layer)
            .field("is_top_element", &self.is_top_element)
            .field("top_layer_list", &self.top_layer_list.elements())
            .finish()
    }
}

impl<E> Default for TopLayerView<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> TopLayerView<E> {
    /// The view with nothing in the top layer and nothing bound.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            top_element: None,
            top_dialog: None,
            is_in_top_layer: false,
            is_top_element: false,
            top_layer_list: Snapshot::empty(),
        }
    }
}

impl<E: Clone + PartialEq> TopLayerView<E> {
    /// Derives the view of `bound` from `snapshot`.
    ///
    /// Pure: the result depends only on the arguments.
    #[must_use]
    pub fn derive(snapshot: &Snapshot<E>, bound: Option<&E>) -> Self {
        let top_element = snapshot.last().cloned();
        let top_dialog = snapshot.last_dialog().cloned();
        let is_top_element = bound.is_some() && bound == top_element.as_ref();
        let is_in_top_layer = bound.is_some_and(|el| snapshot.contains(el));
        Self {
            top_element,
            top_dialog,
            is_in_top_layer,
            is_top_element,
            top_layer_list: snapshot.clone(),
        }
    }
}
