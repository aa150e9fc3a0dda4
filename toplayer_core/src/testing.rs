// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated document shared by unit tests.

use alloc::vec::Vec;

use crate::element::{ElementKind, Probe};

/// Handle to a node in a [`FakeDoc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct El(pub(crate) u32);

#[derive(Debug)]
struct Node {
    kind: Option<ElementKind>,
    open: bool,
    parent: Option<u32>,
    /// Only meaningful for roots (`parent == None`).
    attached: bool,
}

/// A tiny tree of nodes with open/closed state.
#[derive(Debug, Default)]
pub(crate) struct FakeDoc {
    nodes: Vec<Node>,
}

impl FakeDoc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: Option<ElementKind>, parent: Option<El>) -> El {
        let idx = u32::try_from(self.nodes.len()).expect("too many nodes");
        self.nodes.push(Node {
            kind,
            open: false,
            parent: parent.map(|p| p.0),
            attached: parent.is_none(),
        });
        El(idx)
    }

    /// An attached `<dialog>` directly under the body.
    pub(crate) fn dialog(&mut self) -> El {
        self.push(Some(ElementKind::Dialog), None)
    }

    /// An attached popover element directly under the body.
    pub(crate) fn popover(&mut self) -> El {
        self.push(Some(ElementKind::Popover), None)
    }

    /// An attached plain element directly under the body.
    pub(crate) fn div(&mut self) -> El {
        self.push(None, None)
    }

    /// An element nested under `parent`.
    pub(crate) fn child(&mut self, parent: El, kind: Option<ElementKind>) -> El {
        self.push(kind, Some(parent))
    }

    pub(crate) fn open(&mut self, el: El) {
        self.nodes[el.0 as usize].open = true;
    }

    pub(crate) fn close(&mut self, el: El) {
        self.nodes[el.0 as usize].open = false;
    }

    /// Detaches `el` (and with it its subtree) from the document.
    pub(crate) fn detach(&mut self, el: El) {
        let node = &mut self.nodes[el.0 as usize];
        node.parent = None;
        node.attached = false;
    }

    /// Re-attaches a detached root directly under the body.
    pub(crate) fn attach(&mut self, el: El) {
        let node = &mut self.nodes[el.0 as usize];
        node.parent = None;
        node.attached = true;
    }
}

impl Probe<El> for FakeDoc {
    fn kind(&self, element: &El) -> Option<ElementKind> {
        self.nodes[element.0 as usize].kind
    }

    fn is_open(&self, element: &El) -> bool {
        self.nodes[element.0 as usize].open
    }

    fn is_connected(&self, element: &El) -> bool {
        let mut idx = element.0;
        loop {
            let node = &self.nodes[idx as usize];
            match node.parent {
                Some(parent) => idx = parent,
                None => return node.attached,
            }
        }
    }

    fn contains(&self, ancestor: &El, element: &El) -> bool {
        let mut cur = Some(element.0);
        while let Some(idx) = cur {
            if idx == ancestor.0 {
                return true;
            }
            cur = self.nodes[idx as usize].parent;
        }
        false
    }
}
