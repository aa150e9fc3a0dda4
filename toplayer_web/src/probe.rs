// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM queries backing [`Probe`].

use toplayer_core::config::TopLayerConfig;
use toplayer_core::element::{ElementKind, Probe};
use web_sys::{Element, Node};

/// Answers [`Probe`] queries against live `web_sys::Element`s.
#[derive(Clone, Copy, Debug)]
pub struct DomProbe {
    config: TopLayerConfig,
}

impl DomProbe {
    /// Creates a probe using the tag, attribute, and selector names from
    /// `config`.
    #[must_use]
    pub const fn new(config: TopLayerConfig) -> Self {
        Self { config }
    }
}

impl Probe<Element> for DomProbe {
    fn kind(&self, element: &Element) -> Option<ElementKind> {
        if element
            .tag_name()
            .eq_ignore_ascii_case(self.config.dialog_tag)
        {
            Some(ElementKind::Dialog)
        } else if element.has_attribute(self.config.popover_attribute) {
            Some(ElementKind::Popover)
        } else {
            None
        }
    }

    /// Tests each selector of the list on its own. An engine that does not
    /// know one of the pseudo-classes rejects the whole list, and a rejected
    /// selector counts as "not matching".
    fn is_open(&self, element: &Element) -> bool {
        self.config
            .open_selector
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .any(|s| element.matches(s).unwrap_or(false))
    }

    fn is_connected(&self, element: &Element) -> bool {
        element.is_connected()
    }

    fn contains(&self, ancestor: &Element, element: &Element) -> bool {
        let node: &Node = element;
        ancestor.contains(Some(node))
    }
}
