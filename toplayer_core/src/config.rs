// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event names and selectors used by backends.

/// Names and selectors a backend uses to observe and announce top-layer
/// changes.
///
/// The core itself does not read these; they are carried here so that every
/// backend and every consumer of a backend agree on one set of names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopLayerConfig {
    /// Native event raised when a dialog or popover is shown or hidden.
    pub toggle_event: &'static str,
    /// Bubbling event dispatched on entry and exit, with an `inTopLayer`
    /// boolean in its detail.
    pub transition_event: &'static str,
    /// Document-level event fired once per net membership change.
    pub change_event: &'static str,
    /// Selector matching elements that are currently modal or popover-open.
    pub open_selector: &'static str,
    /// Attribute marking an element as a popover.
    pub popover_attribute: &'static str,
    /// Tag name identifying dialog elements, compared case-insensitively.
    pub dialog_tag: &'static str,
    /// Whether removals anywhere below the observed root are reported, not
    /// just its direct children.
    pub observe_subtree: bool,
}

impl TopLayerConfig {
    /// Default configuration for browsers.
    #[must_use]
    pub const fn web() -> Self {
        Self {
            toggle_event: "toggle",
            transition_event: "topLayer",
            change_event: "toplayerchange",
            open_selector: ":modal, :popover-open",
            popover_attribute: "popover",
            dialog_tag: "DIALOG",
            observe_subtree: true,
        }
    }
}

impl Default for TopLayerConfig {
    fn default() -> Self {
        Self::web()
    }
}
