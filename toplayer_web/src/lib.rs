// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for toplayer.
//!
//! This crate connects [`toplayer_core`] to the DOM:
//!
//! - [`install`]: capture-phase `toggle` listener plus a `MutationObserver`
//!   over the body, both feeding one per-thread registry
//! - [`DomProbe`]: dialog/popover classification and open-state queries
//! - [`DomDispatcher`]: `topLayer` transition events and the document-level
//!   `toplayerchange` signal
//! - [`TopLayerBinding`]: per-component live [`TopLayerView`]
//! - [`ConsoleSink`]: trace output to the browser console
//!
//! ```rust,ignore
//! use toplayer_web::TopLayerBinding;
//!
//! let binding = TopLayerBinding::new();
//! binding.bind(&dialog);
//! dialog.show_modal()?;
//! // After the toggle event has been delivered:
//! assert!(binding.view().is_top_element);
//! ```
//!
//! Only `<dialog>` elements and elements with a `popover` attribute are
//! tracked. Elements put in the top layer by the Fullscreen API are not.

mod binding;
mod console;
mod dispatch;
mod install;
mod probe;

pub use binding::TopLayerBinding;
pub use console::ConsoleSink;
pub use dispatch::{DomDispatcher, in_top_layer, transition_event};
pub use install::{
    clear_trace_sink, config, install, install_with, is_installed, set_trace_sink, snapshot,
};
pub use probe::DomProbe;
pub use toplayer_core::config::TopLayerConfig;
pub use toplayer_core::registry::Snapshot;
pub use toplayer_core::view::TopLayerView;
