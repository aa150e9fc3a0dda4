// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform-independent core for tracking the browser top layer.
//!
//! `toplayer_core` keeps an ordered record of which elements currently sit in
//! the top layer (modal dialogs and open popovers) and derives, for any bound
//! element, whether it is in the top layer and whether it is the topmost
//! entry. It is `no_std` compatible (with `alloc`) and generic over the element
//! handle, so the same logic runs against a real DOM or a simulated document.
//!
//! # Architecture
//!
//! Two independent producers feed one registry, and every net change is
//! turned into a list of notifications that a backend applies afterwards:
//!
//! ```text
//!   toggle event ──► detect::on_toggle ──┐
//!                                        ├──► TopLayerRegistry
//!   removed nodes ──► reap::reap_orphans ┘          │
//!                                                   ▼
//!                           Transition / Reaped ──► Notification list
//!                                                   │
//!                                                   ▼
//!                                        Dispatcher::dispatch()
//!                                                   │
//!                                                   ▼
//!                         Consumer::refresh(snapshot) ──► TopLayerView
//! ```
//!
//! **[`registry`]**: Ordered set with struct-of-arrays storage and a
//! generation counter. Produces immutable [`Snapshot`](registry::Snapshot)s.
//!
//! **[`element`]**: [`ElementKind`](element::ElementKind) and the
//! [`Probe`](element::Probe) trait through which the core queries the host
//! document.
//!
//! **[`detect`]**: Classifies toggle notifications into entries and exits.
//!
//! **[`reap`]**: Drops tracked elements that left the document through a
//! tree mutation instead of an exit toggle.
//!
//! **[`notify`]**: [`Notification`](notify::Notification), the
//! [`Dispatcher`](notify::Dispatcher) trait backends implement, and
//! [`ChangeNotifier`](notify::ChangeNotifier) for non-DOM hosts.
//!
//! **[`view`]**: Pure derivation of [`TopLayerView`](view::TopLayerView)
//! from a snapshot and a bound element.
//!
//! **[`consumer`]**: Per-component state that re-derives its view on every
//! change signal until released.
//!
//! **[`config`]**: Event names and selectors used by backends.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-batch
//!   mutation events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod consumer;
pub mod detect;
pub mod element;
pub mod notify;
pub mod reap;
pub mod registry;
pub mod trace;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;
