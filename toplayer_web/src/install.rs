// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document-level listeners and the per-thread registry.
//!
//! Installing registers two observers on the current document:
//!
//! - a capture-phase listener for the toggle event, since that event does not
//!   bubble and capture at the root is the only way to see every target;
//! - a `MutationObserver` over the body's subtree, reporting removed nodes.
//!
//! Both feed one [`TopLayerRegistry`] that lives for the rest of the page.
//! Registry borrows end before any notification is dispatched, so listeners
//! reacting to a notification can read [`snapshot`] freely.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::Array;
use toplayer_core::config::TopLayerConfig;
use toplayer_core::notify::{Dispatcher as _, Notification};
use toplayer_core::registry::{Snapshot, TopLayerRegistry};
use toplayer_core::trace::{TraceSink, Tracer};
use toplayer_core::{detect, reap};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, HtmlElement, MutationObserver,
    MutationObserverInit, MutationRecord, NodeList,
};

use crate::dispatch::DomDispatcher;
use crate::probe::DomProbe;

type ToggleClosure = Closure<dyn FnMut(Event)>;
type MutationClosure = Closure<dyn FnMut(Array, MutationObserver)>;

thread_local! {
    static INSTALLATION: RefCell<Option<Rc<Installation>>> = const { RefCell::new(None) };
    static TRACE_SINK: RefCell<Option<Box<dyn TraceSink>>> = const { RefCell::new(None) };
}

/// Live state behind [`install`]. Never torn down once created.
pub(crate) struct Installation {
    pub(crate) document: Document,
    pub(crate) config: TopLayerConfig,
    probe: DomProbe,
    registry: RefCell<TopLayerRegistry<Element>>,
    listeners: RefCell<Option<Listeners>>,
}

/// JS callbacks kept alive for as long as the installation exists.
struct Listeners {
    _toggle: ToggleClosure,
    _observer: MutationObserver,
    _mutations: MutationClosure,
}

impl core::fmt::Debug for Installation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Installation")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("listening", &self.listeners.borrow().is_some())
            .finish_non_exhaustive()
    }
}

impl Installation {
    fn new(document: Document, config: TopLayerConfig) -> Self {
        Self {
            document,
            config,
            probe: DomProbe::new(config),
            registry: RefCell::new(TopLayerRegistry::new()),
            listeners: RefCell::new(None),
        }
    }

    /// Registers the toggle listener and the mutation observer.
    fn listen(self: &Rc<Self>, body: &HtmlElement) -> Result<Listeners, JsValue> {
        let weak = Rc::downgrade(self);
        let mutations = Closure::wrap(Box::new(move |records: Array, _: MutationObserver| {
            if let Some(inst) = weak.upgrade() {
                inst.on_mutations(&records);
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let observer = MutationObserver::new(mutations.as_ref().unchecked_ref())?;

        let weak: Weak<Self> = Rc::downgrade(self);
        let toggle = Closure::wrap(Box::new(move |event: Event| {
            if let Some(inst) = weak.upgrade() {
                inst.on_toggle(&event);
            }
        }) as Box<dyn FnMut(Event)>);
        let options = AddEventListenerOptions::new();
        options.set_capture(true);
        self.document
            .add_event_listener_with_callback_and_add_event_listener_options(
                self.config.toggle_event,
                toggle.as_ref().unchecked_ref(),
                &options,
            )?;

        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(self.config.observe_subtree);
        if let Err(err) = observer.observe_with_options(body, &init) {
            // The toggle closure is about to be dropped; it must not stay
            // registered.
            let _ = self.document.remove_event_listener_with_callback_and_bool(
                self.config.toggle_event,
                toggle.as_ref().unchecked_ref(),
                true,
            );
            return Err(err);
        }

        Ok(Listeners {
            _toggle: toggle,
            _observer: observer,
            _mutations: mutations,
        })
    }

    fn on_toggle(&self, event: &Event) {
        let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
        let transition = with_tracer(|tracer| {
            detect::on_toggle(
                &mut self.registry.borrow_mut(),
                &self.probe,
                target.as_ref(),
                tracer,
            )
        });
        if let Some(transition) = transition {
            self.dispatch(&transition.notifications());
        }
    }

    fn on_mutations(&self, records: &Array) {
        let removed: Vec<Element> = records
            .iter()
            .filter_map(|r| r.dyn_into::<MutationRecord>().ok())
            .flat_map(|r| removed_elements(r.removed_nodes()))
            .collect();
        if removed.is_empty() {
            return;
        }
        let reaped = with_tracer(|tracer| {
            reap::reap_orphans(&mut self.registry.borrow_mut(), &self.probe, removed, tracer)
        });
        if !reaped.is_empty() {
            self.dispatch(&reaped.notifications());
        }
    }

    fn dispatch(&self, notifications: &[Notification<Element>]) {
        DomDispatcher::new(&self.document, &self.config).dispatch_all(notifications);
    }

    pub(crate) fn snapshot(&self) -> Snapshot<Element> {
        self.registry.borrow().snapshot()
    }
}

fn removed_elements(nodes: NodeList) -> impl Iterator<Item = Element> {
    (0..nodes.length())
        .filter_map(move |i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

/// Runs `f` with a tracer bound to the installed trace sink, if any.
fn with_tracer<R>(f: impl FnOnce(&mut Tracer<'_>) -> R) -> R {
    TRACE_SINK.with(|slot| {
        let mut sink = slot.borrow_mut();
        let mut tracer = match sink.as_deref_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        f(&mut tracer)
    })
}

/// Returns the active installation, if any.
pub(crate) fn installation() -> Option<Rc<Installation>> {
    INSTALLATION.with(|slot| slot.borrow().clone())
}

/// Installs the document listeners with [`TopLayerConfig::web`].
///
/// See [`install_with`].
pub fn install() -> Result<bool, JsValue> {
    install_with(TopLayerConfig::web())
}

/// Installs the document listeners with a custom configuration.
///
/// Returns `Ok(true)` once listeners are active, including when an earlier
/// call already installed them (the first configuration wins). Returns
/// `Ok(false)` when there is no window, document, or body yet; nothing is
/// registered and a later call may succeed. Errors come from the platform
/// refusing to create the observer or register a listener.
pub fn install_with(config: TopLayerConfig) -> Result<bool, JsValue> {
    if installation().is_some() {
        return Ok(true);
    }
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return Ok(false);
    };
    let Some(body) = document.body() else {
        return Ok(false);
    };

    let inst = Rc::new(Installation::new(document, config));
    let listeners = inst.listen(&body)?;
    *inst.listeners.borrow_mut() = Some(listeners);
    INSTALLATION.with(|slot| *slot.borrow_mut() = Some(inst));
    Ok(true)
}

/// Returns `true` once [`install`] or [`install_with`] has succeeded.
#[must_use]
pub fn is_installed() -> bool {
    installation().is_some()
}

/// Returns the configuration in effect, if installed.
#[must_use]
pub fn config() -> Option<TopLayerConfig> {
    installation().map(|inst| inst.config)
}

/// Returns the current top-layer membership.
///
/// Empty when not installed.
#[must_use]
pub fn snapshot() -> Snapshot<Element> {
    installation()
        .map(|inst| inst.snapshot())
        .unwrap_or_default()
}

/// Routes trace events from detection and reaping to `sink`.
///
/// Events are only produced when the `trace` feature is enabled.
pub fn set_trace_sink(sink: impl TraceSink + 'static) {
    TRACE_SINK.with(|slot| *slot.borrow_mut() = Some(Box::new(sink)));
}

/// Removes the trace sink set by [`set_trace_sink`].
pub fn clear_trace_sink() {
    TRACE_SINK.with(|slot| slot.borrow_mut().take());
}
