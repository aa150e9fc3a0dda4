// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delivery of notifications as DOM events.
//!
//! Entry and exit notifications become bubbling `CustomEvent`s named by
//! [`TopLayerConfig::transition_event`] whose `detail` is
//! `{ inTopLayer: boolean }`. Change signals become a plain `Event` named by
//! [`TopLayerConfig::change_event`], dispatched on the document.

use js_sys::{Object, Reflect};
use toplayer_core::config::TopLayerConfig;
use toplayer_core::notify::{Dispatcher, Notification, Target};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{CustomEvent, CustomEventInit, Document, Element, Event, EventTarget};

const IN_TOP_LAYER: &str = "inTopLayer";

/// Dispatches [`Notification`]s as DOM events.
#[derive(Debug)]
pub struct DomDispatcher<'a> {
    document: &'a Document,
    config: &'a TopLayerConfig,
}

impl<'a> DomDispatcher<'a> {
    /// Creates a dispatcher targeting `document` for document-level events.
    #[must_use]
    pub const fn new(document: &'a Document, config: &'a TopLayerConfig) -> Self {
        Self { document, config }
    }

    fn transition(&self, target: &EventTarget, in_top_layer: bool) -> Result<bool, JsValue> {
        let event = transition_event(self.config.transition_event, in_top_layer)?;
        target.dispatch_event(&event)
    }

    fn change(&self) -> Result<bool, JsValue> {
        let event = Event::new(self.config.change_event)?;
        self.document.dispatch_event(&event)
    }
}

impl Dispatcher<Element> for DomDispatcher<'_> {
    fn dispatch(&mut self, notification: &Notification<Element>) {
        // Delivery is fire-and-forget; a throwing listener must not stop the
        // remaining notifications.
        let _ = match notification {
            Notification::Entered(element) => self.transition(element, true),
            Notification::Exited(Target::Element(element)) => self.transition(element, false),
            Notification::Exited(Target::Document) => self.transition(self.document, false),
            Notification::Changed { .. } => self.change(),
        };
    }
}

/// Builds a bubbling transition event carrying `{ inTopLayer }` as detail.
pub fn transition_event(name: &str, in_top_layer: bool) -> Result<CustomEvent, JsValue> {
    let detail = Object::new();
    Reflect::set(
        &detail,
        &JsValue::from_str(IN_TOP_LAYER),
        &JsValue::from_bool(in_top_layer),
    )?;
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail);
    CustomEvent::new_with_event_init_dict(name, &init)
}

/// Reads the `inTopLayer` flag from a transition event.
///
/// Returns `None` for events that are not `CustomEvent`s or carry no boolean
/// `inTopLayer` detail.
#[must_use]
pub fn in_top_layer(event: &Event) -> Option<bool> {
    let detail = event.dyn_ref::<CustomEvent>()?.detail();
    Reflect::get(&detail, &JsValue::from_str(IN_TOP_LAYER))
        .ok()?
        .as_bool()
}
