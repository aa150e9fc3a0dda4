// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Component-facing binding.
//!
//! A [`TopLayerBinding`] is what component code holds: one bindable element
//! reference plus a [`TopLayerView`] that tracks the top layer for as long as
//! the binding lives. Each binding owns its own change-event subscription,
//! registered with an `AbortSignal` so it is removed by aborting its
//! controller exactly once, on [`release`](TopLayerBinding::release) or drop.

use std::cell::RefCell;
use std::rc::Rc;

use toplayer_core::consumer::Consumer;
use toplayer_core::view::TopLayerView;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{AbortController, AddEventListenerOptions, Element, Event};

use crate::install::{self, Installation};

type ChangeCallback = Box<dyn FnMut(&TopLayerView<Element>)>;

/// Live top-layer view for one component.
///
/// Creating a binding installs the document listeners if needed, takes an
/// initial snapshot, and subscribes to change signals. When no document is
/// available, or installing fails, the binding stays in the empty view.
///
/// ```rust,ignore
/// let binding = TopLayerBinding::new();
/// binding.bind(&dialog);
/// binding.on_change(|view| {
///     if view.is_top_element {
///         // handle Escape, trap focus, ...
///     }
/// });
/// dialog.show_modal()?;
/// ```
pub struct TopLayerBinding {
    consumer: Rc<RefCell<Consumer<Element>>>,
    callback: Rc<RefCell<Option<ChangeCallback>>>,
    subscription: Option<ChangeSubscription>,
}

/// The change listener and the controller that removes it.
struct ChangeSubscription {
    controller: AbortController,
    _listener: Closure<dyn FnMut(Event)>,
}

impl core::fmt::Debug for TopLayerBinding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let consumer = self.consumer.borrow();
        f.debug_struct("TopLayerBinding")
            .field("bound", &consumer.element().is_some())
            .field("view", consumer.view())
            .field("subscribed", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for TopLayerBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl TopLayerBinding {
    /// Creates an unbound binding subscribed to change signals.
    #[must_use]
    pub fn new() -> Self {
        let installed = matches!(install::install(), Ok(true));
        let consumer = Rc::new(RefCell::new(Consumer::new(install::snapshot())));
        let callback: Rc<RefCell<Option<ChangeCallback>>> = Rc::new(RefCell::new(None));
        let subscription = install::installation()
            .filter(|_| installed)
            .and_then(|inst| subscribe(&inst, &consumer, &callback).ok());
        Self {
            consumer,
            callback,
            subscription,
        }
    }

    /// Binds `element`, replacing any previous binding, and re-derives the
    /// view immediately.
    pub fn bind(&self, element: &Element) {
        self.consumer.borrow_mut().bind(Some(element.clone()));
    }

    /// Clears the bound element and re-derives the view immediately.
    pub fn unbind(&self) {
        self.consumer.borrow_mut().bind(None);
    }

    /// Returns the bound element.
    #[must_use]
    pub fn element(&self) -> Option<Element> {
        self.consumer.borrow().element().cloned()
    }

    /// Returns the current view.
    ///
    /// The returned value is a copy; later changes never alter it.
    #[must_use]
    pub fn view(&self) -> TopLayerView<Element> {
        self.consumer.borrow().view().clone()
    }

    /// Calls `callback` with the new view after every change signal,
    /// replacing any previous callback.
    ///
    /// The callback may read the binding, rebind it, replace the callback, or
    /// cause further top-layer changes. Change signals raised while the
    /// callback runs still refresh the view but do not call it again.
    pub fn on_change(&self, callback: impl FnMut(&TopLayerView<Element>) + 'static) {
        *self.callback.borrow_mut() = Some(Box::new(callback));
    }

    /// Returns `true` while the binding receives change signals.
    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Returns `true` once [`release`](Self::release) has been called.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.consumer.borrow().is_released()
    }

    /// Unsubscribes and freezes the view.
    ///
    /// Returns `true` the first time and `false` on every later call.
    pub fn release(&mut self) -> bool {
        let released = self.consumer.borrow_mut().release();
        if let Some(sub) = self.subscription.take() {
            sub.controller.abort();
        }
        self.callback.borrow_mut().take();
        released
    }
}

impl Drop for TopLayerBinding {
    fn drop(&mut self) {
        self.release();
    }
}

fn subscribe(
    inst: &Installation,
    consumer: &Rc<RefCell<Consumer<Element>>>,
    callback: &Rc<RefCell<Option<ChangeCallback>>>,
) -> Result<ChangeSubscription, JsValue> {
    let controller = AbortController::new()?;

    let consumer = Rc::clone(consumer);
    let callback = Rc::clone(callback);
    let listener = Closure::wrap(Box::new(move |_event: Event| {
        let view = {
            let mut consumer = consumer.borrow_mut();
            if !consumer.refresh(install::snapshot()) {
                return;
            }
            consumer.view().clone()
        };
        // Out of the cell while it runs, so a nested change signal raised by
        // the callback itself refreshes the view without re-entering it.
        let Some(mut current) = callback.borrow_mut().take() else {
            return;
        };
        current(&view);
        let mut slot = callback.borrow_mut();
        if slot.is_none() && !consumer.borrow().is_released() {
            *slot = Some(current);
        }
    }) as Box<dyn FnMut(Event)>);

    let options = AddEventListenerOptions::new();
    options.set_signal(&controller.signal());
    inst.document
        .add_event_listener_with_callback_and_add_event_listener_options(
            inst.config.change_event,
            listener.as_ref().unchecked_ref(),
            &options,
        )?;

    Ok(ChangeSubscription {
        controller,
        _listener: listener,
    })
}
