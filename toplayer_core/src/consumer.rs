// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-component consumer state.
//!
//! A [`Consumer`] binds at most one element and keeps the
//! [`TopLayerView`] of that element current. Its owner subscribes to the
//! change signal and calls [`refresh`](Consumer::refresh) with a fresh
//! snapshot on every signal. Once [`release`](Consumer::release)d, the
//! consumer ignores all further refreshes, so a torn-down component never
//! reacts to late signals.

use crate::registry::Snapshot;
use crate::view::TopLayerView;

/// Bound element plus the view derived for it.
#[derive(Clone, Debug)]
pub struct Consumer<E> {
    element: Option<E>,
    snapshot: Snapshot<E>,
    view: TopLayerView<E>,
    released: bool,
}

impl<E: Clone + PartialEq> Consumer<E> {
    /// Creates an unbound consumer whose view is derived from `initial`.
    ///
    /// Pass the registry's current snapshot so the view is correct before
    /// any change signal fires.
    #[must_use]
    pub fn new(initial: Snapshot<E>) -> Self {
        let view = TopLayerView::derive(&initial, None);
        Self {
            element: None,
            snapshot: initial,
            view,
            released: false,
        }
    }

    /// Sets (or clears) the bound element and re-derives the view from the
    /// last snapshot seen.
    ///
    /// Has no effect after release.
    pub fn bind(&mut self, element: Option<E>) {
        if self.released {
            return;
        }
        self.element = element;
        self.view = TopLayerView::derive(&self.snapshot, self.element.as_ref());
    }

    /// Replaces the snapshot and re-derives every field of the view from it.
    ///
    /// Returns `false`, leaving the view untouched, once released.
    pub fn refresh(&mut self, snapshot: Snapshot<E>) -> bool {
        if self.released {
            return false;
        }
        self.view = TopLayerView::derive(&snapshot, self.element.as_ref());
        self.snapshot = snapshot;
        true
    }

    /// Stops reacting to refreshes.
    ///
    /// Returns `true` the first time and `false` on every later call.
    pub fn release(&mut self) -> bool {
        !core::mem::replace(&mut self.released, true)
    }
}

impl<E> Consumer<E> {
    /// Returns the bound element.
    #[must_use]
    pub fn element(&self) -> Option<&E> {
        self.element.as_ref()
    }

    /// Returns the current view.
    #[must_use]
    pub fn view(&self) -> &TopLayerView<E> {
        &self.view
    }

    /// Returns `true` once [`release`](Self::release) has been called.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }
}

#[cfg(test)]
mod tests {
    //! End-to-end scenarios over a simulated document: toggles and removals
    //! feed the registry, notifications go through a [`ChangeNotifier`], and
    //! subscribed consumers re-derive their views.

    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::{Cell, RefCell};

    use super::*;
    use crate::detect::on_toggle;
    use crate::element::ElementKind;
    use crate::notify::{ChangeNotifier, Dispatcher, Notification, Subscription, Target};
    use crate::reap::reap_orphans;
    use crate::registry::TopLayerRegistry;
    use crate::testing::{El, FakeDoc};
    use crate::trace::Tracer;

    /// Registry, document, and notifier wired the way a backend wires them.
    struct World {
        doc: FakeDoc,
        registry: Rc<RefCell<TopLayerRegistry<El>>>,
        notifier: ChangeNotifier,
        delivered: Vec<Notification<El>>,
        signals: Rc<Cell<u32>>,
        _counter: Subscription,
    }

    impl World {
        fn new() -> Self {
            let notifier = ChangeNotifier::new();
            let signals = Rc::new(Cell::new(0));
            let count = Rc::clone(&signals);
            let counter = notifier.subscribe(move |_| count.set(count.get() + 1));
            Self {
                doc: FakeDoc::new(),
                registry: Rc::new(RefCell::new(TopLayerRegistry::new())),
                notifier,
                delivered: Vec::new(),
                signals,
                _counter: counter,
            }
        }

        fn toggle(&mut self, el: El) {
            let transition = on_toggle(
                &mut self.registry.borrow_mut(),
                &self.doc,
                Some(&el),
                &mut Tracer::none(),
            );
            if let Some(t) = transition {
                self.deliver(&t.notifications());
            }
        }

        fn show(&mut self, el: El) {
            self.doc.open(el);
            self.toggle(el);
        }

        fn hide(&mut self, el: El) {
            self.doc.close(el);
            self.toggle(el);
        }

        fn remove(&mut self, el: El) {
            self.doc.detach(el);
            let reaped = reap_orphans(
                &mut self.registry.borrow_mut(),
                &self.doc,
                [el],
                &mut Tracer::none(),
            );
            self.deliver(&reaped.notifications());
        }

        fn deliver(&mut self, notifications: &[Notification<El>]) {
            self.delivered.extend_from_slice(notifications);
            self.notifier.dispatch_all(notifications);
        }

        /// A consumer kept fresh by its own subscription.
        fn consumer(&self) -> (Rc<RefCell<Consumer<El>>>, Subscription) {
            let consumer = Rc::new(RefCell::new(Consumer::new(
                self.registry.borrow().snapshot(),
            )));
            let registry = Rc::clone(&self.registry);
            let target = Rc::clone(&consumer);
            let sub = self.notifier.subscribe(move |_| {
                let snapshot = registry.borrow().snapshot();
                target.borrow_mut().refresh(snapshot);
            });
            (consumer, sub)
        }
    }

    #[test]
    fn fresh_consumer_is_empty() {
        let world = World::new();
        let (consumer, _sub) = world.consumer();
        let view = consumer.borrow().view().clone();
        assert_eq!(view.top_element, None);
        assert_eq!(view.top_dialog, None);
        assert!(!view.is_in_top_layer);
        assert!(!view.is_top_element);
        assert!(view.top_layer_list.is_empty());
    }

    #[test]
    fn entries_are_listed_in_order() {
        let mut world = World::new();
        let (consumer, _sub) = world.consumer();
        let els: Vec<El> = (0..4)
            .map(|i| {
                if i % 2 == 0 {
                    world.doc.dialog()
                } else {
                    world.doc.popover()
                }
            })
            .collect();
        for &el in &els {
            world.show(el);
        }
        let c = consumer.borrow();
        assert_eq!(c.view().top_layer_list.elements(), els.as_slice());
        assert_eq!(c.view().top_element, Some(els[3]));
        assert_eq!(world.signals.get(), 4);
    }

    #[test]
    fn dialog_precedence() {
        let mut world = World::new();
        let (consumer, _sub) = world.consumer();
        let d = world.doc.dialog();
        let p = world.doc.popover();
        let d2 = world.doc.dialog();

        world.show(d);
        world.show(p);
        assert_eq!(consumer.borrow().view().top_element, Some(p));
        assert_eq!(consumer.borrow().view().top_dialog, Some(d));

        world.show(d2);
        assert_eq!(consumer.borrow().view().top_dialog, Some(d2));
    }

    #[test]
    fn exit_removes_exactly_one_and_reentry_appends() {
        let mut world = World::new();
        let (consumer, _sub) = world.consumer();
        let a = world.doc.dialog();
        let b = world.doc.popover();
        world.show(a);
        world.show(b);

        world.hide(a);
        assert_eq!(consumer.borrow().view().top_layer_list.elements(), &[b]);

        world.show(a);
        assert_eq!(consumer.borrow().view().top_layer_list.elements(), &[b, a]);
    }

    #[test]
    fn ancestor_removal_cleans_up_and_signals() {
        let mut world = World::new();
        let (consumer, _sub) = world.consumer();
        let wrapper = world.doc.div();
        let d = world.doc.child(wrapper, Some(ElementKind::Dialog));
        consumer.borrow_mut().bind(Some(d));
        world.show(d);
        assert!(consumer.borrow().view().is_top_element);
        let before = world.signals.get();

        world.remove(wrapper);
        assert_eq!(world.signals.get(), before + 1);
        let c = consumer.borrow();
        assert!(c.view().top_layer_list.is_empty());
        assert!(!c.view().is_in_top_layer);
        assert_eq!(
            world.delivered[world.delivered.len() - 2..],
            [
                Notification::Exited(Target::Document),
                Notification::Changed { generation: 2 },
            ]
        );
    }

    #[test]
    fn duplicate_entry_fires_nothing() {
        let mut world = World::new();
        let (consumer, _sub) = world.consumer();
        let d = world.doc.dialog();
        world.show(d);
        let delivered = world.delivered.len();
        world.show(d);
        assert_eq!(world.delivered.len(), delivered);
        assert_eq!(world.signals.get(), 1);
        assert_eq!(consumer.borrow().view().top_layer_list.elements(), &[d]);
    }

    #[test]
    fn released_consumer_stops_updating() {
        let mut world = World::new();
        let (consumer, mut sub) = world.consumer();
        let d = world.doc.dialog();
        world.show(d);
        let held = consumer.borrow().view().clone();

        assert!(sub.revoke());
        assert!(consumer.borrow_mut().release());
        assert!(!consumer.borrow_mut().release());

        let p = world.doc.popover();
        world.show(p);
        assert_eq!(held.top_layer_list.elements(), &[d]);
        assert_eq!(consumer.borrow().view().top_layer_list.elements(), &[d]);
        assert!(!consumer.borrow_mut().refresh(world.registry.borrow().snapshot()));
    }

    #[test]
    fn rebinding_rederives_without_a_signal() {
        let mut world = World::new();
        let (consumer, _sub) = world.consumer();
        let a = world.doc.dialog();
        let b = world.doc.popover();
        world.show(a);
        world.show(b);

        consumer.borrow_mut().bind(Some(a));
        let view = consumer.borrow().view().clone();
        assert!(view.is_in_top_layer);
        assert!(!view.is_top_element);

        consumer.borrow_mut().bind(Some(b));
        assert!(consumer.borrow().view().is_top_element);

        consumer.borrow_mut().bind(None);
        assert!(!consumer.borrow().view().is_in_top_layer);
    }

    #[test]
    fn consumer_created_late_sees_current_state() {
        let mut world = World::new();
        let d = world.doc.dialog();
        world.show(d);
        let (consumer, _sub) = world.consumer();
        assert_eq!(consumer.borrow().view().top_element, Some(d));
    }

    #[test]
    fn every_consumer_is_refreshed() {
        let mut world = World::new();
        let consumers: Vec<_> = (0..3).map(|_| world.consumer()).collect();
        let d = world.doc.dialog();
        world.show(d);
        for (consumer, _) in &consumers {
            assert_eq!(consumer.borrow().view().top_layer_list.elements(), &[d]);
        }
        assert_eq!(world.delivered.iter().filter(|n| n.is_change()).count(), 1);
        assert_eq!(vec![d], world.registry.borrow().snapshot().elements());
    }
}
