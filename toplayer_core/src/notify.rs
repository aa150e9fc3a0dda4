// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Notifications produced by registry changes, and their delivery.
//!
//! Detection and reaping never announce anything themselves. They return
//! owned [`Notification`] lists, and the caller hands those to a
//! [`Dispatcher`] once it has released its hold on the registry. Listeners
//! that read the registry from inside a change handler therefore always see
//! the settled state.
//!
//! [`ChangeNotifier`] is a ready-made dispatcher for hosts without a DOM
//! event system: it broadcasts [`Notification::Changed`] to subscribed
//! callbacks, each held alive by a revocable [`Subscription`].

use alloc::rc::{Rc, Weak};
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

/// Where an exit notification is delivered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target<E> {
    /// The element itself, which is still attached and can receive it.
    Element(E),
    /// The document, because the element was detached and can no longer
    /// receive a targeted notification.
    Document,
}

/// One announcement a backend must deliver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification<E> {
    /// The element entered the top layer. Delivered on the element.
    Entered(E),
    /// An element left the top layer.
    Exited(Target<E>),
    /// Membership changed. Delivered once per net change, on the document.
    Changed {
        /// Registry generation after the change.
        generation: u64,
    },
}

impl<E> Notification<E> {
    /// Returns the `inTopLayer` payload for entry and exit notifications, and
    /// `None` for [`Changed`](Self::Changed).
    #[must_use]
    pub const fn in_top_layer(&self) -> Option<bool> {
        match self {
            Self::Entered(_) => Some(true),
            Self::Exited(_) => Some(false),
            Self::Changed { .. } => None,
        }
    }

    /// Returns `true` for [`Changed`](Self::Changed).
    #[must_use]
    pub const fn is_change(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }
}

/// Delivers notifications to a host.
///
/// Both the DOM backend and [`ChangeNotifier`] implement this trait, enabling
/// generic wiring and test doubles.
pub trait Dispatcher<E> {
    /// Delivers a single notification.
    fn dispatch(&mut self, notification: &Notification<E>);

    /// Delivers notifications in order.
    fn dispatch_all(&mut self, notifications: &[Notification<E>]) {
        for n in notifications {
            self.dispatch(n);
        }
    }
}

// ---------------------------------------------------------------------------
// ChangeNotifier
// ---------------------------------------------------------------------------

type Listener = Rc<dyn Fn(u64)>;

struct NotifierInner {
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_id: Cell<u64>,
}

/// Single-threaded broadcast of registry change signals.
///
/// Listeners receive the generation announced by each
/// [`Notification::Changed`]. Entry and exit notifications are ignored; a
/// listener is expected to re-read the registry rather than interpret
/// payloads. Cloning a `ChangeNotifier` yields another handle to the same
/// listener list.
#[derive(Clone)]
pub struct ChangeNotifier {
    inner: Rc<NotifierInner>,
}

impl fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier {
    /// Creates a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(NotifierInner {
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Registers `listener` until the returned [`Subscription`] is revoked or
    /// dropped.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, listener: impl Fn(u64) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner
            .listeners
            .borrow_mut()
            .push((id, Rc::new(listener)));
        Subscription {
            notifier: Rc::downgrade(&self.inner),
            id,
            active: true,
        }
    }

    /// Calls every current listener with `generation`.
    ///
    /// The listener list is copied first, so listeners may subscribe or
    /// revoke (themselves included) while being notified. A listener revoked
    /// during this call may still receive this one signal.
    pub fn notify(&self, generation: u64) {
        let listeners: Vec<Listener> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .map(|(_, l)| Rc::clone(l))
            .collect();
        for listener in listeners {
            listener(generation);
        }
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

impl<E> Dispatcher<E> for ChangeNotifier {
    fn dispatch(&mut self, notification: &Notification<E>) {
        if let Notification::Changed { generation } = notification {
            self.notify(*generation);
        }
    }
}

/// Handle keeping a [`ChangeNotifier`] listener registered.
///
/// Revocation happens exactly once: through [`revoke`](Self::revoke), or on
/// drop if it was never revoked.
pub struct Subscription {
    notifier: Weak<NotifierInner>,
    id: u64,
    active: bool,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl Subscription {
    /// Unregisters the listener.
    ///
    /// Returns `true` the first time and `false` on every later call.
    pub fn revoke(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.active = false;
        if let Some(inner) = self.notifier.upgrade() {
            inner.listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
        true
    }

    /// Returns `true` until the subscription is revoked.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.revoke();
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn recorder(notifier: &ChangeNotifier) -> (Rc<RefCell<Vec<u64>>>, Subscription) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let sub = notifier.subscribe(move |generation| sink.borrow_mut().push(generation));
        (seen, sub)
    }

    #[test]
    fn broadcasts_to_every_listener() {
        let notifier = ChangeNotifier::new();
        let (a, _sub_a) = recorder(&notifier);
        let (b, _sub_b) = recorder(&notifier);
        notifier.notify(3);
        assert_eq!(*a.borrow(), vec![3]);
        assert_eq!(*b.borrow(), vec![3]);
    }

    #[test]
    fn revoke_is_exactly_once() {
        let notifier = ChangeNotifier::new();
        let (seen, mut sub) = recorder(&notifier);
        assert!(sub.revoke());
        assert!(!sub.revoke());
        assert!(!sub.is_active());
        notifier.notify(1);
        assert!(seen.borrow().is_empty());
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn drop_revokes() {
        let notifier = ChangeNotifier::new();
        let (seen, sub) = recorder(&notifier);
        drop(sub);
        notifier.notify(1);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn revoking_one_leaves_others() {
        let notifier = ChangeNotifier::new();
        let (a, mut sub_a) = recorder(&notifier);
        let (b, _sub_b) = recorder(&notifier);
        sub_a.revoke();
        notifier.notify(5);
        assert!(a.borrow().is_empty());
        assert_eq!(*b.borrow(), vec![5]);
    }

    #[test]
    fn dispatcher_forwards_only_changes() {
        let mut notifier = ChangeNotifier::new();
        let (seen, _sub) = recorder(&notifier);
        notifier.dispatch_all(&[
            Notification::Entered(1_u32),
            Notification::Changed { generation: 1 },
            Notification::Exited(Target::Document),
            Notification::Changed { generation: 2 },
        ]);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn listener_may_subscribe_during_notify() {
        let notifier = ChangeNotifier::new();
        let late = Rc::new(RefCell::new(None));
        let handle = notifier.clone();
        let slot = Rc::clone(&late);
        let _sub = notifier.subscribe(move |_| {
            if slot.borrow().is_none() {
                *slot.borrow_mut() = Some(handle.subscribe(|_| {}));
            }
        });
        notifier.notify(1);
        assert_eq!(notifier.listener_count(), 2);
    }

    #[test]
    fn subscription_outliving_notifier_is_harmless() {
        let notifier = ChangeNotifier::new();
        let (_seen, mut sub) = recorder(&notifier);
        drop(notifier);
        assert!(sub.revoke());
    }

    #[test]
    fn payloads() {
        assert_eq!(Notification::Entered(1_u32).in_top_layer(), Some(true));
        assert_eq!(
            Notification::<u32>::Exited(Target::Document).in_top_layer(),
            Some(false)
        );
        assert_eq!(
            Notification::<u32>::Changed { generation: 0 }.in_top_layer(),
            None
        );
    }
}
