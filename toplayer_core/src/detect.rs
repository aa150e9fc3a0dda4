// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Classification of toggle notifications into top-layer transitions.
//!
//! Browsers raise a `toggle` event whenever a dialog or popover is shown or
//! hidden. The event does not bubble, so backends listen for it in the
//! capture phase at the document root and forward every target here.
//! [`on_toggle`] reads the target's current state through a [`Probe`],
//! updates the registry, and reports a [`Transition`] only when membership
//! actually changed.

use crate::element::{ElementKind, Probe};
use crate::notify::{Notification, Target};
use crate::registry::TopLayerRegistry;
use crate::trace::{
    ChangeEvent, Direction, IgnoreReason, IgnoredEvent, Source, TransitionEvent, Tracer,
};

/// A membership change caused by a toggle notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition<E> {
    /// The element that entered or exited.
    pub element: E,
    /// Its top-layer kind.
    pub kind: ElementKind,
    /// Whether it entered or exited.
    pub direction: Direction,
    /// Registry generation after the change.
    pub generation: u64,
}

impl<E: Clone> Transition<E> {
    /// Returns the notifications this transition must produce, in order: the
    /// targeted entry or exit announcement, then the change signal.
    #[must_use]
    pub fn notifications(&self) -> [Notification<E>; 2] {
        let scoped = match self.direction {
            Direction::Entered => Notification::Entered(self.element.clone()),
            Direction::Exited => Notification::Exited(Target::Element(self.element.clone())),
        };
        [
            scoped,
            Notification::Changed {
                generation: self.generation,
            },
        ]
    }
}

/// Classifies one toggle notification and applies it to `registry`.
///
/// `target` is `None` when the notification had no target or its target was
/// not an element. The element enters when it is both open and attached;
/// anything else is an exit. Returns `None` when nothing changed: no target,
/// an element that is neither dialog nor popover, an entry for an element
/// already tracked, or an exit for one that is not.
pub fn on_toggle<E, P>(
    registry: &mut TopLayerRegistry<E>,
    probe: &P,
    target: Option<&E>,
    tracer: &mut Tracer<'_>,
) -> Option<Transition<E>>
where
    E: Clone + PartialEq,
    P: Probe<E> + ?Sized,
{
    let Some(element) = target else {
        return ignore(tracer, registry.generation(), IgnoreReason::NoTarget);
    };
    let Some(kind) = probe.kind(element) else {
        return ignore(tracer, registry.generation(), IgnoreReason::UnsupportedKind);
    };

    let direction = if probe.is_open(element) && probe.is_connected(element) {
        if !registry.add(element.clone(), kind) {
            return ignore(tracer, registry.generation(), IgnoreReason::AlreadyTracked);
        }
        Direction::Entered
    } else {
        if !registry.remove(element) {
            return ignore(tracer, registry.generation(), IgnoreReason::NotTracked);
        }
        Direction::Exited
    };

    let generation = registry.generation();
    let depth = registry.len();
    tracer.transition(&TransitionEvent {
        generation,
        kind,
        direction,
        depth,
    });
    tracer.change(&ChangeEvent {
        generation,
        depth,
        source: Source::Toggle,
    });

    Some(Transition {
        element: element.clone(),
        kind,
        direction,
        generation,
    })
}

fn ignore<T>(tracer: &mut Tracer<'_>, generation: u64, reason: IgnoreReason) -> Option<T> {
    tracer.ignored(&IgnoredEvent { generation, reason });
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{El, FakeDoc};

    fn toggle(reg: &mut TopLayerRegistry<El>, doc: &FakeDoc, el: El) -> Option<Transition<El>> {
        on_toggle(reg, doc, Some(&el), &mut Tracer::none())
    }

    #[test]
    fn open_dialog_enters() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let d = doc.dialog();
        doc.open(d);

        let t = toggle(&mut reg, &doc, d).expect("entry");
        assert_eq!(t.direction, Direction::Entered);
        assert_eq!(t.kind, ElementKind::Dialog);
        assert_eq!(t.generation, 1);
        assert_eq!(
            t.notifications(),
            [
                Notification::Entered(d),
                Notification::Changed { generation: 1 }
            ]
        );
        assert!(reg.contains(&d));
    }

    #[test]
    fn closed_tracked_element_exits_on_itself() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let p = doc.popover();
        doc.open(p);
        toggle(&mut reg, &doc, p);
        doc.close(p);

        let t = toggle(&mut reg, &doc, p).expect("exit");
        assert_eq!(t.direction, Direction::Exited);
        assert_eq!(
            t.notifications(),
            [
                Notification::Exited(Target::Element(p)),
                Notification::Changed { generation: 2 }
            ]
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn duplicate_entry_is_a_no_op() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let d = doc.dialog();
        doc.open(d);
        assert!(toggle(&mut reg, &doc, d).is_some());
        assert!(toggle(&mut reg, &doc, d).is_none());
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.generation(), 1);
    }

    #[test]
    fn exit_of_untracked_element_is_a_no_op() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let d = doc.dialog();
        assert!(toggle(&mut reg, &doc, d).is_none());
        assert_eq!(reg.generation(), 0);
    }

    #[test]
    fn unsupported_elements_are_ignored() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let div = doc.div();
        doc.open(div);
        assert!(toggle(&mut reg, &doc, div).is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn missing_target_is_ignored() {
        let doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::<El>::new();
        assert!(on_toggle(&mut reg, &doc, None, &mut Tracer::none()).is_none());
    }

    #[test]
    fn open_but_detached_is_an_exit() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let d = doc.dialog();
        doc.open(d);
        toggle(&mut reg, &doc, d);
        doc.detach(d);

        let t = toggle(&mut reg, &doc, d).expect("exit");
        assert_eq!(t.direction, Direction::Exited);
        assert!(reg.is_empty());
    }

    #[test]
    fn open_but_detached_never_enters() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let d = doc.dialog();
        doc.open(d);
        doc.detach(d);
        assert!(toggle(&mut reg, &doc, d).is_none());
    }

    #[test]
    fn reentry_goes_to_the_end() {
        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let a = doc.dialog();
        let b = doc.popover();
        doc.open(a);
        toggle(&mut reg, &doc, a);
        doc.open(b);
        toggle(&mut reg, &doc, b);

        doc.close(a);
        toggle(&mut reg, &doc, a);
        assert_eq!(reg.snapshot().elements(), &[b]);

        doc.open(a);
        toggle(&mut reg, &doc, a);
        assert_eq!(reg.snapshot().elements(), &[b, a]);
    }

    #[cfg(feature = "trace")]
    #[test]
    fn ignored_inputs_are_traced_with_reasons() {
        use alloc::vec::Vec;

        use crate::trace::TraceSink;

        #[derive(Default)]
        struct Reasons(Vec<IgnoreReason>);

        impl TraceSink for Reasons {
            fn on_ignored(&mut self, e: &IgnoredEvent) {
                self.0.push(e.reason);
            }
        }

        let mut doc = FakeDoc::new();
        let mut reg = TopLayerRegistry::new();
        let d = doc.dialog();
        let div = doc.div();
        let mut sink = Reasons::default();
        {
            let mut tracer = Tracer::new(&mut sink);
            on_toggle(&mut reg, &doc, None, &mut tracer);
            on_toggle(&mut reg, &doc, Some(&div), &mut tracer);
            on_toggle(&mut reg, &doc, Some(&d), &mut tracer);
            doc.open(d);
            on_toggle(&mut reg, &doc, Some(&d), &mut tracer);
            on_toggle(&mut reg, &doc, Some(&d), &mut tracer);
        }
        assert_eq!(
            sink.0,
            [
                IgnoreReason::NoTarget,
                IgnoreReason::UnsupportedKind,
                IgnoreReason::NotTracked,
                IgnoreReason::AlreadyTracked,
            ]
        );
    }
}
