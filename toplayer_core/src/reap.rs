// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cleanup of tracked elements detached by tree mutations.
//!
//! An open dialog or popover can leave the document without ever raising an
//! exit toggle: it is removed programmatically, or one of its ancestors is.
//! Backends observe node removals under the document body and pass every
//! removed element of one observer batch to [`reap_orphans`], which drops
//! each tracked element that is a removed node, plus tracked descendants of a
//! removed node that are no longer attached.
//!
//! Removal alone takes an element out of the browser's top layer without a
//! toggle, so a removed node is dropped even if it was re-inserted before the
//! batch was delivered.

use alloc::vec::Vec;

use crate::element::{ElementKind, Probe};
use crate::notify::{Notification, Target};
use crate::registry::TopLayerRegistry;
#[cfg(feature = "trace-rich")]
use crate::trace::MutationBatchEvent;
use crate::trace::{ChangeEvent, ReapEvent, Source, Tracer};

/// One element dropped by [`reap_orphans`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Orphan<E> {
    /// The detached element.
    pub element: E,
    /// The kind it was tracked with.
    pub kind: ElementKind,
    /// Registry generation right after its removal.
    pub generation: u64,
}

/// Elements dropped by one mutation batch, in removal order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reaped<E> {
    orphans: Vec<Orphan<E>>,
}

impl<E> Default for Reaped<E> {
    fn default() -> Self {
        Self {
            orphans: Vec::new(),
        }
    }
}

impl<E> Reaped<E> {
    /// Returns `true` if nothing was reaped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orphans.is_empty()
    }

    /// Returns the number of reaped elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orphans.len()
    }

    /// Returns the reaped elements in removal order.
    #[must_use]
    pub fn orphans(&self) -> &[Orphan<E>] {
        &self.orphans
    }

    /// Returns the notifications to deliver: for every orphan, a
    /// document-level exit followed by its own change signal.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification<E>> {
        self.orphans
            .iter()
            .flat_map(|o| {
                [
                    Notification::Exited(Target::Document),
                    Notification::Changed {
                        generation: o.generation,
                    },
                ]
            })
            .collect()
    }
}

/// Drops tracked elements detached by one batch of node removals.
///
/// `removed` yields every removed element of the batch in delivery order,
/// duplicates allowed. A tracked element is reaped when it is one of the
/// removed nodes, whatever its current state, or when it is a descendant of
/// one and the probe reports it detached. Already-absent elements produce
/// nothing.
pub fn reap_orphans<E, P, I>(
    registry: &mut TopLayerRegistry<E>,
    probe: &P,
    removed: I,
    tracer: &mut Tracer<'_>,
) -> Reaped<E>
where
    E: Clone + PartialEq,
    P: Probe<E> + ?Sized,
    I: IntoIterator<Item = E>,
{
    let mut reaped = Reaped::default();
    #[cfg(feature = "trace-rich")]
    let mut removed_nodes: u32 = 0;

    for node in removed {
        #[cfg(feature = "trace-rich")]
        {
            removed_nodes = removed_nodes.saturating_add(1);
        }
        if registry.is_empty() {
            continue;
        }

        let doomed: Vec<E> = registry
            .iter()
            .filter(|(el, _)| {
                **el == node || (probe.contains(&node, el) && !probe.is_connected(el))
            })
            .map(|(el, _)| el.clone())
            .collect();

        for element in doomed {
            let Some(kind) = registry.take(&element) else {
                continue;
            };
            let generation = registry.generation();
            let depth = registry.len();
            tracer.reap(&ReapEvent {
                generation,
                kind,
                depth,
            });
            tracer.change(&ChangeEvent {
                generation,
                depth,
                source: Source::Orphan,
            });
            reaped.orphans.push(Orphan {
                element,
                kind,
                generation,
            });
        }
    }

    #[cfg(feature = "trace-rich")]
    {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "registry depth never approaches u32::MAX"
        )]
        let reaped_count = reaped.len() as u32;
        tracer.mutation_batch(&MutationBatchEvent {
            generation: registry.generation(),
            removed_nodes,
            reaped: reaped_count,
        });
    }

    reaped
}
