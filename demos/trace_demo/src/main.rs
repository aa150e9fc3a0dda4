// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated document that exercises the tracing and diagnostics pipeline.
//!
//! Opens a modal dialog, stacks a popover menu inside it, closes the menu,
//! reopens it, and finally removes the dialog subtree while the menu is still
//! open. Events go to both a
//! [`PrettyPrintSink`](toplayer_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](toplayer_debug::recorder::RecorderSink); the recording is
//! then exported as a Chrome trace JSON file.

use std::cell::RefCell;
use std::fs::File;
use std::io::BufWriter;
use std::rc::Rc;

use toplayer_core::consumer::Consumer;
use toplayer_core::detect::on_toggle;
use toplayer_core::element::{ElementKind, Probe};
use toplayer_core::notify::{ChangeNotifier, Dispatcher as _, Notification, Target};
use toplayer_core::reap::reap_orphans;
use toplayer_core::registry::TopLayerRegistry;
use toplayer_core::trace::{
    ChangeEvent, IgnoredEvent, MutationBatchEvent, ReapEvent, TraceSink, Tracer, TransitionEvent,
};

use toplayer_debug::pretty::PrettyPrintSink;
use toplayer_debug::recorder::RecorderSink;

/// Element handle: an index into [`Document::nodes`].
type Node = usize;

#[derive(Debug)]
struct NodeData {
    name: &'static str,
    kind: Option<ElementKind>,
    open: bool,
    parent: Option<Node>,
    attached: bool,
}

/// A flat tree with just enough state to answer [`Probe`] queries.
#[derive(Debug, Default)]
struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    fn add(&mut self, name: &'static str, kind: Option<ElementKind>, parent: Option<Node>) -> Node {
        self.nodes.push(NodeData {
            name,
            kind,
            open: false,
            parent,
            attached: parent.is_none(),
        });
        self.nodes.len() - 1
    }

    fn name(&self, node: Node) -> &'static str {
        self.nodes[node].name
    }
}

impl Probe<Node> for Document {
    fn kind(&self, node: &Node) -> Option<ElementKind> {
        self.nodes[*node].kind
    }

    fn is_open(&self, node: &Node) -> bool {
        self.nodes[*node].open
    }

    fn is_connected(&self, node: &Node) -> bool {
        let mut current = Some(*node);
        while let Some(n) = current {
            let data = &self.nodes[n];
            if data.parent.is_none() {
                return data.attached;
            }
            current = data.parent;
        }
        false
    }

    fn contains(&self, ancestor: &Node, node: &Node) -> bool {
        let mut current = Some(*node);
        while let Some(n) = current {
            if n == *ancestor {
                return true;
            }
            current = self.nodes[n].parent;
        }
        false
    }
}

/// Forwards every event to both sinks.
struct Both<'a> {
    pretty: &'a mut PrettyPrintSink,
    recorder: &'a mut RecorderSink,
}

impl TraceSink for Both<'_> {
    fn on_transition(&mut self, e: &TransitionEvent) {
        self.pretty.on_transition(e);
        self.recorder.on_transition(e);
    }

    fn on_ignored(&mut self, e: &IgnoredEvent) {
        self.pretty.on_ignored(e);
        self.recorder.on_ignored(e);
    }

    fn on_reap(&mut self, e: &ReapEvent) {
        self.pretty.on_reap(e);
        self.recorder.on_reap(e);
    }

    fn on_change(&mut self, e: &ChangeEvent) {
        self.pretty.on_change(e);
        self.recorder.on_change(e);
    }

    fn on_mutation_batch(&mut self, e: &MutationBatchEvent) {
        self.pretty.on_mutation_batch(e);
        self.recorder.on_mutation_batch(e);
    }
}

struct Demo {
    doc: Document,
    registry: Rc<RefCell<TopLayerRegistry<Node>>>,
    notifier: ChangeNotifier,
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl Demo {
    fn toggle(&mut self, node: Node) {
        let transition = {
            let mut sink = Both {
                pretty: &mut self.pretty,
                recorder: &mut self.recorder,
            };
            on_toggle(
                &mut self.registry.borrow_mut(),
                &self.doc,
                Some(&node),
                &mut Tracer::new(&mut sink),
            )
        };
        if let Some(t) = transition {
            self.deliver(&t.notifications());
        }
    }

    fn set_open(&mut self, node: Node, open: bool) {
        println!(
            "-- {} {}",
            if open { "show" } else { "hide" },
            self.doc.name(node)
        );
        self.doc.nodes[node].open = open;
        self.toggle(node);
    }

    fn remove(&mut self, node: Node) {
        println!("-- remove {}", self.doc.name(node));
        self.doc.nodes[node].parent = None;
        self.doc.nodes[node].attached = false;
        let reaped = {
            let mut sink = Both {
                pretty: &mut self.pretty,
                recorder: &mut self.recorder,
            };
            reap_orphans(
                &mut self.registry.borrow_mut(),
                &self.doc,
                [node],
                &mut Tracer::new(&mut sink),
            )
        };
        self.deliver(&reaped.notifications());
    }

    fn deliver(&mut self, notifications: &[Notification<Node>]) {
        for n in notifications {
            match n {
                Notification::Entered(node) => {
                    println!("   topLayer({}) in=true", self.doc.name(*node));
                }
                Notification::Exited(Target::Element(node)) => {
                    println!("   topLayer({}) in=false", self.doc.name(*node));
                }
                Notification::Exited(Target::Document) => {
                    println!("   topLayer(document) in=false");
                }
                Notification::Changed { generation } => {
                    println!("   toplayerchange gen={generation}");
                }
            }
        }
        self.notifier.dispatch_all(notifications);
    }
}

fn main() {
    let mut doc = Document::default();
    let body = doc.add("body", None, None);
    let dialog = doc.add("settings-dialog", Some(ElementKind::Dialog), Some(body));
    let form = doc.add("form", None, Some(dialog));
    let menu = doc.add("options-menu", Some(ElementKind::Popover), Some(form));
    let button = doc.add("button", None, Some(body));

    let mut demo = Demo {
        doc,
        registry: Rc::new(RefCell::new(TopLayerRegistry::new())),
        notifier: ChangeNotifier::new(),
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- consumer bound to the dialog ----------------------------------------
    let consumer = Rc::new(RefCell::new(Consumer::new(
        demo.registry.borrow().snapshot(),
    )));
    consumer.borrow_mut().bind(Some(dialog));
    let _subscription = {
        let registry = Rc::clone(&demo.registry);
        let consumer = Rc::clone(&consumer);
        demo.notifier.subscribe(move |_| {
            let snapshot = registry.borrow().snapshot();
            let mut consumer = consumer.borrow_mut();
            consumer.refresh(snapshot);
            let view = consumer.view();
            println!(
                "   view: in_top_layer={} is_top_element={} depth={}",
                view.is_in_top_layer,
                view.is_top_element,
                view.top_layer_list.len(),
            );
        })
    };

    // -- scenario ------------------------------------------------------------
    demo.set_open(dialog, true);
    // A second notification for the same state is ignored.
    demo.toggle(dialog);
    demo.set_open(menu, true);
    demo.set_open(menu, false);
    // Plain elements are never tracked.
    demo.toggle(button);
    demo.set_open(menu, true);
    demo.remove(dialog);

    // -- export Chrome trace -------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    toplayer_debug::timeline::export(demo.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!(
        "Wrote {path} (final depth {})",
        demo.registry.borrow().len()
    );
}
