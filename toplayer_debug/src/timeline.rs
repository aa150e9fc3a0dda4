// Copyright 2026 the Toplayer Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recorded events carry no wall-clock time, so the timestamp of each event is
//! its position in the recording. Every change signal also emits a counter
//! sample, which renders as a stack-depth graph.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();

    for (ts, recorded) in decode(bytes).enumerate() {
        match recorded {
            RecordedEvent::Transition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.direction),
                    "cat": e.kind.as_str(),
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "generation": e.generation,
                        "depth": e.depth,
                    }
                }));
            }
            RecordedEvent::Ignored(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Ignored",
                    "cat": "Detect",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "generation": e.generation,
                        "reason": format!("{:?}", e.reason),
                    }
                }));
            }
            RecordedEvent::Reap(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Reap",
                    "cat": e.kind.as_str(),
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "generation": e.generation,
                        "depth": e.depth,
                    }
                }));
            }
            RecordedEvent::Change(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "TopLayerDepth",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "depth": e.depth,
                    }
                }));
                events.push(json!({
                    "ph": "i",
                    "name": "Change",
                    "cat": format!("{:?}", e.source),
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "generation": e.generation,
                    }
                }));
            }
            RecordedEvent::MutationBatch(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "MutationBatch",
                    "cat": "Rich",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "generation": e.generation,
                        "removed_nodes": e.removed_nodes,
                        "reaped": e.reaped,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use toplayer_core::element::ElementKind;
    use toplayer_core::trace::{
        ChangeEvent, Direction, IgnoreReason, IgnoredEvent, Source, TraceSink, TransitionEvent,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_transition(&TransitionEvent {
            generation: 1,
            kind: ElementKind::Dialog,
            direction: Direction::Entered,
            depth: 1,
        });
        rec.on_change(&ChangeEvent {
            generation: 1,
            depth: 1,
            source: Source::Toggle,
        });
        rec.on_ignored(&IgnoredEvent {
            generation: 1,
            reason: IgnoreReason::AlreadyTracked,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["ph"], "i");
        assert_eq!(parsed[0]["name"], "Entered");
        assert_eq!(parsed[0]["cat"], "dialog");
        assert_eq!(parsed[0]["ts"], 0);

        // A change emits a counter sample and an instant at the same position.
        assert_eq!(parsed[1]["ph"], "C");
        assert_eq!(parsed[1]["args"]["depth"], 1);
        assert_eq!(parsed[2]["name"], "Change");
        assert_eq!(parsed[2]["ts"], 1);

        assert_eq!(parsed[3]["args"]["reason"], "AlreadyTracked");
        assert_eq!(parsed[3]["ts"], 2);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
