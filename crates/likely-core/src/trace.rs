//! Trace events: the explicit instrumentation interface
//!
//! The original design hangs off a process-wide trace hook; here the
//! instrumentation collaborator is explicit. Whoever runs the traced
//! program (an in-process harness, or an external instrumenter writing
//! JSONL) builds one [`TraceEvent`] per call/return and hands it to the
//! aggregator. Bindings are a snapshot taken at the event, never a
//! live reference into the traced program.

use std::collections::BTreeMap;
use std::fmt;

use crate::value::Value;
use crate::{Error, Result};

/// The moment of observation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Function entry
    Call,
    /// Function exit
    Return,
    /// Any other kind arriving on the wire (line events, exceptions).
    /// The aggregator ignores these.
    #[serde(other)]
    Other,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Call => write!(f, "call"),
            EventKind::Return => write!(f, "return"),
            EventKind::Other => write!(f, "other"),
        }
    }
}

/// One observed event: function, moment, and a snapshot of the
/// locals visible at that moment. `ret` is only meaningful on
/// `return` events.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TraceEvent {
    pub function: String,
    pub event: EventKind,
    #[serde(default)]
    pub bindings: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ret: Option<Value>,
}

impl TraceEvent {
    /// Build a `call` event from a binding snapshot
    pub fn call<S, N, I>(function: S, bindings: I) -> Self
    where
        S: Into<String>,
        N: Into<String>,
        I: IntoIterator<Item = (N, Value)>,
    {
        TraceEvent {
            function: function.into(),
            event: EventKind::Call,
            bindings: bindings.into_iter().map(|(n, v)| (n.into(), v)).collect(),
            ret: None,
        }
    }

    /// Build a `return` event from a binding snapshot and return value
    pub fn ret<S, N, I>(function: S, bindings: I, ret: Value) -> Self
    where
        S: Into<String>,
        N: Into<String>,
        I: IntoIterator<Item = (N, Value)>,
    {
        TraceEvent {
            function: function.into(),
            event: EventKind::Return,
            bindings: bindings.into_iter().map(|(n, v)| (n.into(), v)).collect(),
            ret: Some(ret),
        }
    }

    /// Parse one JSONL wire line into an event
    pub fn from_json_line(line: &str) -> Result<Self> {
        serde_json::from_str(line).map_err(|e| Error::TraceFormat(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_wire_names() {
        assert_eq!(
            serde_json::from_str::<EventKind>("\"call\"").unwrap(),
            EventKind::Call
        );
        assert_eq!(
            serde_json::from_str::<EventKind>("\"return\"").unwrap(),
            EventKind::Return
        );
        // unknown kinds fold into Other instead of failing the line
        assert_eq!(
            serde_json::from_str::<EventKind>("\"exception\"").unwrap(),
            EventKind::Other
        );
    }

    #[test]
    fn test_trace_event_from_jsonl_line() {
        let line = r#"{"function":"double","event":"return","bindings":{"x":3},"ret":70}"#;
        let event: TraceEvent = serde_json::from_str(line).unwrap();
        assert_eq!(event.function, "double");
        assert_eq!(event.event, EventKind::Return);
        assert_eq!(event.bindings["x"], Value::Int(3));
        assert_eq!(event.ret, Some(Value::Int(70)));
    }

    #[test]
    fn test_bindings_default_to_empty() {
        let line = r#"{"function":"noop","event":"call"}"#;
        let event: TraceEvent = serde_json::from_str(line).unwrap();
        assert!(event.bindings.is_empty());
        assert!(event.ret.is_none());
    }

    #[test]
    fn test_from_json_line_rejects_garbage() {
        let err = TraceEvent::from_json_line("not json at all").unwrap_err();
        assert!(err.to_string().contains("trace format error"));
    }

    #[test]
    fn test_constructors() {
        let event = TraceEvent::ret("square", [("x", Value::Float(2.0))], Value::Float(4.0));
        assert_eq!(event.event, EventKind::Return);
        assert_eq!(event.bindings.len(), 1);
        assert_eq!(event.ret, Some(Value::Float(4.0)));
    }
}
