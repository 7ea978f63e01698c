//! Aggregator: accumulates observation records across traced events
//!
//! Owns the (function → event → variable → record) mapping and is the
//! single ingestion point for the instrumentation collaborator. All
//! maps are BTreeMaps so the eventual report iterates in one
//! deterministic order regardless of event arrival order.
//!
//! Single-threaded by design: one observer, one observed program,
//! strictly sequential events. Callers that trace concurrent programs
//! must serialize access themselves.

use std::collections::BTreeMap;

use crate::record::ObservationRecord;
use crate::trace::{EventKind, TraceEvent};
use crate::value::Value;
use crate::Result;

/// Synthetic variable name holding a function's return value,
/// tracked under the `return` event alongside the real locals
pub const RETURN_VARIABLE: &str = "ret";

type VariableRecords = BTreeMap<String, ObservationRecord>;

/// Accumulated observations for every (function, event, variable)
/// triple seen so far
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    variables: BTreeMap<String, BTreeMap<EventKind, VariableRecords>>,
    events_seen: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one traced event into the records.
    ///
    /// Records are created lazily on first observation. `return`
    /// events additionally track the return value under
    /// [`RETURN_VARIABLE`]. Event kinds other than call/return are a
    /// no-op.
    ///
    /// A binding that cannot be tracked (incomparable with its
    /// record's history) is skipped with its record untouched; the
    /// remaining bindings are still processed and the first error is
    /// returned so the caller can surface it.
    pub fn record_event(&mut self, event: &TraceEvent) -> Result<()> {
        if event.event == EventKind::Other {
            return Ok(());
        }

        let records = self
            .variables
            .entry(event.function.clone())
            .or_default()
            .entry(event.event)
            .or_default();

        let mut first_err = None;
        for (name, value) in &event.bindings {
            if let Err(e) = track_into(records, name, value) {
                first_err.get_or_insert(e);
            }
        }
        if event.event == EventKind::Return {
            if let Some(ret) = &event.ret {
                if let Err(e) = track_into(records, RETURN_VARIABLE, ret) {
                    first_err.get_or_insert(e);
                }
            }
        }

        self.events_seen += 1;
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// True if no call/return event has been recorded
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Number of call/return events folded in so far
    pub fn event_count(&self) -> u64 {
        self.events_seen
    }

    pub(crate) fn variables(&self) -> &BTreeMap<String, BTreeMap<EventKind, VariableRecords>> {
        &self.variables
    }

    /// Record for one (function, event, variable) triple, if observed
    pub fn record(
        &self,
        function: &str,
        event: EventKind,
        variable: &str,
    ) -> Option<&ObservationRecord> {
        self.variables.get(function)?.get(&event)?.get(variable)
    }
}

fn track_into(records: &mut VariableRecords, name: &str, value: &Value) -> Result<()> {
    match records.get_mut(name) {
        Some(record) => record.track(value.clone()),
        None => {
            records.insert(name.to_string(), ObservationRecord::new(value.clone()));
            Ok(())
        }
    }
}
