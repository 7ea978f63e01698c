//! Observation records: per-variable accumulators
//!
//! One record exists per (function, event, variable) triple and tracks
//! the minimum, maximum, distinct-value set, and most recent value seen
//! for that variable. A record is created from its first observation,
//! so an "empty" record is unrepresentable and the report path never
//! has to defend against a zero-observation range.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::value::Value;
use crate::Result;

/// Accumulated observations for a single variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationRecord {
    min: Value,
    max: Value,
    values: BTreeSet<Value>,
    last: Value,
}

impl ObservationRecord {
    /// Create a record from its first observed value
    pub fn new(first: Value) -> Self {
        let mut values = BTreeSet::new();
        values.insert(first.clone());
        ObservationRecord {
            min: first.clone(),
            max: first.clone(),
            values,
            last: first,
        }
    }

    /// Fold one observed value into the record.
    ///
    /// Comparability against the current bounds is checked before any
    /// mutation: a value the record cannot order leaves min, max, set,
    /// and last exactly as they were.
    pub fn track(&mut self, value: Value) -> Result<()> {
        let below_min = value.try_cmp(&self.min)? == Ordering::Less;
        let above_max = value.try_cmp(&self.max)? == Ordering::Greater;

        if below_min {
            self.min = value.clone();
        }
        if above_max {
            self.max = value.clone();
        }
        self.values.insert(value.clone());
        self.last = value;
        Ok(())
    }

    /// Smallest value observed
    pub fn min(&self) -> &Value {
        &self.min
    }

    /// Largest value observed
    pub fn max(&self) -> &Value {
        &self.max
    }

    /// All distinct values observed, in storage order
    pub fn values(&self) -> &BTreeSet<Value> {
        &self.values
    }

    /// Most recently observed value
    pub fn last(&self) -> &Value {
        &self.last
    }

    /// Observed type: the type of the last value seen (last-seen only,
    /// not a union over all observations)
    pub fn type_name(&self) -> &'static str {
        self.last.type_name()
    }

    /// True when every observation was (semantically) the same value
    pub fn is_constant(&self) -> bool {
        matches!(self.min.try_cmp(&self.max), Ok(Ordering::Equal))
    }
}
