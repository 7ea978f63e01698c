//! Report generation: formats accumulated records as assertions
//!
//! [`Aggregator::report`] snapshots the aggregator state into an owned
//! [`Report`] value, inferring pairwise relations as it goes; `Display`
//! then renders the snapshot as human-readable pseudo-assertions.
//! Formatting never touches live aggregator state.
//!
//! # Relation inference
//!
//! Relations between two variables under the same (function, event)
//! pair are inferred from their distinct-value sets:
//!
//! - `==` when the two sets are identical,
//! - `>=` when every observed left value is >= every observed right
//!   value, `<=` symmetrically, both by full cross-product comparison.
//!
//! The cross-product check is an intentionally imprecise heuristic:
//! it proves dominance between the observed value sets, not a
//! pointwise relation between corresponding runtime pairs. It is exact
//! only for single-value sets or when one set's whole range clears the
//! other's. Incomparable value pairs defeat a relation; they never
//! abort the report.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use sha2::{Digest, Sha256};

use crate::aggregator::Aggregator;
use crate::record::ObservationRecord;
use crate::trace::EventKind;
use crate::value::Value;

// ── Snapshot Types ────────────────────────────────────────

/// Immutable snapshot of everything the aggregator inferred
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Report {
    pub sections: Vec<Section>,
}

/// Invariants for one (event kind, function) pair
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Section {
    pub event: EventKind,
    pub function: String,
    pub variables: Vec<VariableReport>,
}

/// Inferred invariants for a single variable
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariableReport {
    pub name: String,
    pub type_name: String,
    /// Distinct observed values, in deterministic storage order
    pub values: Vec<Value>,
    pub min: Value,
    pub max: Value,
    /// True when min and max coincide: the range collapses to equality
    pub constant: bool,
    pub relations: Vec<Relation>,
}

/// One inferred pairwise relation, `left <op> right`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Relation {
    pub left: String,
    pub relation: RelationKind,
    pub right: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    Equal,
    GreaterEq,
    LessEq,
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::Equal => write!(f, "=="),
            RelationKind::GreaterEq => write!(f, ">="),
            RelationKind::LessEq => write!(f, "<="),
        }
    }
}

// ── Report Construction ───────────────────────────────────

impl Aggregator {
    /// Snapshot the accumulated records into a [`Report`].
    ///
    /// Sections come out function-alphabetical, `call` before
    /// `return`, variables alphabetical within a section. An
    /// aggregator with no observations yields zero sections.
    pub fn report(&self) -> Report {
        let mut sections = Vec::new();
        for (function, by_event) in self.variables() {
            for (event, records) in by_event {
                let variables = records
                    .iter()
                    .map(|(name, record)| VariableReport {
                        name: name.clone(),
                        type_name: record.type_name().to_string(),
                        values: record.values().iter().cloned().collect(),
                        min: record.min().clone(),
                        max: record.max().clone(),
                        constant: record.is_constant(),
                        relations: infer_relations(name, record, records),
                    })
                    .collect();
                sections.push(Section {
                    event: *event,
                    function: function.clone(),
                    variables,
                });
            }
        }
        Report { sections }
    }
}

/// Relations of `name` against every peer variable tracked under the
/// same (function, event) pair, self excluded. The three conditions
/// are evaluated and emitted independently; equal sets legitimately
/// produce all three.
fn infer_relations(
    name: &str,
    record: &ObservationRecord,
    peers: &std::collections::BTreeMap<String, ObservationRecord>,
) -> Vec<Relation> {
    let mut relations = Vec::new();
    for (peer_name, peer) in peers {
        if peer_name == name {
            continue;
        }
        if record.values() == peer.values() {
            relations.push(Relation {
                left: name.to_string(),
                relation: RelationKind::Equal,
                right: peer_name.clone(),
            });
        }
        if dominates(record.values(), peer.values(), Ordering::Greater) {
            relations.push(Relation {
                left: name.to_string(),
                relation: RelationKind::GreaterEq,
                right: peer_name.clone(),
            });
        }
        if dominates(record.values(), peer.values(), Ordering::Less) {
            relations.push(Relation {
                left: name.to_string(),
                relation: RelationKind::LessEq,
                right: peer_name.clone(),
            });
        }
    }
    relations
}

/// Full cross-product dominance check: every `left` value relates to
/// every `right` value by `wanted` (or equality). See the module docs
/// for why this is deliberately imprecise.
fn dominates(left: &BTreeSet<Value>, right: &BTreeSet<Value>, wanted: Ordering) -> bool {
    left.iter().all(|a| {
        right.iter().all(|b| match a.try_cmp(b) {
            Ok(ord) => ord == wanted || ord == Ordering::Equal,
            Err(_) => false,
        })
    })
}

// ── Rendering ─────────────────────────────────────────────

impl Report {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// SHA-256 hex digest of the rendered report text, for comparing
    /// traced runs byte-for-byte
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            writeln!(f, "{} {}:", section.event, section.function)?;
            for var in &section.variables {
                writeln!(f, "    assert isinstance({}, {})", var.name, var.type_name)?;
                write!(f, "    assert {} in {{", var.name)?;
                for (i, value) in var.values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                writeln!(f, "}}")?;
                if var.constant {
                    writeln!(f, "    assert {} == {}", var.name, var.min)?;
                } else {
                    writeln!(f, "    assert {} <= {} <= {}", var.min, var.name, var.max)?;
                }
                for rel in &var.relations {
                    writeln!(f, "    assert {} {} {}", rel.left, rel.relation, rel.right)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::TraceEvent;

    #[test]
    fn test_empty_aggregator_yields_empty_report() {
        let agg = Aggregator::new();
        let report = agg.report();
        assert!(report.is_empty());
        assert_eq!(report.to_string(), "");
    }

    #[test]
    fn test_single_value_emits_equality_not_range() {
        let mut agg = Aggregator::new();
        agg.record_event(&TraceEvent::call("f", [("n", Value::Int(7))]))
            .unwrap();
        agg.record_event(&TraceEvent::call("f", [("n", Value::Int(7))]))
            .unwrap();
        let text = agg.report().to_string();
        assert!(text.contains("assert n == 7"));
        assert!(!text.contains("<= n <="));
    }

    #[test]
    fn test_multi_value_emits_bounded_range() {
        let mut agg = Aggregator::new();
        for x in [3i64, 0, -10] {
            agg.record_event(&TraceEvent::call("double", [("x", Value::Int(x))]))
                .unwrap();
        }
        let text = agg.report().to_string();
        assert!(text.contains("call double:"));
        assert!(text.contains("assert isinstance(x, int)"));
        assert!(text.contains("assert x in {-10, 0, 3}"));
        assert!(text.contains("assert -10 <= x <= 3"));
    }

    #[test]
    fn test_equal_singleton_sets_emit_all_three_relations() {
        let mut agg = Aggregator::new();
        agg.record_event(&TraceEvent::call(
            "f",
            [("a", Value::Int(7)), ("b", Value::Int(7))],
        ))
        .unwrap();
        let report = agg.report();
        let a = &report.sections[0].variables[0];
        assert_eq!(a.name, "a");
        let kinds: Vec<RelationKind> = a.relations.iter().map(|r| r.relation).collect();
        assert_eq!(
            kinds,
            vec![
                RelationKind::Equal,
                RelationKind::GreaterEq,
                RelationKind::LessEq
            ]
        );
    }

    #[test]
    fn test_equal_multi_value_sets_emit_only_equality() {
        let mut agg = Aggregator::new();
        for v in [1i64, 4] {
            agg.record_event(&TraceEvent::call(
                "f",
                [("a", Value::Int(v)), ("b", Value::Int(v))],
            ))
            .unwrap();
        }
        // the cross-product check cannot prove >= or <= for {1, 4}
        // against itself (1 >= 4 fails), so only == survives
        let report = agg.report();
        let a = &report.sections[0].variables[0];
        let kinds: Vec<RelationKind> = a.relations.iter().map(|r| r.relation).collect();
        assert_eq!(kinds, vec![RelationKind::Equal]);
    }

    #[test]
    fn test_overlapping_sets_emit_no_relation() {
        let mut agg = Aggregator::new();
        // a: {1, 10}, b: {5}: neither dominates the other
        agg.record_event(&TraceEvent::call(
            "f",
            [("a", Value::Int(1)), ("b", Value::Int(5))],
        ))
        .unwrap();
        agg.record_event(&TraceEvent::call(
            "f",
            [("a", Value::Int(10)), ("b", Value::Int(5))],
        ))
        .unwrap();
        let report = agg.report();
        for var in &report.sections[0].variables {
            assert!(var.relations.is_empty(), "unexpected relation for {}", var.name);
        }
    }

    #[test]
    fn test_dominance_relation_both_directions() {
        let mut agg = Aggregator::new();
        // lo: {1, 2} entirely below hi: {8, 9}
        for (lo, hi) in [(1i64, 8i64), (2, 9)] {
            agg.record_event(&TraceEvent::call(
                "f",
                [("hi", Value::Int(hi)), ("lo", Value::Int(lo))],
            ))
            .unwrap();
        }
        let text = agg.report().to_string();
        assert!(text.contains("assert hi >= lo"));
        assert!(text.contains("assert lo <= hi"));
        assert!(!text.contains("assert lo == hi"));
    }

    #[test]
    fn test_incomparable_peers_defeat_relations_without_panicking() {
        let mut agg = Aggregator::new();
        agg.record_event(&TraceEvent::call(
            "f",
            [("n", Value::Int(1)), ("s", Value::Str("a".into()))],
        ))
        .unwrap();
        let report = agg.report();
        for var in &report.sections[0].variables {
            assert!(var.relations.is_empty());
        }
    }

    #[test]
    fn test_sections_are_deterministically_ordered() {
        let mut agg = Aggregator::new();
        agg.record_event(&TraceEvent::ret("zeta", [("x", Value::Int(1))], Value::Int(1)))
            .unwrap();
        agg.record_event(&TraceEvent::call("alpha", [("x", Value::Int(1))]))
            .unwrap();
        agg.record_event(&TraceEvent::call("zeta", [("x", Value::Int(1))]))
            .unwrap();
        let report = agg.report();
        let order: Vec<(String, EventKind)> = report
            .sections
            .iter()
            .map(|s| (s.function.clone(), s.event))
            .collect();
        assert_eq!(
            order,
            vec![
                ("alpha".to_string(), EventKind::Call),
                ("zeta".to_string(), EventKind::Call),
                ("zeta".to_string(), EventKind::Return),
            ]
        );
    }

    #[test]
    fn test_digest_is_stable_across_identical_runs() {
        let build = || {
            let mut agg = Aggregator::new();
            for x in [3i64, 0, -10] {
                agg.record_event(&TraceEvent::call("double", [("x", Value::Int(x))]))
                    .unwrap();
            }
            agg.report()
        };
        let a = build();
        let b = build();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let mut agg = Aggregator::new();
        agg.record_event(&TraceEvent::call("f", [("n", Value::Int(7))]))
            .unwrap();
        let json = serde_json::to_value(agg.report()).unwrap();
        let section = &json["sections"][0];
        assert_eq!(section["event"], "call");
        assert_eq!(section["function"], "f");
        assert_eq!(section["variables"][0]["name"], "n");
        assert_eq!(section["variables"][0]["constant"], true);
    }
}
