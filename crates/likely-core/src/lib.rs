//! Likely Core: dynamic likely-invariant inference
//!
//! Observes a program's execution through explicit call/return trace
//! events and derives likely invariants in the Daikon style: type
//! constraints, value-set membership, numeric ranges, and pairwise
//! relations between variables.
//!
//! # Architecture
//!
//! ```text
//! Trace Events → Aggregator → Observation Records
//!                                   ↓
//!                                Report → assertion text / JSON
//! ```
//!
//! The instrumentation collaborator (an in-process harness or an
//! external instrumenter) feeds one [`TraceEvent`] per call/return;
//! after the traced run, [`Aggregator::report`] snapshots everything
//! into a [`Report`].
//!
//! # Guarantees
//!
//! - **Deterministic**: same event sequence always produces identical
//!   report text (all state lives in BTreeMaps)
//! - **Best-effort**: a failed observation never corrupts records
//!   accumulated for other variables
//! - **Honest about imprecision**: inferred relations are heuristics
//!   over observed value sets, not proofs (see `report` module docs)

pub mod aggregator;
pub mod error;
pub mod record;
pub mod report;
pub mod trace;
pub mod value;

pub use aggregator::{Aggregator, RETURN_VARIABLE};
pub use error::{Error, Result};
pub use record::ObservationRecord;
pub use report::{Relation, RelationKind, Report, Section, VariableReport};
pub use trace::{EventKind, TraceEvent};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    fn double(x: i64) -> i64 {
        (20 * x).abs() + 10
    }

    /// Trace `double` over the given inputs the way an instrumented
    /// run would: a call event at entry, a return event at exit with
    /// the local still bound.
    fn trace_double(inputs: &[i64]) -> Aggregator {
        let mut agg = Aggregator::new();
        for &x in inputs {
            agg.record_event(&TraceEvent::call("double", [("x", Value::Int(x))]))
                .unwrap();
            let r = double(x);
            agg.record_event(&TraceEvent::ret(
                "double",
                [("x", Value::Int(x))],
                Value::Int(r),
            ))
            .unwrap();
        }
        agg
    }

    #[test]
    fn test_double_end_to_end() {
        let agg = trace_double(&[3, 0, -10]);

        let x = agg.record("double", EventKind::Call, "x").unwrap();
        assert_eq!(x.min(), &Value::Int(-10));
        assert_eq!(x.max(), &Value::Int(3));
        assert_eq!(x.values().len(), 3);

        let ret = agg.record("double", EventKind::Return, RETURN_VARIABLE).unwrap();
        assert_eq!(ret.min(), &Value::Int(10));
        assert_eq!(ret.max(), &Value::Int(210));
        assert_eq!(
            ret.values().iter().cloned().collect::<Vec<_>>(),
            vec![Value::Int(10), Value::Int(70), Value::Int(210)]
        );

        let text = agg.report().to_string();
        assert!(text.contains("assert -10 <= x <= 3"));
        assert!(text.contains("assert x <= ret"));
        assert!(text.contains("assert ret >= x"));
    }

    #[test]
    fn test_double_report_exact_text() {
        let text = trace_double(&[3, 0, -10]).report().to_string();
        let expected = "\
call double:
    assert isinstance(x, int)
    assert x in {-10, 0, 3}
    assert -10 <= x <= 3
return double:
    assert isinstance(ret, int)
    assert ret in {10, 70, 210}
    assert 10 <= ret <= 210
    assert ret >= x
    assert isinstance(x, int)
    assert x in {-10, 0, 3}
    assert -10 <= x <= 3
    assert x <= ret
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_determinism_across_runs() {
        let first = trace_double(&[3, 0, -10]).report();
        for _ in 0..10 {
            assert_eq!(trace_double(&[3, 0, -10]).report(), first);
        }
    }

    #[test]
    fn test_fresh_aggregator_reports_nothing() {
        let agg = Aggregator::new();
        assert!(agg.is_empty());
        assert!(agg.report().is_empty());
        assert_eq!(agg.report().to_string(), "");
    }
}
