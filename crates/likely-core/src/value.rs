//! Tagged runtime values observed in the traced program
//!
//! The traced program is dynamically typed from the observer's point of
//! view: one call may bind an integer where the next binds a float.
//! `Value` is the closed set of shapes the engine understands.
//!
//! Two orderings coexist and must not be confused:
//!
//! - `Ord` is a total *storage* ordering (variant rank, then the
//!   variant's natural order, floats by `total_cmp`) so that
//!   `BTreeSet<Value>` and `BTreeMap<Value, _>` iterate
//!   deterministically. It never compares across variants numerically.
//! - [`Value::try_cmp`] is the *semantic* comparison used for min/max
//!   tracking and relation inference. It is defined within a variant,
//!   promotes int/float pairs, and refuses everything else with an
//!   explicit error instead of inventing an answer.

use std::cmp::Ordering;
use std::fmt;

use crate::{Error, Result};

/// A runtime value captured from the traced program
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64)
    Float(f64),
    /// String value
    Str(String),
    /// Boolean value
    Bool(bool),
}

impl Value {
    /// Type name as reported in `isinstance` assertions
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
        }
    }

    /// Semantic comparison between two observed values.
    ///
    /// Defined within a variant, plus int/float promotion. Any other
    /// cross-variant pair is an [`Error::IncomparableValues`]: mixing
    /// such values under one variable is a defect in the traced
    /// program, and the engine flags it rather than ordering
    /// arbitrarily.
    pub fn try_cmp(&self, other: &Value) -> Result<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => Ok(a.total_cmp(b)),
            (Value::Int(a), Value::Float(b)) => Ok((*a as f64).total_cmp(b)),
            (Value::Float(a), Value::Int(b)) => Ok(a.total_cmp(&(*b as f64))),
            (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            _ => Err(Error::IncomparableValues {
                left: self.type_name(),
                right: other.type_name(),
            }),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) => 0,
            Value::Float(_) => 1,
            Value::Str(_) => 2,
            Value::Bool(_) => 3,
        }
    }
}

// Storage ordering only. Cross-variant pairs order by rank so that
// sets containing mixed variants still iterate deterministically.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality must agree with `Ord` (total_cmp distinguishes -0.0 and
// 0.0, a derived PartialEq would not), so both come from `cmp`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            // keep the decimal point so 10.0 stays visibly a float
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
