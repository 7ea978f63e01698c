//! Built-in instrumented sample programs
//!
//! These are traced *user* programs, not part of the engine. Each one
//! plays the instrumentation collaborator by hand: it emits a call
//! event at entry and a return event at exit (with the argument still
//! bound, as a real tracer would see it).

use clap::ValueEnum;
use likely_core::{Aggregator, TraceEvent, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Program {
    /// double(x) = abs(20 * x) + 10 (integer)
    Double,
    /// square(x) = x * x (float)
    Square,
    /// square_root(x) = sqrt(x), checked against square (float, x >= 0)
    SquareRoot,
}

const SQRT_EPS: f64 = 0.00001;

fn double(x: i64) -> i64 {
    (20 * x).abs() + 10
}

fn square(x: f64) -> f64 {
    x * x
}

fn square_root(x: f64) -> f64 {
    x.sqrt()
}

/// Parse comma-separated inputs; integer-looking tokens become ints
pub fn parse_inputs(text: &str) -> Result<Vec<Value>, String> {
    text.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|token| {
            if let Ok(i) = token.parse::<i64>() {
                Ok(Value::Int(i))
            } else if let Ok(f) = token.parse::<f64>() {
                Ok(Value::Float(f))
            } else {
                Err(format!("not a number: {:?}", token))
            }
        })
        .collect()
}

/// Run one sample program over the inputs, tracing every call, and
/// return the aggregator holding the observations
pub fn run(program: Program, inputs: &[Value]) -> Result<Aggregator, String> {
    let mut agg = Aggregator::new();
    for input in inputs {
        let observed = match program {
            Program::Double => {
                let x = match input {
                    Value::Int(i) => *i,
                    other => return Err(format!("double takes integer inputs, got {}", other)),
                };
                (Value::Int(x), Value::Int(double(x)))
            }
            Program::Square => {
                let x = as_float(input)?;
                (Value::Float(x), Value::Float(square(x)))
            }
            Program::SquareRoot => {
                let x = as_float(input)?;
                if x < 0.0 {
                    return Err(format!("square_root requires x >= 0, got {}", x));
                }
                let y = square_root(x);
                if (square(y) - x).abs() > SQRT_EPS {
                    return Err(format!("square_root({}) failed its check", x));
                }
                (Value::Float(x), Value::Float(y))
            }
        };
        let (x, ret) = observed;
        let name = program_name(program);
        agg.record_event(&TraceEvent::call(name, [("x", x.clone())]))
            .map_err(|e| e.to_string())?;
        agg.record_event(&TraceEvent::ret(name, [("x", x)], ret))
            .map_err(|e| e.to_string())?;
    }
    Ok(agg)
}

fn program_name(program: Program) -> &'static str {
    match program {
        Program::Double => "double",
        Program::Square => "square",
        Program::SquareRoot => "square_root",
    }
}

fn as_float(value: &Value) -> Result<f64, String> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(f) => Ok(*f),
        other => Err(format!("expected a numeric input, got {}", other)),
    }
}
