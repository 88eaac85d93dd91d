//! Expression language for root selectors
//!
//! Selectors that are not literal paths are compiled and evaluated by an
//! [`ExpressionEngine`]. The default [`BuiltinEngine`] runs JSONata through
//! the `jsonata-rs` crate.
//!
//! ```
//! use jsonframer::expression::{BuiltinEngine, ExpressionEngine};
//! use serde_json::json;
//!
//! let engine = BuiltinEngine;
//! let program = engine.compile("$sum(items.price)").unwrap();
//! let total = engine
//!     .evaluate(&program, &json!({"items": [{"price": 2}, {"price": 3}]}))
//!     .unwrap();
//! assert_eq!(total, json!(5));
//! ```

use crate::error::ExpressionError;
use bumpalo::Bump;
use jsonata_rs::JsonAta;
use serde_json::Value;

/// Deepest bracket nesting accepted in a selector
pub const MAX_NESTING: usize = 64;

/// Compiles and evaluates selector programs
pub trait ExpressionEngine {
    type Program;

    fn compile(&self, source: &str) -> Result<Self::Program, ExpressionError>;

    fn evaluate(&self, program: &Self::Program, input: &Value) -> Result<Value, ExpressionError>;
}

/// A JSONata program that is known to parse.
///
/// `jsonata-rs` programs borrow the arena they were parsed into, so the
/// program keeps its checked source and every evaluation parses it into a
/// fresh arena.
#[derive(Debug, Clone)]
pub struct Program {
    source: String,
}

impl Program {
    pub fn source(&self) -> &str {
        &self.source
    }
}

/// JSONata engine backed by `jsonata-rs`
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinEngine;

impl ExpressionEngine for BuiltinEngine {
    type Program = Program;

    fn compile(&self, source: &str) -> Result<Program, ExpressionError> {
        check_nesting(source)?;
        let arena = Bump::new();
        JsonAta::new(source, &arena).map_err(|err| ExpressionError::compile(err.to_string()))?;
        Ok(Program {
            source: source.to_string(),
        })
    }

    /// Evaluate against `input`; an undefined result (nothing matched) is `null`
    fn evaluate(&self, program: &Program, input: &Value) -> Result<Value, ExpressionError> {
        let arena = Bump::new();
        let jsonata =
            JsonAta::new(&program.source, &arena).map_err(|err| ExpressionError::compile(err.to_string()))?;
        let input = serde_json::to_string(input).map_err(|err| ExpressionError::eval(err.to_string()))?;

        let result = jsonata
            .evaluate(Some(input.as_str()), None)
            .map_err(|err| ExpressionError::eval(err.to_string()))?;
        if result.is_undefined() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&result.serialize(false))
            .map_err(|err| ExpressionError::eval(format!("result is not JSON: {}", err)))?;
        Ok(normalize_numbers(value))
    }
}

/// Compile and evaluate `source` in one step
pub fn evaluate(source: &str, input: &Value) -> Result<Value, ExpressionError> {
    let engine = BuiltinEngine;
    let program = engine.compile(source)?;
    engine.evaluate(&program, input)
}

/// Reject selectors nested deeper than [`MAX_NESTING`] brackets before they
/// reach the recursive parser
fn check_nesting(source: &str) -> Result<(), ExpressionError> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = source.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(open) => {
                if c == '\\' {
                    chars.next();
                } else if c == open {
                    quote = None;
                }
            }
            None => match c {
                '"' | '\'' | '`' => quote = Some(c),
                '(' | '[' | '{' => {
                    depth += 1;
                    if depth > MAX_NESTING {
                        return Err(ExpressionError::compile(format!(
                            "selector nests deeper than {} levels",
                            MAX_NESTING
                        )));
                    }
                }
                ')' | ']' | '}' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    Ok(())
}

/// Integral floats become JSON integers so results compare and print the
/// same whichever way the engine represents numbers
fn normalize_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => Value::from(f as i64),
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, normalize_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shop() -> Value {
        json!({
            "orders": [
                {"id": 1, "items": [{"sku": "a", "qty": 2}, {"sku": "b", "qty": 1}]},
                {"id": 2, "items": [{"sku": "c", "qty": 5}]}
            ],
            "name": "shop"
        })
    }

    #[test]
    fn test_compile_keeps_source() {
        let program = BuiltinEngine.compile("a.b").unwrap();
        assert_eq!(program.source(), "a.b");
    }

    #[test]
    fn test_undefined_is_null() {
        assert_eq!(evaluate("missing", &json!({"a": 1})).unwrap(), Value::Null);
    }

    #[test]
    fn test_program_reuse() {
        let engine = BuiltinEngine;
        let program = engine.compile("a * 2").unwrap();
        assert_eq!(engine.evaluate(&program, &json!({"a": 2})).unwrap(), json!(4));
        assert_eq!(engine.evaluate(&program, &json!({"a": 1.5})).unwrap(), json!(3));
    }

    #[test]
    fn test_paths_and_functions() {
        assert_eq!(evaluate("orders.items.sku", &shop()).unwrap(), json!(["a", "b", "c"]));
        assert_eq!(evaluate("orders.items[qty > 1].sku", &shop()).unwrap(), json!(["a", "c"]));
        assert_eq!(evaluate("$sum(orders.items.qty)", &shop()).unwrap(), json!(8));
        assert_eq!(evaluate("name & '-' & $string(2)", &shop()).unwrap(), json!("shop-2"));
    }

    #[test]
    fn test_lambdas_and_constructors() {
        assert_eq!(
            evaluate("$map(orders, function($o) { {'id': $o.id, 'n': $count($o.items)} })", &shop()).unwrap(),
            json!([{"id": 1, "n": 2}, {"id": 2, "n": 1}])
        );
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(BuiltinEngine.compile("orders["), Err(ExpressionError::Compile { .. })));
        assert!(matches!(evaluate("name + 1", &shop()), Err(ExpressionError::Eval { .. })));
    }

    #[test]
    fn test_deep_nesting_is_rejected() {
        let source = "(".repeat(100_000);
        assert!(matches!(BuiltinEngine.compile(&source), Err(ExpressionError::Compile { .. })));

        let nested = format!("{}1{}", "[".repeat(MAX_NESTING + 1), "]".repeat(MAX_NESTING + 1));
        assert!(BuiltinEngine.compile(&nested).is_err());

        // Brackets inside string literals do not count
        let quoted = format!("'{}'", "(".repeat(MAX_NESTING * 2));
        assert!(check_nesting(&quoted).is_ok());
        assert_eq!(evaluate("((1 + 2))", &Value::Null).unwrap(), json!(3));
    }

    #[test]
    fn test_number_normalization() {
        assert_eq!(normalize_numbers(json!([3.0, -2.0, 2.5])), json!([3, -2, 2.5]));
        assert_eq!(normalize_numbers(json!({"a": {"b": 4.0}})), json!({"a": {"b": 4}}));
    }
}
