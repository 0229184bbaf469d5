//! Type inspection and conversion words

use crate::builtins::push_bool;
use crate::runtime::Runtime;
use pith_core::Value;

/// Define a ( a -- bool ) type predicate
macro_rules! predicate {
    ($func:ident, $pattern:pat) => {
        pub fn $func(rt: &mut Runtime) -> Result<(), String> {
            let value = rt.pop()?;
            push_bool(rt, matches!(value, $pattern))
        }
    };
}

predicate!(is_string, Value::String(_));
predicate!(is_number, Value::Number(_));
predicate!(is_array, Value::Array(_));
predicate!(is_map, Value::Dict(_));
predicate!(is_bool, Value::Bool(_));
predicate!(is_nil, Value::Nil);
predicate!(is_block, Value::Block(_));
predicate!(is_view, Value::View(_));
predicate!(is_signal, Value::Signal(_));

/// Stack effect: ( a -- name )
pub fn type_of(rt: &mut Runtime) -> Result<(), String> {
    let value = rt.pop()?;
    rt.push(Value::from(value.type_name()))
}

/// Stack effect: ( a -- str )
pub fn to_string(rt: &mut Runtime) -> Result<(), String> {
    let value = rt.pop()?;
    rt.push(Value::from(value.to_string()))
}

/// Stack effect: ( a -- n|nil )
///
/// Strings must parse in full (surrounding whitespace allowed); the empty
/// string is 0. Booleans become 1 or 0.
pub fn to_number(rt: &mut Runtime) -> Result<(), String> {
    let converted = match rt.pop()? {
        Value::Number(n) => Value::Number(n),
        Value::String(s) => parse_number(&s).map_or(Value::Nil, Value::Number),
        Value::Bool(b) => Value::Number(if b { 1.0 } else { 0.0 }),
        _ => Value::Nil,
    };
    rt.push(converted)
}

fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f64>().ok()
}
