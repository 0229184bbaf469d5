//! Comparison and logic words
//!
//! `=` and `!=` use language equality and accept any values. The ordering
//! words only take numbers. `and`, `or` and `not` read truthiness and
//! always produce a Bool.

use crate::builtins::{pop_args, push_bool};
use crate::runtime::Runtime;
use pith_core::Value;

fn compare(rt: &mut Runtime, word: &str, op: fn(f64, f64) -> bool) -> Result<(), String> {
    match pop_args::<2>(rt)? {
        [Value::Number(a), Value::Number(b)] => push_bool(rt, op(a, b)),
        _ => Err(format!("{} requires numbers", word)),
    }
}

/// Stack effect: ( a b -- bool )
pub fn equal(rt: &mut Runtime) -> Result<(), String> {
    let [a, b] = pop_args::<2>(rt)?;
    push_bool(rt, a == b)
}

/// Stack effect: ( a b -- bool )
pub fn not_equal(rt: &mut Runtime) -> Result<(), String> {
    let [a, b] = pop_args::<2>(rt)?;
    push_bool(rt, a != b)
}

pub fn less(rt: &mut Runtime) -> Result<(), String> {
    compare(rt, "<", |a, b| a < b)
}

pub fn greater(rt: &mut Runtime) -> Result<(), String> {
    compare(rt, ">", |a, b| a > b)
}

pub fn less_equal(rt: &mut Runtime) -> Result<(), String> {
    compare(rt, "<=", |a, b| a <= b)
}

pub fn greater_equal(rt: &mut Runtime) -> Result<(), String> {
    compare(rt, ">=", |a, b| a >= b)
}

pub fn and(rt: &mut Runtime) -> Result<(), String> {
    let [a, b] = pop_args::<2>(rt)?;
    push_bool(rt, a.is_truthy() && b.is_truthy())
}

pub fn or(rt: &mut Runtime) -> Result<(), String> {
    let [a, b] = pop_args::<2>(rt)?;
    push_bool(rt, a.is_truthy() || b.is_truthy())
}

pub fn not(rt: &mut Runtime) -> Result<(), String> {
    let a = rt.pop()?;
    push_bool(rt, !a.is_truthy())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Value {
        let mut rt = Runtime::new();
        assert!(rt.eval(source), "{:?}", rt.error());
        rt.pop().unwrap()
    }

    #[test]
    fn test_equality_is_structural() {
        assert_eq!(run("1 1 ="), Value::Bool(true));
        assert_eq!(run("\"a\" \"a\" ="), Value::Bool(true));
        assert_eq!(run("[1 2] [1 2] ="), Value::Bool(true));
        assert_eq!(run("1 \"1\" ="), Value::Bool(false));
        assert_eq!(run("nil nil !="), Value::Bool(false));
    }

    #[test]
    fn test_ordering() {
        assert_eq!(run("1 2 <"), Value::Bool(true));
        assert_eq!(run("1 2 >"), Value::Bool(false));
        assert_eq!(run("2 2 <="), Value::Bool(true));
        assert_eq!(run("1 2 >="), Value::Bool(false));
    }

    #[test]
    fn test_ordering_requires_numbers() {
        let mut rt = Runtime::new();
        assert!(!rt.eval("\"a\" \"b\" <"));
        assert_eq!(rt.error(), Some("< requires numbers"));
        rt.clear_error();
        assert!(!rt.eval("1 nil >="));
        assert_eq!(rt.error(), Some(">= requires numbers"));
    }

    #[test]
    fn test_logic_uses_truthiness() {
        assert_eq!(run("1 \"x\" and"), Value::Bool(true));
        assert_eq!(run("0 true and"), Value::Bool(false));
        assert_eq!(run("nil [] or"), Value::Bool(true));
        assert_eq!(run("0 not"), Value::Bool(true));
        assert_eq!(run("\"\" not"), Value::Bool(false));
    }
}
