//! Arithmetic words
//!
//! All numbers are `f64`. `add` also concatenates two strings; every other
//! word requires numbers and names itself in the error.

use crate::builtins::{pop_args, push_number};
use crate::runtime::Runtime;
use pith_core::Value;

/// Pop two numbers or fail with `"<word> requires numbers"`
fn pop_numbers(rt: &mut Runtime, word: &str) -> Result<(f64, f64), String> {
    match pop_args::<2>(rt)? {
        [Value::Number(a), Value::Number(b)] => Ok((a, b)),
        _ => Err(format!("{} requires numbers", word)),
    }
}

/// Define a ( a b -- c ) numeric word
macro_rules! numeric_binop {
    ($(#[$doc:meta])* $func:ident, $word:literal, |$a:ident, $b:ident| $body:expr) => {
        $(#[$doc])*
        pub fn $func(rt: &mut Runtime) -> Result<(), String> {
            let ($a, $b) = pop_numbers(rt, $word)?;
            push_number(rt, $body)
        }
    };
}

/// Stack effect: ( a b -- a+b )
///
/// Numbers add, strings concatenate.
pub fn add(rt: &mut Runtime) -> Result<(), String> {
    match pop_args::<2>(rt)? {
        [Value::Number(a), Value::Number(b)] => push_number(rt, a + b),
        [Value::String(a), Value::String(b)] => rt.push(Value::from(format!("{}{}", a, b))),
        _ => Err("Cannot add values of these types".to_string()),
    }
}

numeric_binop!(
    /// Stack effect: ( a b -- a-b )
    subtract, "subtract", |a, b| a - b
);

numeric_binop!(
    /// Stack effect: ( a b -- a*b )
    multiply, "multiply", |a, b| a * b
);

numeric_binop!(min, "min", |a, b| if a < b { a } else { b });

numeric_binop!(max, "max", |a, b| if a > b { a } else { b });

/// Stack effect: ( a b -- a/b )
pub fn divide(rt: &mut Runtime) -> Result<(), String> {
    let (a, b) = pop_numbers(rt, "divide")?;
    if b == 0.0 {
        return Err("division by zero".to_string());
    }
    push_number(rt, a / b)
}

/// Stack effect: ( a b -- a%b )
///
/// Remainder with the sign of the dividend, like C's `fmod`.
pub fn modulo(rt: &mut Runtime) -> Result<(), String> {
    let (a, b) = pop_numbers(rt, "mod")?;
    if b == 0.0 {
        return Err("modulo by zero".to_string());
    }
    push_number(rt, a % b)
}

/// Stack effect: ( a -- |a| )
pub fn abs(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::Number(n) => push_number(rt, n.abs()),
        _ => Err("abs requires number".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(source: &str) -> Value {
        let mut rt = Runtime::new();
        assert!(rt.eval(source), "{:?}", rt.error());
        rt.pop().unwrap()
    }

    fn fail(source: &str) -> String {
        let mut rt = Runtime::new();
        assert!(!rt.eval(source));
        rt.take_error().unwrap()
    }

    #[test]
    fn test_add() {
        assert_eq!(run("5 3 +"), Value::Number(8.0));
        assert_eq!(run("5 3 add"), Value::Number(8.0));
    }

    #[test]
    fn test_add_strings() {
        assert_eq!(run("\"foo\" \"bar\" +"), Value::from("foobar"));
    }

    #[test]
    fn test_add_mixed_fails() {
        assert_eq!(fail("1 \"a\" +"), "Cannot add values of these types");
    }

    #[test]
    fn test_subtract_multiply() {
        assert_eq!(run("10 3 -"), Value::Number(7.0));
        assert_eq!(run("4 5 *"), Value::Number(20.0));
        assert_eq!(fail("\"a\" 1 subtract"), "subtract requires numbers");
        assert_eq!(fail("nil 1 multiply"), "multiply requires numbers");
    }

    #[test]
    fn test_divide() {
        assert_eq!(run("7 2 /"), Value::Number(3.5));
        assert_eq!(fail("1 0 /"), "division by zero");
    }

    #[test]
    fn test_modulo() {
        assert_eq!(run("7 3 mod"), Value::Number(1.0));
        assert_eq!(run("-7 3 mod"), Value::Number(-1.0));
        assert_eq!(run("5.5 2 mod"), Value::Number(1.5));
        assert_eq!(fail("1 0 mod"), "modulo by zero");
    }

    #[test]
    fn test_abs_min_max() {
        assert_eq!(run("-4 abs"), Value::Number(4.0));
        assert_eq!(run("3 9 min"), Value::Number(3.0));
        assert_eq!(run("3 9 max"), Value::Number(9.0));
        assert_eq!(fail("\"x\" abs"), "abs requires number");
        assert_eq!(fail("true 1 max"), "max requires numbers");
    }

    #[test]
    fn test_underflow() {
        assert_eq!(fail("1 +"), "Stack underflow");
    }
}
