//! String words
//!
//! Lengths and indices count characters, not bytes. `length` and `contains`
//! also accept arrays.

use crate::builtins::{clamp_index, pop_args, push_bool, push_number};
use crate::runtime::Runtime;
use pith_core::Value;

fn string_array<'a>(parts: impl Iterator<Item = &'a str>) -> Value {
    Value::array(parts.map(Value::from).collect())
}

/// Stack effect: ( str|arr -- n )
pub fn length(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => push_number(rt, s.chars().count() as f64),
        Value::Array(items) => push_number(rt, items.len() as f64),
        _ => Err("length requires string or array".to_string()),
    }
}

/// Stack effect: ( a b -- ab )
pub fn concat(rt: &mut Runtime) -> Result<(), String> {
    match pop_args::<2>(rt)? {
        [Value::String(a), Value::String(b)] => rt.push(Value::from(format!("{}{}", a, b))),
        _ => Err("concat requires two strings".to_string()),
    }
}

/// Stack effect: ( str delim -- arr )
///
/// An empty delimiter splits into single characters.
pub fn split(rt: &mut Runtime) -> Result<(), String> {
    let [Value::String(s), Value::String(delim)] = pop_args::<2>(rt)? else {
        return Err("split requires string and delimiter".to_string());
    };
    let parts = if delim.is_empty() {
        Value::array(s.chars().map(|c| Value::from(c.to_string())).collect())
    } else {
        string_array(s.split(&*delim))
    };
    rt.push(parts)
}

/// Stack effect: ( arr delim -- str )
///
/// Items that are not strings contribute nothing but still get delimiters.
pub fn join(rt: &mut Runtime) -> Result<(), String> {
    let [Value::Array(items), Value::String(delim)] = pop_args::<2>(rt)? else {
        return Err("join requires array and delimiter".to_string());
    };
    let joined = items
        .iter()
        .map(|item| item.as_str().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(&*delim);
    rt.push(Value::from(joined))
}

pub fn trim(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => rt.push(Value::from(s.trim())),
        _ => Err("trim requires a string".to_string()),
    }
}

/// Stack effect: ( str start end -- sub )
///
/// Both indices are clamped into the string; `start > end` gives "".
pub fn substring(rt: &mut Runtime) -> Result<(), String> {
    let [Value::String(s), Value::Number(start), Value::Number(end)] = pop_args::<3>(rt)? else {
        return Err("substring requires string, start, end".to_string());
    };
    let len = s.chars().count();
    let end = clamp_index(end, len);
    let start = clamp_index(start, len).min(end);
    let sub: String = s.chars().skip(start).take(end - start).collect();
    rt.push(Value::from(sub))
}

/// Stack effect: ( str|arr needle -- bool )
pub fn contains(rt: &mut Runtime) -> Result<(), String> {
    match pop_args::<2>(rt)? {
        [Value::String(s), Value::String(needle)] => push_bool(rt, s.contains(&*needle)),
        [Value::Array(items), needle] => push_bool(rt, items.contains(&needle)),
        _ => Err("contains requires string or array".to_string()),
    }
}

/// Stack effect: ( str old new -- str )
///
/// Replaces every occurrence; an empty `old` leaves the string unchanged.
pub fn replace(rt: &mut Runtime) -> Result<(), String> {
    let [Value::String(s), Value::String(old), Value::String(new)] = pop_args::<3>(rt)? else {
        return Err("replace requires three strings".to_string());
    };
    if old.is_empty() {
        return rt.push(Value::String(s));
    }
    rt.push(Value::from(s.replace(&*old, &new)))
}

pub fn uppercase(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => rt.push(Value::from(s.to_uppercase())),
        _ => Err("uppercase requires a string".to_string()),
    }
}

pub fn lowercase(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => rt.push(Value::from(s.to_lowercase())),
        _ => Err("lowercase requires a string".to_string()),
    }
}

/// Stack effect: ( str -- arr )
///
/// Splits on `\n`. A trailing newline does not produce an empty last line,
/// but the empty string is one empty line.
pub fn lines(rt: &mut Runtime) -> Result<(), String> {
    let Value::String(s) = rt.pop()? else {
        return Err("lines requires a string".to_string());
    };
    let mut parts: Vec<&str> = s.split('\n').collect();
    if parts.len() > 1 && parts.last() == Some(&"") {
        parts.pop();
    }
    rt.push(string_array(parts.into_iter()))
}

/// Stack effect: ( str -- arr )
pub fn words(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => rt.push(string_array(s.split_whitespace())),
        _ => Err("words requires a string".to_string()),
    }
}
