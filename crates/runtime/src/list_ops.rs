//! Array words
//!
//! Arrays are copy-on-write: every word here returns a new array and leaves
//! its input untouched. The higher-order words run a block once per item
//! with the item pushed; whatever the block leaves on top is its result.
//! `map` and `each` run the block on the live stack, so values a block
//! leaves below its result stay where they are.
//!
//! # Stack effects
//!
//! - `first`, `last`: ( arr -- item|nil )
//! - `nth`: ( arr idx -- item|nil )
//! - `append`: ( arr item -- arr' )
//! - `prepend`: ( item arr -- arr' )
//! - `map`, `filter`, `find`, `any`, `all`: ( arr block -- result )
//! - `each`: ( arr block -- results... )
//! - `reduce`: ( arr init block -- acc )

use crate::builtins::{call_with, clamp_index, pop_args, push_bool, push_number};
use crate::runtime::Runtime;
use pith_core::{Body, Value};
use std::cmp::Ordering;
use std::rc::Rc;

fn pop_array(rt: &mut Runtime, word: &str) -> Result<Rc<Vec<Value>>, String> {
    match rt.pop()? {
        Value::Array(items) => Ok(items),
        _ => Err(format!("{} requires an array", word)),
    }
}

/// Pop ( arr block ) for a higher-order word
fn pop_array_and_block(rt: &mut Runtime, word: &str) -> Result<(Rc<Vec<Value>>, Body), String> {
    match pop_args::<2>(rt)? {
        [Value::Array(items), Value::Block(body)] => Ok((items, body)),
        [Value::Array(_), _] => Err(format!("{} requires block as second argument", word)),
        _ => Err(format!("{} requires array as first argument", word)),
    }
}

/// Truthiness of a block result; no result counts as false
fn holds(result: Option<Value>) -> bool {
    result.is_some_and(|v| v.is_truthy())
}

fn sort_order(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

// =============================================================================
// Access
// =============================================================================

pub fn first(rt: &mut Runtime) -> Result<(), String> {
    let items = pop_array(rt, "first")?;
    rt.push(items.first().cloned().unwrap_or(Value::Nil))
}

pub fn last(rt: &mut Runtime) -> Result<(), String> {
    let items = pop_array(rt, "last")?;
    rt.push(items.last().cloned().unwrap_or(Value::Nil))
}

pub fn nth(rt: &mut Runtime) -> Result<(), String> {
    let [Value::Array(items), Value::Number(index)] = pop_args::<2>(rt)? else {
        return Err("nth requires array and index".to_string());
    };
    let item = if index >= 0.0 {
        items.get(index as usize).cloned()
    } else {
        None
    };
    rt.push(item.unwrap_or(Value::Nil))
}

/// Stack effect: ( arr item -- idx )
///
/// Position of the first item equal to `item`, or -1.
pub fn index_of(rt: &mut Runtime) -> Result<(), String> {
    let [list, item] = pop_args::<2>(rt)?;
    let Value::Array(items) = list else {
        return Err("index-of requires an array".to_string());
    };
    let index = items.iter().position(|v| *v == item);
    push_number(rt, index.map_or(-1.0, |i| i as f64))
}

/// Stack effect: ( arr -- bool )
pub fn is_empty(rt: &mut Runtime) -> Result<(), String> {
    let items = pop_array(rt, "empty?")?;
    push_bool(rt, items.is_empty())
}

// =============================================================================
// Building
// =============================================================================

pub fn append(rt: &mut Runtime) -> Result<(), String> {
    let [list, item] = pop_args::<2>(rt)?;
    let Value::Array(mut items) = list else {
        return Err("append requires an array".to_string());
    };
    Rc::make_mut(&mut items).push(item);
    rt.push(Value::Array(items))
}

pub fn prepend(rt: &mut Runtime) -> Result<(), String> {
    let [item, list] = pop_args::<2>(rt)?;
    let Value::Array(mut items) = list else {
        return Err("prepend requires an array".to_string());
    };
    Rc::make_mut(&mut items).insert(0, item);
    rt.push(Value::Array(items))
}

/// Stack effect: ( arr start end -- arr' )
///
/// Indices are clamped; `start > end` gives an empty array.
pub fn slice(rt: &mut Runtime) -> Result<(), String> {
    let [Value::Array(items), Value::Number(start), Value::Number(end)] = pop_args::<3>(rt)? else {
        return Err("slice requires array, start, end".to_string());
    };
    let end = clamp_index(end, items.len());
    let start = clamp_index(start, items.len()).min(end);
    rt.push(Value::array(items[start..end].to_vec()))
}

pub fn reverse(rt: &mut Runtime) -> Result<(), String> {
    let mut items = pop_array(rt, "reverse")?;
    Rc::make_mut(&mut items).reverse();
    rt.push(Value::Array(items))
}

/// Numbers ascending, strings lexicographically; mixed pairs keep their order
pub fn sort(rt: &mut Runtime) -> Result<(), String> {
    let mut items = pop_array(rt, "sort")?;
    Rc::make_mut(&mut items).sort_by(sort_order);
    rt.push(Value::Array(items))
}

// =============================================================================
// Higher-order
// =============================================================================

/// Blocks that leave nothing contribute nothing
pub fn map(rt: &mut Runtime) -> Result<(), String> {
    let (items, body) = pop_array_and_block(rt, "map")?;
    let mut out = Vec::with_capacity(items.len());
    for item in items.iter() {
        let base = rt.stack_depth();
        rt.push(item.clone())?;
        rt.execute(&body)?;
        if rt.stack_depth() > base {
            out.push(rt.pop()?);
        }
    }
    rt.push(Value::array(out))
}

pub fn filter(rt: &mut Runtime) -> Result<(), String> {
    let (items, body) = pop_array_and_block(rt, "filter")?;
    let mut out = Vec::new();
    for item in items.iter() {
        if holds(call_with(rt, &body, std::slice::from_ref(item))?) {
            out.push(item.clone());
        }
    }
    rt.push(Value::array(out))
}

/// Whatever the block leaves stays on the stack
pub fn each(rt: &mut Runtime) -> Result<(), String> {
    let (items, body) = pop_array_and_block(rt, "each")?;
    for item in items.iter() {
        rt.push(item.clone())?;
        rt.execute(&body)?;
    }
    Ok(())
}

pub fn reduce(rt: &mut Runtime) -> Result<(), String> {
    let [list, init, block] = pop_args::<3>(rt)?;
    let Value::Array(items) = list else {
        return Err("reduce requires array as first argument".to_string());
    };
    let Value::Block(body) = block else {
        return Err("reduce requires block as third argument".to_string());
    };
    let mut acc = init;
    for item in items.iter() {
        acc = call_with(rt, &body, &[acc, item.clone()])?.unwrap_or(Value::Nil);
    }
    rt.push(acc)
}

/// First item the block accepts, or nil
pub fn find(rt: &mut Runtime) -> Result<(), String> {
    let (items, body) = pop_array_and_block(rt, "find")?;
    for item in items.iter() {
        if holds(call_with(rt, &body, std::slice::from_ref(item))?) {
            return rt.push(item.clone());
        }
    }
    rt.push(Value::Nil)
}

pub fn any(rt: &mut Runtime) -> Result<(), String> {
    let (items, body) = pop_array_and_block(rt, "any")?;
    for item in items.iter() {
        if holds(call_with(rt, &body, std::slice::from_ref(item))?) {
            return push_bool(rt, true);
        }
    }
    push_bool(rt, false)
}

/// True for an empty array
pub fn all(rt: &mut Runtime) -> Result<(), String> {
    let (items, body) = pop_array_and_block(rt, "all")?;
    for item in items.iter() {
        if !holds(call_with(rt, &body, std::slice::from_ref(item))?) {
            return push_bool(rt, false);
        }
    }
    push_bool(rt, true)
}
