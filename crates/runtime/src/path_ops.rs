//! Dotted-path words
//!
//! `set-path` and `get-path` address a slot through named dictionaries with
//! a string such as `"settings.theme.color"`: the first segment names a
//! root dictionary, the middle segments walk nested dictionaries, the last
//! names the slot.
//!
//! Unlike the map words these mutate in place: `set-path` rewrites the
//! addressed slot as data inside the live dictionary.

use crate::builtins::pop_args;
use crate::runtime::Runtime;
use pith_core::{Dict, DictRef, Value};
use std::rc::Rc;

/// Split a path into its non-empty segments
fn segments<'a>(path: &'a str, word: &str) -> Result<Vec<&'a str>, String> {
    let parts: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    match parts.len() {
        0 => Err(format!("{}: empty path", word)),
        1 => Err(format!("{}: invalid path", word)),
        _ => Ok(parts),
    }
}

fn root_dict(rt: &Runtime, name: &str, word: &str) -> Result<DictRef, String> {
    rt.find_dict(name)
        .ok_or_else(|| format!("{}: unknown dictionary '{}'", word, name))
}

/// Stack effect: ( value path -- )
///
/// Intermediate segments may be code slots that produce a dictionary; they
/// run with their owning dictionary current.
pub fn set_path(rt: &mut Runtime) -> Result<(), String> {
    let [value, path] = pop_args::<2>(rt)?;
    let Value::String(path) = path else {
        return Err("set-path requires a string path".to_string());
    };
    let parts = segments(&path, "set-path")?;
    let (last, middle) = parts[1..].split_last().ok_or("set-path: invalid path")?;

    let mut current = root_dict(rt, parts[0], "set-path")?;
    for name in middle {
        let slot = Dict::lookup(&current, name)
            .ok_or_else(|| format!("set-path: unknown slot '{}'", name))?;
        current = match &slot.cached {
            Some(Value::Dict(d)) => Rc::clone(d),
            Some(_) => return Err(format!("set-path: '{}' is not a dictionary", name)),
            None => {
                let produced = rt.with_dict(&current, |rt| {
                    rt.execute_slot(&slot)?;
                    rt.pop()
                })?;
                match produced {
                    Value::Dict(d) => d,
                    _ => return Err(format!("set-path: '{}' is not a dictionary", name)),
                }
            }
        };
    }

    current.borrow_mut().set_value(last, value);
    Ok(())
}

/// Stack effect: ( path -- value )
///
/// A data slot yields a copy of its value; a code slot runs with its
/// dictionary current and leaves whatever it produces.
pub fn get_path(rt: &mut Runtime) -> Result<(), String> {
    let Value::String(path) = rt.pop()? else {
        return Err("get-path requires a string path".to_string());
    };
    let parts = segments(&path, "get-path")?;
    let (last, middle) = parts[1..].split_last().ok_or("get-path: invalid path")?;

    let mut current = root_dict(rt, parts[0], "get-path")?;
    for name in middle {
        let slot = Dict::lookup(&current, name)
            .ok_or_else(|| format!("get-path: unknown slot '{}'", name))?;
        current = slot
            .cached_dict()
            .ok_or_else(|| format!("get-path: '{}' is not a dictionary", name))?;
    }

    let slot = Dict::lookup(&current, last)
        .ok_or_else(|| format!("get-path: unknown slot '{}'", last))?;
    match slot.cached {
        Some(value) => rt.push(value),
        None => rt.with_dict(&current, |rt| rt.execute_slot(&slot)),
    }
}
