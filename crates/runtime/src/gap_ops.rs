//! Gap buffer words
//!
//! Buffers are values: every editing word returns an edited copy and the
//! input buffer keeps its content and cursor.

use crate::builtins::{clamp_index, pop_args, push_number};
use crate::runtime::Runtime;
use pith_core::{GapBuffer, Value};
use std::rc::Rc;

/// Pop ( x gb ) where `x` must match `extract`
fn pop_operand_and_buffer<T>(
    rt: &mut Runtime,
    word: &str,
    operand: &str,
    extract: impl FnOnce(Value) -> Option<T>,
) -> Result<(T, Rc<GapBuffer>), String> {
    let [x, gb] = pop_args::<2>(rt)?;
    let Value::GapBuffer(gb) = gb else {
        return Err(format!("{} requires a gap buffer", word));
    };
    match extract(x) {
        Some(x) => Ok((x, gb)),
        None => Err(format!("{} requires {}", word, operand)),
    }
}

fn number(value: Value) -> Option<f64> {
    value.as_number()
}

fn pop_buffer(rt: &mut Runtime, word: &str) -> Result<Rc<GapBuffer>, String> {
    match rt.pop()? {
        Value::GapBuffer(gb) => Ok(gb),
        _ => Err(format!("{} requires a gap buffer", word)),
    }
}

/// Stack effect: ( -- gb )
pub fn new_gap(rt: &mut Runtime) -> Result<(), String> {
    rt.push(Value::gap_buffer(GapBuffer::new()))
}

/// Stack effect: ( str -- gb )
///
/// The cursor starts at the beginning of the text.
pub fn string_to_gap(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => rt.push(Value::gap_buffer(GapBuffer::from_text(&s))),
        _ => Err("string-to-gap requires a string".to_string()),
    }
}

/// Stack effect: ( gb -- str )
pub fn gap_to_string(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::GapBuffer(gb) => rt.push(Value::from(gb.text())),
        _ => Err("gap-to-string requires a gap buffer".to_string()),
    }
}

/// Stack effect: ( str gb -- gb' )
pub fn insert(rt: &mut Runtime) -> Result<(), String> {
    let (text, mut gb) = pop_operand_and_buffer(rt, "gap-insert", "a string to insert", |v| match v {
        Value::String(s) => Some(s),
        _ => None,
    })?;
    Rc::make_mut(&mut gb).insert(&text);
    rt.push(Value::GapBuffer(gb))
}

/// Stack effect: ( n gb -- gb' )
///
/// Positive `n` deletes after the cursor, negative before it.
pub fn delete(rt: &mut Runtime) -> Result<(), String> {
    let (n, mut gb) = pop_operand_and_buffer(rt, "gap-delete", "a number", number)?;
    Rc::make_mut(&mut gb).delete(n as i64);
    rt.push(Value::GapBuffer(gb))
}

/// Stack effect: ( delta gb -- gb' )
pub fn move_cursor(rt: &mut Runtime) -> Result<(), String> {
    let (delta, mut gb) = pop_operand_and_buffer(rt, "gap-move", "a number", number)?;
    Rc::make_mut(&mut gb).move_cursor(delta as i64);
    rt.push(Value::GapBuffer(gb))
}

/// Stack effect: ( pos gb -- gb' )
pub fn goto(rt: &mut Runtime) -> Result<(), String> {
    let (pos, mut gb) = pop_operand_and_buffer(rt, "gap-goto", "a number", number)?;
    let pos = clamp_index(pos, gb.len());
    Rc::make_mut(&mut gb).goto(pos);
    rt.push(Value::GapBuffer(gb))
}

/// Stack effect: ( gb -- n )
pub fn cursor(rt: &mut Runtime) -> Result<(), String> {
    let gb = pop_buffer(rt, "gap-cursor")?;
    push_number(rt, gb.cursor() as f64)
}

/// Stack effect: ( gb -- n )
pub fn length(rt: &mut Runtime) -> Result<(), String> {
    let gb = pop_buffer(rt, "gap-length")?;
    push_number(rt, gb.len() as f64)
}

/// Stack effect: ( pos gb -- str|nil )
pub fn char_at(rt: &mut Runtime) -> Result<(), String> {
    let (pos, gb) = pop_operand_and_buffer(rt, "gap-char", "a position", number)?;
    let found = if pos >= 0.0 {
        gb.char_at(pos as usize)
    } else {
        None
    };
    rt.push(found.map_or(Value::Nil, |c| Value::from(c.to_string())))
}
