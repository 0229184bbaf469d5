//! JSON codec for maps
//!
//! `to-json` writes a dictionary's data slots in insertion order; code slots
//! are skipped. `parse-json` reads an object into an unnamed dictionary
//! whose slots are all data.
//!
//! Whole numbers up to 2^53 in magnitude are written without a fraction,
//! so `3` round-trips as `3` rather than `3.0`. Values JSON cannot hold
//! (blocks, views, gap buffers, NaN and infinities) are written as `null`.

use crate::runtime::Runtime;
use pith_core::{Dict, Value};
use serde_json::{Map, Number, Value as Json};

/// Largest magnitude written as an integer
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Convert a value to JSON
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Nil => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => Json::String(s.to_string()),
        Value::Array(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Dict(dict) => {
            let mut object = Map::new();
            for slot in dict.borrow().slots() {
                if let Some(cached) = &slot.cached {
                    object.insert(slot.name.clone(), value_to_json(cached));
                }
            }
            Json::Object(object)
        }
        Value::Signal(sig) => value_to_json(sig.borrow().value()),
        Value::Block(_) | Value::View(_) | Value::GapBuffer(_) => Json::Null,
    }
}

fn number_to_json(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INT {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Json::Null, Json::Number)
}

/// Convert parsed JSON to a value
///
/// Objects become unnamed dictionaries holding data slots.
pub fn json_to_value(json: &Json) -> Value {
    match json {
        Json::Null => Value::Nil,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => n.as_f64().map_or(Value::Nil, Value::Number),
        Json::String(s) => Value::from(s.as_str()),
        Json::Array(items) => Value::array(items.iter().map(json_to_value).collect()),
        Json::Object(object) => {
            let mut dict = Dict::new(None);
            for (key, item) in object {
                dict.set_value(key, json_to_value(item));
            }
            Value::dict(dict)
        }
    }
}

/// Stack effect: ( map -- str )
pub fn to_json(rt: &mut Runtime) -> Result<(), String> {
    let value = rt.pop()?;
    if !matches!(value, Value::Dict(_)) {
        return Err("to-json requires a map".to_string());
    }
    let text = serde_json::to_string(&value_to_json(&value))
        .map_err(|e| format!("JSON encode error: {}", e))?;
    rt.push(Value::from(text))
}

/// Stack effect: ( str -- map )
pub fn parse_json(rt: &mut Runtime) -> Result<(), String> {
    let Value::String(text) = rt.pop()? else {
        return Err("parse-json requires a string".to_string());
    };
    if !text.trim_start().starts_with('{') {
        return Err("parse-json requires JSON object at root".to_string());
    }
    let json: Json = serde_json::from_str(&text).map_err(|e| format!("JSON parse error: {}", e))?;
    rt.push(json_to_value(&json))
}
