//! Persistent map words
//!
//! Maps are unnamed dictionaries. `set`, `remove` and `merge` return a
//! fresh copy and never touch the map they were given; `get` and `has`
//! see inherited slots through the parent chain, `keys` and `values` only
//! own slots.

use crate::builtins::{pop_args, push_bool};
use crate::runtime::Runtime;
use pith_core::{Dict, DictRef, Value};
use std::rc::Rc;

/// Pop ( map key ) for a keyed word
fn pop_map_and_key(rt: &mut Runtime, word: &str) -> Result<(DictRef, Rc<str>), String> {
    match pop_args::<2>(rt)? {
        [Value::Dict(map), Value::String(key)] => Ok((map, key)),
        [Value::Dict(_), _] => Err(format!("{} requires string key", word)),
        _ => Err(format!("{} requires a map", word)),
    }
}

fn pop_map(rt: &mut Runtime, word: &str) -> Result<DictRef, String> {
    match rt.pop()? {
        Value::Dict(map) => Ok(map),
        _ => Err(format!("{} requires a map", word)),
    }
}

/// Plain-data copy of a value
///
/// Dictionaries lose their parent and code slots, blocks and views become
/// nil, signals are replaced by their current value.
pub fn sanitize_value(value: &Value) -> Value {
    match value {
        Value::Dict(dict) => {
            let src = dict.borrow();
            let mut copy = Dict::new(src.name());
            for slot in src.slots() {
                if let Some(cached) = &slot.cached {
                    copy.set_value(&slot.name, sanitize_value(cached));
                }
            }
            Value::dict(copy)
        }
        Value::Array(items) => Value::array(items.iter().map(sanitize_value).collect()),
        Value::Block(_) | Value::View(_) => Value::Nil,
        Value::Signal(sig) => sanitize_value(sig.borrow().value()),
        other => other.clone(),
    }
}

/// Stack effect: ( -- map )
pub fn new_map(rt: &mut Runtime) -> Result<(), String> {
    rt.push(Value::dict(Dict::new(None)))
}

/// Stack effect: ( map key -- value|nil )
///
/// Code slots read as nil; a signal reads as its current value.
pub fn get(rt: &mut Runtime) -> Result<(), String> {
    let (map, key) = pop_map_and_key(rt, "get")?;
    let value = Dict::lookup(&map, &key)
        .and_then(|slot| slot.cached)
        .map_or(Value::Nil, Value::unwrap_signal);
    rt.push(value)
}

/// Stack effect: ( value map key -- map' )
pub fn set(rt: &mut Runtime) -> Result<(), String> {
    let [value, map, key] = pop_args::<3>(rt)?;
    let Value::Dict(map) = map else {
        return Err("set requires a map".to_string());
    };
    let Value::String(key) = key else {
        return Err("set requires string key".to_string());
    };
    let mut copy = map.borrow().copy();
    copy.set_value(&key, value);
    rt.push(Value::dict(copy))
}

/// Stack effect: ( map -- arr )
pub fn keys(rt: &mut Runtime) -> Result<(), String> {
    let map = pop_map(rt, "keys")?;
    let names = map
        .borrow()
        .slots()
        .iter()
        .map(|slot| Value::from(slot.name.as_str()))
        .collect();
    rt.push(Value::array(names))
}

/// Stack effect: ( map -- arr )
pub fn values(rt: &mut Runtime) -> Result<(), String> {
    let map = pop_map(rt, "values")?;
    let values = map
        .borrow()
        .slots()
        .iter()
        .map(|slot| slot.cached.clone().unwrap_or(Value::Nil))
        .collect();
    rt.push(Value::array(values))
}

/// Stack effect: ( map key -- bool )
pub fn has(rt: &mut Runtime) -> Result<(), String> {
    let (map, key) = pop_map_and_key(rt, "has")?;
    push_bool(rt, Dict::has(&map, &key))
}

/// Stack effect: ( map key -- map' )
pub fn remove(rt: &mut Runtime) -> Result<(), String> {
    let (map, key) = pop_map_and_key(rt, "remove")?;
    let mut copy = map.borrow().copy();
    copy.remove_slot(&key);
    rt.push(Value::dict(copy))
}

/// Stack effect: ( m1 m2 -- m )
///
/// `m2`'s data slots win; its code slots are ignored.
pub fn merge(rt: &mut Runtime) -> Result<(), String> {
    let [Value::Dict(m1), Value::Dict(m2)] = pop_args::<2>(rt)? else {
        return Err("merge requires two maps".to_string());
    };
    let mut merged = m1.borrow().copy();
    for slot in m2.borrow().slots() {
        if let Some(cached) = &slot.cached {
            merged.set_value(&slot.name, cached.clone());
        }
    }
    rt.push(Value::dict(merged))
}

/// Stack effect: ( a -- a' )
pub fn sanitize(rt: &mut Runtime) -> Result<(), String> {
    let value = rt.pop()?;
    rt.push(sanitize_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pith_core::data_eq;

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
    fn test_set_then_get() {
        assert_eq!(run("1 new-map \"a\" set \"a\" get"), Value::Number(1.0));
        assert_eq!(run("new-map \"missing\" get"), Value::Nil);
    }

    #[test]
    fn test_set_does_not_touch_original() {
        let mut rt = Runtime::new();
        assert!(rt.eval("new-map dup 5 swap \"x\" set"));
        let updated = rt.pop().unwrap();
        let original = rt.pop().unwrap();
        assert_eq!(original.as_dict().unwrap().borrow().len(), 0);
        assert_eq!(updated.as_dict().unwrap().borrow().len(), 1);
    }

    #[test]
    fn test_keys_values_has_remove() {
        let mut rt = Runtime::new();
        assert!(rt.eval("1 new-map \"a\" set 2 swap \"b\" set"));
        let map = rt.pop().unwrap();

        rt.push(map.clone()).unwrap();
        assert!(rt.eval("keys"));
        assert_eq!(
            rt.pop().unwrap(),
            Value::array(vec![Value::from("a"), Value::from("b")])
        );

        rt.push(map.clone()).unwrap();
        assert!(rt.eval("values"));
        assert_eq!(
            rt.pop().unwrap(),
            Value::array(vec![Value::Number(1.0), Value::Number(2.0)])
        );

        rt.push(map.clone()).unwrap();
        assert!(rt.eval("\"a\" remove dup \"a\" has swap \"b\" has"));
        assert_eq!(rt.stack(), &[Value::Bool(false), Value::Bool(true)]);
        assert_eq!(map.as_dict().unwrap().borrow().len(), 2);
    }

    #[test]
    fn test_merge_prefers_second() {
        let merged = run(
            "1 new-map \"a\" set 2 swap \"b\" set \
             9 new-map \"b\" set 3 swap \"c\" set merge",
        );
        let expected = run("1 new-map \"a\" set 9 swap \"b\" set 3 swap \"c\" set");
        assert!(data_eq(&merged, &expected));
    }

    #[test]
    fn test_get_unwraps_signal() {
        let mut rt = Runtime::new();
        assert!(rt.load_string("store:\n    count: 3 signal\nend\n", "test"));
        assert!(rt.eval("store \"count\" get"));
        assert_eq!(rt.pop().unwrap(), Value::Number(3.0));
    }

    #[test]
    fn test_sanitize_strips_code_and_runtime_values() {
        let mut rt = Runtime::new();
        let source = "model:\n    name: \"pith\"\n    greet: \"hi\" print\n    count: 2 signal\nend\n";
        assert!(rt.load_string(source, "test"));
        assert!(rt.eval("model sanitize"));
        let clean = rt.pop().unwrap();
        let clean = clean.as_dict().unwrap().borrow();
        assert_eq!(clean.name(), Some("model"));
        assert!(clean.own_slot("greet").is_none());
        assert_eq!(clean.own_slot("count").unwrap().cached, Some(Value::Number(2.0)));
        assert_eq!(clean.own_slot("name").unwrap().cached, Some(Value::from("pith")));

        assert_eq!(run("[do end 1] sanitize"), Value::array(vec![Value::Nil, Value::Number(1.0)]));
    }

    #[test]
    fn test_errors() {
        assert_eq!(fail("1 \"a\" get"), "get requires a map");
        assert_eq!(fail("new-map 1 get"), "get requires string key");
        assert_eq!(fail("1 2 \"a\" set"), "set requires a map");
        assert_eq!(fail("1 new-map 2 set"), "set requires string key");
        assert_eq!(fail("1 keys"), "keys requires a map");
        assert_eq!(fail("new-map 1 merge"), "merge requires two maps");
        assert_eq!(fail("new-map nil remove"), "remove requires string key");
    }
}
