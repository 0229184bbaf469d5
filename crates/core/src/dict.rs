//! Dictionaries and slots
//!
//! A dictionary is an ordered list of named slots plus an optional parent
//! used for lookup fallthrough. Each slot is either code (a token range that
//! runs on every read) or data (a cached value returned by copy).
//!
//! Dictionaries double as the map type. Persistent map operations work on a
//! [`Dict::copy`] and never touch their input.

use crate::token::Body;
use crate::value::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared handle to a dictionary
pub type DictRef = Rc<RefCell<Dict>>;

/// A named member of a dictionary
#[derive(Debug, Clone)]
pub struct Slot {
    pub name: String,
    /// Executable range; empty once the slot holds data
    pub body: Body,
    /// Present when the slot is data
    pub cached: Option<Value>,
}

impl Slot {
    pub fn code(name: impl Into<String>, body: Body) -> Self {
        Slot {
            name: name.into(),
            body,
            cached: None,
        }
    }

    pub fn data(name: impl Into<String>, value: Value) -> Self {
        Slot {
            name: name.into(),
            body: Body::empty(),
            cached: Some(value),
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }

    /// Cached dictionary, if this slot holds one
    pub fn cached_dict(&self) -> Option<DictRef> {
        match &self.cached {
            Some(Value::Dict(d)) => Some(Rc::clone(d)),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct Dict {
    name: Option<String>,
    /// Non-owning: the root dictionary owns every named dictionary
    parent: Option<Weak<RefCell<Dict>>>,
    slots: Vec<Slot>,
}

impl Dict {
    pub fn new(name: Option<&str>) -> Self {
        Dict {
            name: name.map(str::to_string),
            parent: None,
            slots: Vec::new(),
        }
    }

    pub fn into_ref(self) -> DictRef {
        Rc::new(RefCell::new(self))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<DictRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    pub fn set_parent(&mut self, parent: Option<&DictRef>) {
        self.parent = parent.map(Rc::downgrade);
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot defined directly on this dictionary (no inheritance)
    pub fn own_slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    pub fn own_slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.name == name)
    }

    pub fn slots_mut(&mut self) -> &mut [Slot] {
        &mut self.slots
    }

    /// Append a code slot
    pub fn add_slot(&mut self, name: impl Into<String>, body: Body) {
        self.slots.push(Slot::code(name, body));
    }

    /// Install `slot`, replacing an own slot of the same name in place
    pub fn define(&mut self, slot: Slot) {
        match self.slots.iter().position(|s| s.name == slot.name) {
            Some(index) => self.slots[index] = slot,
            None => self.slots.push(slot),
        }
    }

    /// Store `value` as data under `name`
    ///
    /// An existing own slot is rewritten in place (its body cleared);
    /// otherwise a new slot is appended.
    pub fn set_value(&mut self, name: &str, value: Value) {
        match self.own_slot_mut(name) {
            Some(slot) => {
                slot.body = Body::empty();
                slot.cached = Some(value);
            }
            None => self.slots.push(Slot::data(name, value)),
        }
    }

    /// Remove an own slot; true when something was removed
    pub fn remove_slot(&mut self, name: &str) -> bool {
        match self.slots.iter().position(|s| s.name == name) {
            Some(index) => {
                self.slots.remove(index);
                true
            }
            None => false,
        }
    }

    /// Shallow copy of slot metadata, deep copy of cached values
    ///
    /// Name and parent link are kept.
    pub fn copy(&self) -> Dict {
        Dict {
            name: self.name.clone(),
            parent: self.parent.clone(),
            slots: self.slots.clone(),
        }
    }

    /// Find `name` locally, then along the parent chain
    ///
    /// A parent chain that loops back on itself ends the search.
    pub fn lookup(dict: &DictRef, name: &str) -> Option<Slot> {
        let mut visited: Vec<*const RefCell<Dict>> = Vec::new();
        let mut current = Rc::clone(dict);
        loop {
            visited.push(Rc::as_ptr(&current));
            let next = {
                let d = current.borrow();
                if let Some(slot) = d.own_slot(name) {
                    return Some(slot.clone());
                }
                d.parent()?
            };
            if visited.contains(&Rc::as_ptr(&next)) {
                return None;
            }
            current = next;
        }
    }

    /// True when `name` resolves in `dict` or an ancestor
    pub fn has(dict: &DictRef, name: &str) -> bool {
        Dict::lookup(dict, name).is_some()
    }

    /// Would making `parent` the parent of `child` create a cycle?
    pub fn would_cycle(child: &DictRef, parent: &DictRef) -> bool {
        let mut current = Some(Rc::clone(parent));
        let mut steps = 0usize;
        while let Some(d) = current {
            if Rc::ptr_eq(&d, child) {
                return true;
            }
            steps += 1;
            if steps > 10_000 {
                return true;
            }
            current = d.borrow().parent();
        }
        false
    }
}

impl fmt::Debug for Dict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.slots.iter().map(|s| s.name.as_str()).collect();
        f.debug_struct("Dict")
            .field("name", &self.name)
            .field("has_parent", &self.parent().is_some())
            .field("slots", &names)
            .finish()
    }
}

/// Deep structural equality over pure data
///
/// Dictionaries compare their cached slots by name (order-insensitive);
/// code slots are ignored. Everything else uses language equality.
pub fn data_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Dict(x), Value::Dict(y)) => {
            if Rc::ptr_eq(x, y) {
                return true;
            }
            let (x, y) = (x.borrow(), y.borrow());
            let xs: Vec<&Slot> = x.slots().iter().filter(|s| s.is_cached()).collect();
            let ys: Vec<&Slot> = y.slots().iter().filter(|s| s.is_cached()).collect();
            xs.len() == ys.len()
                && xs.iter().all(|sx| {
                    ys.iter().any(|sy| {
                        sy.name == sx.name
                            && matches!((&sx.cached, &sy.cached), (Some(a), Some(b)) if data_eq(a, b))
                    })
                })
        }
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(a, b)| data_eq(a, b))
        }
        _ => a == b,
    }
}
