//! Reactive signals
//!
//! A signal is a shared cell holding a value and a dirty flag. Writing a
//! signal replaces its value and marks it dirty. Dirtiness is global: the
//! runtime's [`SignalRegistry`] sweeps every live signal to answer "did
//! anything change?" once per host frame, then clears the flags after the
//! view tree has been rebuilt.
//!
//! There is no per-signal subscriber graph.

use crate::value::Value;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Shared handle to a signal
pub type SignalRef = Rc<RefCell<Signal>>;

#[derive(Debug, Clone)]
pub struct Signal {
    value: Value,
    dirty: bool,
}

impl Signal {
    pub fn new(value: Value) -> Self {
        Signal {
            value,
            dirty: false,
        }
    }

    pub fn into_ref(self) -> SignalRef {
        Rc::new(RefCell::new(self))
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Copy of the current value
    pub fn get(&self) -> Value {
        self.value.clone()
    }

    /// Replace the value and mark the signal dirty
    pub fn set(&mut self, value: Value) {
        self.value = value;
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// Every signal created by a runtime
///
/// Holds weak handles: a signal nobody references any more simply drops
/// out of the sweep.
#[derive(Debug, Default)]
pub struct SignalRegistry {
    signals: Vec<Weak<RefCell<Signal>>>,
}

impl SignalRegistry {
    pub fn new() -> Self {
        SignalRegistry::default()
    }

    /// Create a signal and register it
    pub fn create(&mut self, value: Value) -> SignalRef {
        let signal = Signal::new(value).into_ref();
        self.register(&signal);
        signal
    }

    pub fn register(&mut self, signal: &SignalRef) {
        self.signals.push(Rc::downgrade(signal));
    }

    /// Is any live signal dirty?
    pub fn any_dirty(&self) -> bool {
        self.signals
            .iter()
            .filter_map(Weak::upgrade)
            .any(|s| s.borrow().is_dirty())
    }

    /// Clear every dirty flag and forget dropped signals
    pub fn clear_dirty(&mut self) {
        self.signals.retain(|weak| match weak.upgrade() {
            Some(signal) => {
                signal.borrow_mut().clear_dirty();
                true
            }
            None => false,
        });
    }

    /// Number of live signals
    pub fn len(&self) -> usize {
        self.signals.iter().filter(|w| w.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_marks_dirty() {
        let mut sig = Signal::new(Value::Number(0.0));
        assert!(!sig.is_dirty());
        sig.set(Value::Number(5.0));
        assert!(sig.is_dirty());
        assert_eq!(sig.get(), Value::Number(5.0));
        sig.clear_dirty();
        assert!(!sig.is_dirty());
        assert_eq!(sig.get(), Value::Number(5.0));
    }

    #[test]
    fn test_registry_sweeps_all_signals() {
        let mut registry = SignalRegistry::new();
        let a = registry.create(Value::Nil);
        let b = registry.create(Value::Nil);
        assert!(!registry.any_dirty());

        b.borrow_mut().set(Value::Bool(true));
        assert!(registry.any_dirty());

        registry.clear_dirty();
        assert!(!registry.any_dirty());
        assert!(!a.borrow().is_dirty());
        assert!(!b.borrow().is_dirty());
    }

    #[test]
    fn test_aliases_share_writes() {
        let mut registry = SignalRegistry::new();
        let a = registry.create(Value::Number(1.0));
        let alias = Rc::clone(&a);
        alias.borrow_mut().set(Value::Number(2.0));
        assert_eq!(a.borrow().get(), Value::Number(2.0));
    }

    #[test]
    fn test_dropped_signals_leave_the_registry() {
        let mut registry = SignalRegistry::new();
        let keep = registry.create(Value::Nil);
        {
            let temp = registry.create(Value::Nil);
            temp.borrow_mut().set(Value::Number(1.0));
        }
        assert_eq!(registry.len(), 1);
        assert!(!registry.any_dirty());
        registry.clear_dirty();
        keep.borrow_mut().set(Value::Nil);
        assert!(registry.any_dirty());
    }
}
