//! Word resolution
//!
//! A bare word is offered to an ordered chain of resolvers; the first one
//! that recognises it runs it. The standard chain is
//!
//! 1. builtins
//! 2. the current dictionary and its parents
//! 3. named dictionaries in the root
//!
//! A word nobody claims fails with `Unknown word: <name>`. Hosts can append
//! resolvers of their own with [`Runtime::push_resolver`].

use crate::runtime::Runtime;
use pith_core::Dict;
use std::rc::Rc;

/// One link of the resolution chain
pub trait WordResolver {
    /// Short label for debugging
    fn name(&self) -> &'static str;

    /// `None` when this resolver does not know `word`; otherwise the
    /// outcome of running it
    fn resolve(&self, rt: &mut Runtime, word: &str) -> Option<Result<(), String>>;
}

pub struct BuiltinResolver;

impl WordResolver for BuiltinResolver {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn resolve(&self, rt: &mut Runtime, word: &str) -> Option<Result<(), String>> {
        let func = *rt.builtins.get(word)?;
        Some(func(rt))
    }
}

/// Slots of the current dictionary, inherited ones included
pub struct CurrentDictResolver;

impl WordResolver for CurrentDictResolver {
    fn name(&self) -> &'static str {
        "current-dict"
    }

    fn resolve(&self, rt: &mut Runtime, word: &str) -> Option<Result<(), String>> {
        let slot = Dict::lookup(&rt.current, word)?;
        Some(match slot.cached_dict() {
            Some(dict) => rt.mount_component(&dict),
            None => rt.execute_slot(&slot),
        })
    }
}

/// Named dictionaries, reachable from anywhere
pub struct RootDictResolver;

impl WordResolver for RootDictResolver {
    fn name(&self) -> &'static str {
        "root-dict"
    }

    fn resolve(&self, rt: &mut Runtime, word: &str) -> Option<Result<(), String>> {
        let dict = rt.find_dict(word)?;
        Some(rt.mount_component(&dict))
    }
}

#[derive(Clone)]
pub struct ResolverChain {
    resolvers: Vec<Rc<dyn WordResolver>>,
}

impl ResolverChain {
    pub fn standard() -> Self {
        ResolverChain {
            resolvers: vec![
                Rc::new(BuiltinResolver),
                Rc::new(CurrentDictResolver),
                Rc::new(RootDictResolver),
            ],
        }
    }

    pub fn push(&mut self, resolver: Rc<dyn WordResolver>) {
        self.resolvers.push(resolver);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn resolve(&self, rt: &mut Runtime, word: &str) -> Result<(), String> {
        for resolver in &self.resolvers {
            if let Some(result) = resolver.resolve(rt, word) {
                return result;
            }
        }
        Err(format!("Unknown word: {}", word))
    }
}
