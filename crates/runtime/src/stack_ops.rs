//! Stack shuffling words

use crate::runtime::Runtime;

/// Stack effect: ( a -- a a )
pub fn dup(rt: &mut Runtime) -> Result<(), String> {
    rt.stack.dup()
}

/// Stack effect: ( a -- )
pub fn drop(rt: &mut Runtime) -> Result<(), String> {
    rt.stack.drop_top()
}

/// Stack effect: ( a b -- b a )
pub fn swap(rt: &mut Runtime) -> Result<(), String> {
    rt.stack.swap()
}

/// Stack effect: ( a b -- a b a )
pub fn over(rt: &mut Runtime) -> Result<(), String> {
    rt.stack.over()
}

/// Stack effect: ( a b c -- b c a )
pub fn rot(rt: &mut Runtime) -> Result<(), String> {
    rt.stack.rot()
}
