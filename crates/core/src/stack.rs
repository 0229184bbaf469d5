//! Bounded operand stack
//!
//! The engine and every builtin share one stack per runtime. Shuffle words
//! are implemented here so they can work on the vector directly instead of
//! popping and re-pushing.

use crate::value::Value;

/// Default operand stack depth
pub const DEFAULT_STACK_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct Stack {
    items: Vec<Value>,
    limit: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Stack::new(DEFAULT_STACK_LIMIT)
    }
}

impl Stack {
    pub fn new(limit: usize) -> Self {
        Stack {
            items: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn depth(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, value: Value) -> Result<(), String> {
        if self.items.len() >= self.limit {
            return Err("Stack overflow".to_string());
        }
        self.items.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Value, String> {
        self.items.pop().ok_or_else(|| "Stack underflow".to_string())
    }

    /// Top value without removing it
    pub fn peek(&self) -> Option<&Value> {
        self.items.last()
    }

    /// Pop `n` values, returned bottom-to-top
    ///
    /// Nothing is removed when fewer than `n` values are present.
    pub fn pop_n(&mut self, n: usize) -> Result<Vec<Value>, String> {
        if self.items.len() < n {
            return Err("Stack underflow".to_string());
        }
        let at = self.items.len() - n;
        Ok(self.items.split_off(at))
    }

    /// Drop everything above `depth`, handing the removed values back
    pub fn truncate(&mut self, depth: usize) -> Vec<Value> {
        let at = depth.min(self.items.len());
        self.items.split_off(at)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Values bottom-to-top
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    fn need(&self, n: usize) -> Result<usize, String> {
        if self.items.len() < n {
            Err("Stack underflow".to_string())
        } else {
            Ok(self.items.len())
        }
    }

    /// ( a -- a a )
    pub fn dup(&mut self) -> Result<(), String> {
        let len = self.need(1)?;
        let top = self.items[len - 1].clone();
        self.push(top)
    }

    /// ( a -- )
    pub fn drop_top(&mut self) -> Result<(), String> {
        self.pop().map(|_| ())
    }

    /// ( a b -- b a )
    pub fn swap(&mut self) -> Result<(), String> {
        let len = self.need(2)?;
        self.items.swap(len - 1, len - 2);
        Ok(())
    }

    /// ( a b -- a b a )
    pub fn over(&mut self) -> Result<(), String> {
        let len = self.need(2)?;
        let second = self.items[len - 2].clone();
        self.push(second)
    }

    /// ( a b c -- b c a )
    pub fn rot(&mut self) -> Result<(), String> {
        let len = self.need(3)?;
        self.items[len - 3..].rotate_left(1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(stack: &Stack) -> Vec<f64> {
        stack.as_slice().iter().filter_map(Value::as_number).collect()
    }

    fn stack_of(values: &[f64]) -> Stack {
        let mut stack = Stack::default();
        for v in values {
            stack.push(Value::Number(*v)).unwrap();
        }
        stack
    }

    #[test]
    fn test_push_pop() {
        let mut stack = stack_of(&[1.0, 2.0]);
        assert_eq!(stack.pop().unwrap(), Value::Number(2.0));
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_underflow_message() {
        let mut stack = Stack::default();
        assert_eq!(stack.pop().unwrap_err(), "Stack underflow");
        assert_eq!(stack.swap().unwrap_err(), "Stack underflow");
    }

    #[test]
    fn test_overflow_at_limit() {
        let mut stack = Stack::new(2);
        stack.push(Value::Nil).unwrap();
        stack.push(Value::Nil).unwrap();
        assert_eq!(stack.push(Value::Nil).unwrap_err(), "Stack overflow");
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_pop_n_order_and_atomicity() {
        let mut stack = stack_of(&[1.0, 2.0, 3.0]);
        assert!(stack.pop_n(4).is_err());
        assert_eq!(stack.depth(), 3);
        let popped = stack.pop_n(2).unwrap();
        assert_eq!(popped, vec![Value::Number(2.0), Value::Number(3.0)]);
    }

    #[test]
    fn test_shuffles() {
        let mut stack = stack_of(&[1.0, 2.0, 3.0]);
        stack.rot().unwrap();
        assert_eq!(nums(&stack), vec![2.0, 3.0, 1.0]);
        stack.swap().unwrap();
        assert_eq!(nums(&stack), vec![2.0, 1.0, 3.0]);
        stack.over().unwrap();
        assert_eq!(nums(&stack), vec![2.0, 1.0, 3.0, 1.0]);
        stack.dup().unwrap();
        stack.drop_top().unwrap();
        assert_eq!(nums(&stack), vec![2.0, 1.0, 3.0, 1.0]);
    }

    #[test]
    fn test_truncate_returns_removed() {
        let mut stack = stack_of(&[1.0, 2.0, 3.0]);
        let removed = stack.truncate(1);
        assert_eq!(removed.len(), 2);
        assert_eq!(nums(&stack), vec![1.0]);
        assert!(stack.truncate(5).is_empty());
    }
}
