//! Token-range interpreter
//!
//! Executes a [`Body`] token by token against the operand stack:
//!
//! - literals push themselves
//! - words dispatch through the resolver chain; `name!` writes a signal
//! - `a.b.c` walks a dotted path from a named dictionary
//! - `if ... [else ...] end` pops a condition and runs one branch
//! - `do ... end` pushes the enclosed range as a block
//! - `[ ... ]` runs its interior and collects what it pushed into an array
//!
//! Names are dynamically scoped: a block or slot body resolves words
//! against whichever dictionary is current when it runs, not where it was
//! written.

use crate::runtime::Runtime;
use crate::ui;
use pith_core::{Body, Dict, DictRef, ErrorSlot, Slot, Token, TokenKind, Value, tokenize};
use std::rc::Rc;
use tracing::trace;

/// Value of a literal token
pub(crate) fn literal(token: &Token) -> Option<Value> {
    match token.kind {
        TokenKind::Number => Some(Value::Number(token.text().parse().unwrap_or(0.0))),
        TokenKind::String => Some(Value::from(token.text())),
        TokenKind::True => Some(Value::Bool(true)),
        TokenKind::False => Some(Value::Bool(false)),
        TokenKind::Nil => Some(Value::Nil),
        _ => None,
    }
}

/// A bare word of the form `name!`
fn signal_write_target(word: &str) -> Option<&str> {
    match word.strip_suffix('!') {
        Some(name) if !name.is_empty() => Some(name),
        _ => None,
    }
}

impl Runtime {
    /// Run every token of `body`
    pub(crate) fn execute(&mut self, body: &Body) -> Result<(), String> {
        let end = body.end();
        let mut i = body.start();
        while i < end {
            let token = body.token(i);
            match token.kind {
                TokenKind::Word => {
                    let chain_end = dotted_chain_end(body, i);
                    if chain_end > i {
                        self.execute_path(body, i, chain_end)?;
                        i = chain_end;
                    } else {
                        self.execute_word(token.text())?;
                    }
                }
                TokenKind::If => i = self.execute_if(body, i)?,
                TokenKind::Do => i = self.push_block(body, i)?,
                TokenKind::LBracket => i = self.build_array(body, i)?,
                _ => {
                    if let Some(value) = literal(token) {
                        self.push(value)?;
                    }
                }
            }
            i += 1;
        }
        Ok(())
    }

    /// Read a slot: data pushes a copy, code runs
    pub(crate) fn execute_slot(&mut self, slot: &Slot) -> Result<(), String> {
        match &slot.cached {
            Some(Value::Signal(signal)) => {
                let value = signal.borrow().get();
                self.push(value)
            }
            Some(value) => self.push(value.clone()),
            None => self.execute(&slot.body),
        }
    }

    pub(crate) fn execute_word(&mut self, word: &str) -> Result<(), String> {
        trace!("{:indent$}{}", "", word, indent = self.depth * 2);
        self.depth += 1;
        let result = match signal_write_target(word) {
            Some(name) => self.write_signal(name, word),
            None => {
                let chain = Rc::clone(&self.resolvers);
                chain.resolve(self, word)
            }
        };
        self.depth -= 1;
        result
    }

    /// Use a named dictionary as a component
    ///
    /// With a `ui` slot the dictionary renders itself: `ui` runs with the
    /// dictionary current and the dictionary's style slots are applied to
    /// the view it leaves on top. Without one the dictionary is pushed.
    pub(crate) fn mount_component(&mut self, dict: &DictRef) -> Result<(), String> {
        let Some(ui) = Dict::lookup(dict, "ui") else {
            return self.push(Value::Dict(Rc::clone(dict)));
        };
        self.with_dict(dict, |rt| rt.execute_slot(&ui))?;
        if let Some(Value::View(view)) = self.stack.peek() {
            ui::apply_styles(view, dict);
        }
        Ok(())
    }

    fn write_signal(&mut self, name: &str, word: &str) -> Result<(), String> {
        let slot = Dict::lookup(&self.current, name).or_else(|| Dict::lookup(&self.root, name));
        let Some(Value::Signal(signal)) = slot.and_then(|s| s.cached) else {
            return Err(format!("Unknown signal: {}", word));
        };
        if self.stack.is_empty() {
            return Err("Signal write requires value on stack".to_string());
        }
        let value = self.pop()?;
        signal.borrow_mut().set(value);
        Ok(())
    }

    /// `a.b.c` spanning tokens `[start, last]`
    fn execute_path(&mut self, body: &Body, start: usize, last: usize) -> Result<(), String> {
        let segments: Vec<&str> = (start..=last)
            .step_by(2)
            .map(|i| body.token(i).text())
            .collect();
        let (first, rest) = segments
            .split_first()
            .ok_or_else(|| "Empty path".to_string())?;
        let (target, middle) = rest
            .split_last()
            .ok_or_else(|| "Empty path".to_string())?;

        let mut dict = self
            .find_dict(first)
            .ok_or_else(|| format!("Unknown dictionary: {}", first))?;

        for part in middle {
            let slot = Dict::lookup(&dict, part)
                .ok_or_else(|| format!("Unknown slot '{}' in path", part))?;
            dict = match slot.cached_dict() {
                Some(next) => next,
                None => {
                    self.with_dict(&dict, |rt| rt.execute_slot(&slot))?;
                    match self.pop()? {
                        Value::Dict(next) => next,
                        _ => return Err(format!("'{}' is not a dictionary/map", part)),
                    }
                }
            };
        }

        if let Some(name) = signal_write_target(target) {
            let Some(Value::Signal(signal)) = Dict::lookup(&dict, name).and_then(|s| s.cached)
            else {
                return Err(format!("Unknown signal '{}'", target));
            };
            if self.stack.is_empty() {
                return Err("Signal write requires value on stack".to_string());
            }
            let value = self.pop()?;
            signal.borrow_mut().set(value);
            return Ok(());
        }

        let slot = Dict::lookup(&dict, target)
            .ok_or_else(|| format!("Unknown slot '{}' in path", target))?;
        self.with_dict(&dict, |rt| rt.execute_slot(&slot))
    }

    /// `if` at `start`; returns the index of its `end`
    fn execute_if(&mut self, body: &Body, start: usize) -> Result<usize, String> {
        if self.stack.is_empty() {
            return Err("if requires condition on stack".to_string());
        }
        let condition = self.pop()?.is_truthy();

        let branch_start = start + 1;
        let mut else_pos = None;
        let mut end_pos = branch_start;
        let mut depth = 1;
        for j in branch_start..body.end() {
            match body.token(j).kind {
                TokenKind::If | TokenKind::Do => depth += 1,
                TokenKind::Else if depth == 1 => else_pos = Some(j),
                TokenKind::End => {
                    depth -= 1;
                    if depth == 0 {
                        end_pos = j;
                        break;
                    }
                }
                _ => {}
            }
        }

        let branch = match (condition, else_pos) {
            (true, Some(e)) => body.sub(branch_start, e),
            (true, None) => body.sub(branch_start, end_pos),
            (false, Some(e)) => body.sub(e + 1, end_pos),
            (false, None) => Body::empty(),
        };
        self.execute(&branch)?;
        Ok(end_pos)
    }

    /// `do` at `start`; pushes the block and returns the index of its `end`
    fn push_block(&mut self, body: &Body, start: usize) -> Result<usize, String> {
        let block_start = start + 1;
        let (block_end, resume) = match matching_end(body, block_start) {
            Some(end) => (end, end),
            None => (body.end(), body.end() - 1),
        };
        self.push(Value::Block(body.sub(block_start, block_end)))?;
        Ok(resume)
    }

    /// `[` at `start`; returns the index of the matching `]`
    fn build_array(&mut self, body: &Body, start: usize) -> Result<usize, String> {
        let inner_start = start + 1;
        let mut close = inner_start;
        let mut depth = 1;
        for j in inner_start..body.end() {
            match body.token(j).kind {
                TokenKind::LBracket => depth += 1,
                TokenKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        close = j;
                        break;
                    }
                }
                _ => {}
            }
        }

        let height = self.stack.depth();
        let result = self.execute(&body.sub(inner_start, close));
        let items = self.stack.truncate(height);
        let pushed = self.push(Value::array(items));
        result?;
        pushed?;
        Ok(close)
    }

    /// Tokenize `source` and run it against the current dictionary
    pub(crate) fn eval_source(&mut self, source: &str) -> Result<(), String> {
        let mut lex_errors = ErrorSlot::new();
        let tokens = tokenize(source, &mut lex_errors);
        if let Some(msg) = lex_errors.take() {
            return Err(msg);
        }
        if tokens.len() > self.config.token_limit {
            return Err("Too many tokens".to_string());
        }
        let end = tokens
            .iter()
            .position(|t| t.kind == TokenKind::Eof)
            .unwrap_or(tokens.len());
        let body = Body::new(tokens.into(), 0, end);
        self.execute(&body)
    }
}

/// Last token index of a dotted chain starting at `start`, or `start`
fn dotted_chain_end(body: &Body, start: usize) -> usize {
    let mut last = start;
    while last + 2 < body.end()
        && body.token(last + 1).kind == TokenKind::Dot
        && body.token(last + 2).kind == TokenKind::Word
    {
        last += 2;
    }
    last
}

/// Index of the `end` closing a `do` whose interior starts at `from`
///
/// `if` opens a nesting level too, so conditionals inside blocks match
/// their own `end`.
fn matching_end(body: &Body, from: usize) -> Option<usize> {
    let mut depth = 1;
    for j in from..body.end() {
        match body.token(j).kind {
            TokenKind::Do | TokenKind::If => depth += 1,
            TokenKind::End => {
                depth -= 1;
                if depth == 0 {
                    return Some(j);
                }
            }
            _ => {}
        }
    }
    None
}
