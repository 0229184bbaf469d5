//! Source loading
//!
//! Turns a source unit into slots of the root dictionary in three passes.
//!
//! **Structure.** Every top-level `name:` opens a block that runs to its
//! matching `end`. A block whose first two tokens are `word :` is a
//! dictionary; anything else is a plain root slot.
//!
//! ```text
//! greeting: "hello" end          # root slot
//!
//! counter:                       # dictionary
//!     count: 0 signal            # one-line slot, no end
//!     ui:                        # multi-line slot, closed by end
//!         count "n" text
//!     end
//! end
//! ```
//!
//! A nested slot whose body continues past its own line is multi-line and
//! owns the next `end` at its depth; a one-line slot ends at the next
//! `name:` or at the dictionary's `end`.
//!
//! **Inheritance.** A dictionary whose `parent` slot starts with the name
//! of another dictionary inherits from it, unless that would close a cycle.
//!
//! **Data.** Uncached dictionary slots whose body is a single literal
//! become data; `<literal> signal` becomes a registered signal.

use crate::engine::literal;
use crate::runtime::Runtime;
use pith_core::{Body, Dict, DictRef, ErrorSlot, Slot, Token, TokenKind, Tokens, Value, tokenize};
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::{debug, warn};

impl Runtime {
    pub(crate) fn load_source(&mut self, source: &str, name: &str) -> Result<(), String> {
        let mut lex_errors = ErrorSlot::new();
        let tokens = tokenize(source, &mut lex_errors);
        if let Some(msg) = lex_errors.take() {
            return Err(msg);
        }
        if tokens.len() > self.config.token_limit {
            return Err("Too many tokens".to_string());
        }
        let tokens: Tokens = tokens.into();

        let defined = self.define_blocks(&tokens)?;
        self.token_count += tokens.len();

        let dicts: Vec<DictRef> = self
            .root
            .borrow()
            .slots()
            .iter()
            .filter_map(Slot::cached_dict)
            .collect();
        for dict in &dicts {
            self.link_parent(dict);
        }
        for dict in &dicts {
            self.cache_literals(dict);
        }

        self.current = Rc::clone(&self.root);
        debug!("Loaded {}: {} tokens, {} blocks", name, tokens.len(), defined);
        Ok(())
    }

    /// Pass 1: root slots and dictionaries; returns the number of blocks
    fn define_blocks(&mut self, tokens: &Tokens) -> Result<usize, String> {
        let mut defined = 0;
        let mut i = 0;
        while i < tokens.len() && tokens[i].kind != TokenKind::Eof {
            if !is_slot_header(tokens, i, tokens.len()) {
                i += 1;
                continue;
            }
            let name = tokens[i].text().to_string();
            let block_start = i + 2;
            let block_end = find_block_end(tokens, block_start, &name)?;

            let slot = if is_slot_header(tokens, block_start, block_end) {
                let mut dict = Dict::new(Some(&name));
                parse_dict_slots(tokens, block_start, block_end, &mut dict);
                Slot::data(name, Value::dict(dict))
            } else {
                Slot::code(name, Body::new(tokens.clone(), block_start, block_end))
            };
            self.root.borrow_mut().define(slot);
            defined += 1;
            i = block_end + 1;
        }
        Ok(defined)
    }

    /// Pass 2: resolve a dictionary's `parent` slot
    fn link_parent(&self, dict: &DictRef) {
        let parent_name = {
            let d = dict.borrow();
            match d.own_slot("parent") {
                Some(slot) if !slot.is_cached() && !slot.body.is_empty() => {
                    let first = &slot.body.slice()[0];
                    (first.kind == TokenKind::Word).then(|| first.text().to_string())
                }
                _ => None,
            }
        };
        let Some(parent_name) = parent_name else {
            return;
        };
        let Some(parent) = self.find_dict(&parent_name) else {
            return;
        };
        if Dict::would_cycle(dict, &parent) {
            warn!(
                "Ignoring parent '{}' of '{}': inheritance cycle",
                parent_name,
                dict.borrow().name().unwrap_or("?")
            );
            return;
        }
        dict.borrow_mut().set_parent(Some(&parent));
    }

    /// Pass 3: literal slots become data, `<literal> signal` a signal
    fn cache_literals(&mut self, dict: &DictRef) {
        let mut d = dict.borrow_mut();
        for slot in d.slots_mut().iter_mut().filter(|s| !s.is_cached()) {
            let cached = match slot.body.slice() {
                [only] => literal(only),
                [initial, word] if word.is_word("signal") => {
                    literal(initial).map(|v| Value::Signal(self.signals.create(v)))
                }
                _ => None,
            };
            if let Some(value) = cached {
                slot.cached = Some(value);
            }
        }
    }
}

/// `word :` at `i`, both before `end`
fn is_slot_header(tokens: &[Token], i: usize, end: usize) -> bool {
    i + 1 < end && tokens[i].kind == TokenKind::Word && tokens[i + 1].kind == TokenKind::Colon
}

/// Does the slot declared at `i` continue past its own line?
///
/// Looks at the tokens after the colon up to the next `end` or slot header.
fn is_multiline(tokens: &[Token], i: usize) -> bool {
    let line = tokens[i].line;
    for j in i + 2..tokens.len() {
        if tokens[j].kind == TokenKind::End || is_slot_header(tokens, j, tokens.len()) {
            break;
        }
        if tokens[j].line > line {
            return true;
        }
    }
    false
}

/// Index of the `end` closing a top-level block whose body starts at `start`
fn find_block_end(tokens: &[Token], start: usize, name: &str) -> Result<usize, String> {
    let mut depth = 1usize;
    // Depths at which a multi-line nested slot is waiting for its `end`
    let mut open_slots = BTreeSet::new();
    let mut j = start;
    while j < tokens.len() {
        match tokens[j].kind {
            TokenKind::Do | TokenKind::If => depth += 1,
            TokenKind::Word if is_slot_header(tokens, j, tokens.len()) => {
                if is_multiline(tokens, j) {
                    open_slots.insert(depth);
                }
                j += 1;
            }
            TokenKind::End => {
                if !open_slots.remove(&depth) {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(j);
                    }
                }
            }
            TokenKind::Eof => break,
            _ => {}
        }
        j += 1;
    }
    Err(format!("Unexpected end of file in block '{}'", name))
}

/// Split a dictionary block into its slots
fn parse_dict_slots(tokens: &Tokens, start: usize, end: usize, dict: &mut Dict) {
    let mut i = start;
    while i < end {
        if !is_slot_header(tokens, i, end) {
            i += 1;
            continue;
        }
        let name = tokens[i].text().to_string();
        i += 2;
        let body_start = i;
        let mut depth = 0usize;
        while i < end {
            match tokens[i].kind {
                TokenKind::Do | TokenKind::If => depth += 1,
                TokenKind::End if depth == 0 => break,
                TokenKind::End => depth -= 1,
                TokenKind::Word if depth == 0 && is_slot_header(tokens, i, end) => break,
                _ => {}
            }
            i += 1;
        }
        let body_end = i;
        if i < end && tokens[i].kind == TokenKind::End {
            i += 1;
        }
        dict.add_slot(name, Body::new(tokens.clone(), body_start, body_end));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(source: &str) -> Runtime {
        let mut rt = Runtime::new();
        assert!(rt.load_string(source, "test"), "{:?}", rt.error());
        rt
    }

    fn slot_names(dict: &DictRef) -> Vec<String> {
        dict.borrow().slots().iter().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_root_slot_and_dictionary() {
        let rt = load("greeting: \"hello\" end\ncounter:\n    count: 0 signal\nend");
        assert_eq!(slot_names(rt.root()), vec!["greeting", "counter"]);
        let greeting = rt.root().borrow().own_slot("greeting").cloned().unwrap();
        assert!(!greeting.is_cached());
        assert_eq!(greeting.body.len(), 1);
        assert!(rt.find_dict("counter").is_some());
        assert!(rt.find_dict("greeting").is_none());
    }

    #[test]
    fn test_multiline_slot_owns_its_end() {
        let rt = load(
            "app:\n    title: \"T\"\n    ui:\n        title text\n    end\n    footer: \"F\"\nend\nafter: 1 end",
        );
        let app = rt.find_dict("app").unwrap();
        assert_eq!(slot_names(&app), vec!["title", "ui", "footer"]);
        let ui = app.borrow().own_slot("ui").cloned().unwrap();
        assert_eq!(ui.body.len(), 2);
        assert!(rt.root().borrow().own_slot("after").is_some());
    }

    #[test]
    fn test_nested_control_flow_inside_slot() {
        let rt = load(
            "app:\n    go:\n        true if do 1 end end\n    end\n    x: 2\nend",
        );
        let app = rt.find_dict("app").unwrap();
        assert_eq!(slot_names(&app), vec!["go", "x"]);
        let go = app.borrow().own_slot("go").cloned().unwrap();
        assert_eq!(go.body.len(), 6);
    }

    #[test]
    fn test_literal_and_signal_caching() {
        let rt = load("app:\n    n: 42\n    s: \"x\" signal\n    code: 1 2 +\nend");
        let app = rt.find_dict("app").unwrap();
        let app = app.borrow();
        assert_eq!(app.own_slot("n").unwrap().cached, Some(Value::Number(42.0)));
        assert!(matches!(app.own_slot("s").unwrap().cached, Some(Value::Signal(_))));
        assert!(!app.own_slot("code").unwrap().is_cached());
        assert_eq!(rt.signal_count(), 1);
    }

    #[test]
    fn test_root_literal_slots_stay_code() {
        let rt = load("n: 42 end");
        assert!(!rt.root().borrow().own_slot("n").unwrap().is_cached());
    }

    #[test]
    fn test_parent_linking() {
        let rt = load("base:\n    color: \"red\"\nend\nchild:\n    parent: base\n    size: 1\nend");
        let child = rt.find_dict("child").unwrap();
        let base = rt.find_dict("base").unwrap();
        assert!(Rc::ptr_eq(&child.borrow().parent().unwrap(), &base));
        assert_eq!(
            Dict::lookup(&child, "color").unwrap().cached,
            Some(Value::from("red"))
        );
    }

    #[test]
    fn test_parent_cycle_refused() {
        let rt = load("a:\n    parent: b\nend\nb:\n    parent: a\nend");
        let a = rt.find_dict("a").unwrap();
        let b = rt.find_dict("b").unwrap();
        let linked = [a.borrow().parent().is_some(), b.borrow().parent().is_some()];
        assert_eq!(linked.iter().filter(|l| **l).count(), 1);
        assert!(Dict::lookup(&a, "nothing").is_none());
    }

    #[test]
    fn test_self_parent_refused() {
        let rt = load("a:\n    parent: a\nend");
        assert!(rt.find_dict("a").unwrap().borrow().parent().is_none());
    }

    #[test]
    fn test_unterminated_block() {
        let mut rt = Runtime::new();
        assert!(!rt.load_string("app:\n    x: 1\n", "t"));
        assert_eq!(rt.error(), Some("Unexpected end of file in block 'app'"));
    }

    #[test]
    fn test_lexer_error_fails_load() {
        let mut rt = Runtime::new();
        assert!(!rt.load_string("x: 1 @ end", "t"));
        assert!(rt.error().unwrap().contains("Unexpected character '@'"));
    }

    #[test]
    fn test_token_limit() {
        let mut rt = Runtime::with_config(crate::RuntimeConfig::new().with_token_limit(8));
        assert!(!rt.load_string("x: 1 2 3 4 5 6 7 8 end", "t"));
        assert_eq!(rt.error(), Some("Too many tokens"));
    }

    #[test]
    fn test_reload_redefines() {
        let mut rt = load("x: 1 end");
        assert!(rt.load_string("x: 2 end", "again"));
        assert_eq!(slot_names(rt.root()), vec!["x"]);
        assert!(rt.run_slot("x"));
        assert_eq!(rt.stack(), &[Value::Number(2.0)]);
    }

    #[test]
    fn test_stray_top_level_tokens_ignored() {
        let rt = load("1 2 foo x: 3 end");
        assert_eq!(slot_names(rt.root()), vec!["x"]);
        assert!(rt.stack().is_empty());
    }
}
