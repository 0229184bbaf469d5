//! Text dumps of runtime state for hosts and the CLI
//!
//! Both dumps are plain multi-line strings; the caller decides where they
//! go (the `pith` binary writes them to stderr).

use crate::runtime::Runtime;
use pith_core::{Body, Dict, View, ViewKind, ViewRef};
use std::fmt::Write;

/// Body tokens shown per slot
const PREVIEW_TOKENS: usize = 5;

fn preview(body: &Body) -> String {
    let mut out = String::new();
    for token in body.slice().iter().take(PREVIEW_TOKENS) {
        let _ = write!(out, "{} ", token);
    }
    if body.len() > PREVIEW_TOKENS {
        out.push_str("...");
    }
    out
}

fn write_view(out: &mut String, view: &View, indent: usize) {
    let pad = "  ".repeat(indent);
    let _ = write!(out, "{}{}", pad, view.kind_name());
    match &view.kind {
        ViewKind::Text { content } => {
            let _ = write!(out, ": \"{}\"", content);
        }
        ViewKind::Button { label, .. } => {
            let _ = write!(out, ": \"{}\"", label);
        }
        ViewKind::TextField { buffer, .. } | ViewKind::TextArea { buffer, .. } => {
            let _ = write!(out, ": \"{}\"", buffer.text());
        }
        ViewKind::Texture { path } => {
            let _ = write!(out, ": {}", path);
        }
        ViewKind::VStack(children) | ViewKind::HStack(children) => {
            let _ = write!(out, " ({} children)", children.len());
        }
        ViewKind::Spacer => {}
    }
    out.push('\n');
    for child in view.children() {
        write_view(out, &child.borrow(), indent + 1);
    }
}

/// Indented outline of a view tree
pub fn format_view(view: &ViewRef) -> String {
    let mut out = String::new();
    write_view(&mut out, &view.borrow(), 0);
    out
}

impl Runtime {
    /// Root slots with body previews, dictionary parents and the `ui` slot
    pub fn debug_state(&self) -> String {
        let mut out = String::new();
        let root = self.root.borrow();
        let current = self.current.borrow();

        let _ = writeln!(out, "=== PITH DEBUG STATE ===");
        let _ = writeln!(out);
        let _ = writeln!(out, "Token count: {}", self.token_count);
        let _ = writeln!(out, "Root slot count: {}", root.len());
        let _ = writeln!(out, "Current dict: {}", current.name().unwrap_or("(unnamed)"));
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Root Slots ---");

        for (i, slot) in root.slots().iter().enumerate() {
            match slot.cached_dict() {
                Some(dict) => {
                    let dict = dict.borrow();
                    let _ = write!(out, "[{}] {} (dictionary)", i, dict.name().unwrap_or("(unnamed)"));
                    if let Some(parent) = dict.parent() {
                        let _ = write!(out, " : {}", parent.borrow().name().unwrap_or("(unnamed)"));
                    }
                    out.push('\n');
                    for inner in dict.slots() {
                        let _ = writeln!(
                            out,
                            "    {}: [tokens {}-{}] = {}",
                            inner.name,
                            inner.body.start(),
                            inner.body.end(),
                            preview(&inner.body)
                        );
                    }
                }
                None => {
                    let _ = writeln!(
                        out,
                        "[{}] {}: [tokens {}-{}] = {}",
                        i,
                        slot.name,
                        slot.body.start(),
                        slot.body.end(),
                        preview(&slot.body)
                    );
                }
            }
        }

        let _ = writeln!(out);
        let _ = writeln!(out, "--- Current Dict Slots ---");
        match Dict::lookup(&self.current, "ui") {
            Some(ui) => {
                let _ = writeln!(out, "Found 'ui' slot: tokens {}-{}", ui.body.start(), ui.body.end());
                for (offset, token) in ui.body.slice().iter().enumerate() {
                    let _ = write!(out, "  [{}] {}", ui.body.start() + offset, token.kind.name());
                    if let Some(text) = &token.text {
                        let _ = write!(out, " \"{}\"", text);
                    }
                    out.push('\n');
                }
            }
            None => {
                let _ = writeln!(out, "No 'ui' slot found in current dict!");
            }
        }
        let _ = writeln!(out, "========================");
        out
    }

    /// Outline of the mounted view tree
    pub fn debug_view(&self) -> String {
        match &self.current_view {
            Some(view) => format_view(view),
            None => "(null view)\n".to_string(),
        }
    }
}
