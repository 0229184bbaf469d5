//! The Pith runtime
//!
//! One [`Runtime`] owns everything a program touches: the operand stack,
//! the root dictionary, the signal registry, the error slot and the
//! builtin table. Hosts drive it through a small lifecycle:
//!
//! 1. load source (`load_string`, `load_file` or `load_project`)
//! 2. `mount_ui` to build the first view tree
//! 3. per frame: `handle_event` for input, then `refresh` to rebuild the
//!    tree when a signal changed
//!
//! Public entry points return `bool` and leave a message in the error slot
//! on failure. Builtins and the engine use `Result<_, String>` internally;
//! the conversion happens once, at the boundary.

use crate::builtins;
use crate::config::{BuiltinFn, RuntimeConfig};
use crate::event::Event;
use crate::filesystem::{FileSystem, StdFileSystem};
use crate::resolver::{ResolverChain, WordResolver};
use pith_core::{Body, Dict, DictRef, ErrorSlot, SignalRegistry, Slot, Stack, Value, ViewRef};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Runtime file written into a project that has none
pub const DEFAULT_RUNTIME_SOURCE: &str = r#"# Default Pith runtime

app:
    ui:
        ["Welcome to Pith" text] vstack
    end
end

# Mount the UI
ui:
    app
end
"#;

pub struct Runtime {
    pub(crate) stack: Stack,
    pub(crate) root: DictRef,
    /// Dictionary that bare words resolve against
    pub(crate) current: DictRef,
    pub(crate) signals: SignalRegistry,
    pub(crate) errors: ErrorSlot,
    pub(crate) builtins: HashMap<String, BuiltinFn>,
    pub(crate) resolvers: Rc<ResolverChain>,
    pub(crate) current_view: Option<ViewRef>,
    pub(crate) fs: Box<dyn FileSystem>,
    pub(crate) project_root: Option<PathBuf>,
    pub(crate) output: Box<dyn Write>,
    pub(crate) config: RuntimeConfig,
    /// Tokens held by loaded source units
    pub(crate) token_count: usize,
    /// Nesting of word dispatch, for tracing only
    pub(crate) depth: usize,
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::new()
    }
}

impl Runtime {
    pub fn new() -> Self {
        Runtime::with_config(RuntimeConfig::default())
    }

    pub fn with_config(config: RuntimeConfig) -> Self {
        let root = Dict::new(Some("root")).into_ref();
        let mut rt = Runtime {
            stack: Stack::new(config.stack_limit),
            current: Rc::clone(&root),
            root,
            signals: SignalRegistry::new(),
            errors: ErrorSlot::new(),
            builtins: HashMap::new(),
            resolvers: Rc::new(ResolverChain::standard()),
            current_view: None,
            fs: Box::new(StdFileSystem),
            project_root: None,
            output: Box::new(io::stdout()),
            config,
            token_count: 0,
            depth: 0,
        };
        builtins::register_all(&mut rt);
        for external in rt.config.builtins.clone() {
            rt.builtins.insert(external.name, external.func);
        }
        rt
    }

    /// Replace the file-system collaborator (builder style)
    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    /// Redirect `print` output (builder style)
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    // Stack

    pub fn push(&mut self, value: Value) -> Result<(), String> {
        self.stack.push(value)
    }

    pub fn pop(&mut self) -> Result<Value, String> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<&Value> {
        self.stack.peek()
    }

    /// Operand stack, bottom to top
    pub fn stack(&self) -> &[Value] {
        self.stack.as_slice()
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn clear_stack(&mut self) {
        self.stack.clear();
    }

    // Dictionaries

    pub fn root(&self) -> &DictRef {
        &self.root
    }

    pub fn current_dict(&self) -> &DictRef {
        &self.current
    }

    /// Named dictionary stored in a root slot
    pub fn find_dict(&self, name: &str) -> Option<DictRef> {
        self.root
            .borrow()
            .own_slot(name)
            .and_then(|slot| slot.cached_dict())
    }

    /// Run `f` with `dict` as the current dictionary
    ///
    /// The previous dictionary is restored whether `f` succeeds or not.
    pub fn with_dict<T>(
        &mut self,
        dict: &DictRef,
        f: impl FnOnce(&mut Runtime) -> Result<T, String>,
    ) -> Result<T, String> {
        let saved = std::mem::replace(&mut self.current, Rc::clone(dict));
        let result = f(self);
        self.current = saved;
        result
    }

    // Errors

    pub fn has_error(&self) -> bool {
        self.errors.has_error()
    }

    pub fn error(&self) -> Option<&str> {
        self.errors.get()
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.errors.take()
    }

    pub fn clear_error(&mut self) {
        self.errors.clear();
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.errors.set(msg);
    }

    // Extension

    /// Add or replace a builtin word
    pub fn register_builtin(&mut self, name: impl Into<String>, func: BuiltinFn) {
        self.builtins.insert(name.into(), func);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Builtin names, sorted
    pub fn builtin_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builtins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Append a resolver, consulted after the standard ones
    pub fn push_resolver(&mut self, resolver: impl WordResolver + 'static) {
        Rc::make_mut(&mut self.resolvers).push(Rc::new(resolver));
    }

    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.names()
    }

    // Loading

    /// Load a source unit into the root dictionary
    ///
    /// `name` only labels log output.
    pub fn load_string(&mut self, source: &str, name: &str) -> bool {
        let result = self.load_source(source, name);
        self.errors.record(result)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let Some(source) = self.fs.read_file(path) else {
            self.errors
                .set(format!("Could not read file: {}", path.display()));
            return false;
        };
        let result = self.load_source(&source, &path.display().to_string());
        self.errors.record(result)
    }

    /// Load a project
    ///
    /// A path to an existing source file is loaded directly and its directory
    /// becomes the project root. Anything else is treated as a project
    /// directory whose runtime file is loaded, created from
    /// [`DEFAULT_RUNTIME_SOURCE`] first when missing.
    pub fn load_project(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        let is_source = path
            .extension()
            .is_some_and(|ext| ext == self.config.extension.as_str());

        if is_source && self.fs.file_exists(path) {
            let root = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            debug!("Loading source file {} (root {})", path.display(), root.display());
            self.project_root = Some(root);
            return self.load_file(path);
        }

        self.project_root = Some(path.to_path_buf());
        let runtime_path = path
            .join(&self.config.project_dir)
            .join(&self.config.runtime_file);
        if !self.fs.file_exists(&runtime_path) {
            debug!("Creating default runtime at {}", runtime_path.display());
            if !self.fs.write_file(&runtime_path, DEFAULT_RUNTIME_SOURCE) {
                self.errors.set(format!(
                    "Could not create runtime file: {}",
                    runtime_path.display()
                ));
                return false;
            }
        }
        self.load_file(&runtime_path)
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Resolve a path used by Pith code against the project root
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        match &self.project_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub(crate) fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    // Lifecycle

    /// Run a root slot by name
    ///
    /// False without touching the error slot when there is no such slot.
    pub fn run_slot(&mut self, name: &str) -> bool {
        let Some(slot) = Dict::lookup(&self.root, name) else {
            return false;
        };
        let result = self.execute_slot(&slot);
        self.errors.record(result)
    }

    /// Build the view tree from the root `ui` slot
    pub fn mount_ui(&mut self) -> bool {
        let Some(ui) = Dict::lookup(&self.root, "ui") else {
            return false;
        };
        let result = self.execute_slot(&ui);
        if !self.errors.record(result) {
            return false;
        }
        if !matches!(self.stack.peek(), Some(Value::View(_))) {
            return false;
        }
        match self.stack.pop() {
            Ok(Value::View(view)) => {
                self.current_view = Some(view);
                true
            }
            _ => false,
        }
    }

    /// Root of the last mounted view tree
    pub fn current_view(&self) -> Option<ViewRef> {
        self.current_view.clone()
    }

    /// Dispatch a host event to its handler slot
    ///
    /// Events without a handler, and event kinds with no handler convention,
    /// succeed without doing anything.
    pub fn handle_event(&mut self, event: Event) -> bool {
        let Some(handler) = event.handler() else {
            return true;
        };
        let payload = match event {
            Event::Key { code, .. } => Some(Value::Number(f64::from(code))),
            Event::FileChange { path } => Some(Value::from(path)),
            _ => None,
        };
        let Some(slot) = Dict::lookup(&self.current, handler) else {
            debug!("No {} handler", handler);
            return true;
        };
        let result = self.run_handler(&slot, payload);
        self.errors.record(result)
    }

    fn run_handler(&mut self, slot: &Slot, payload: Option<Value>) -> Result<(), String> {
        if let Some(value) = payload {
            self.push(value)?;
        }
        self.execute_slot(slot)
    }

    pub fn has_dirty_signals(&self) -> bool {
        self.signals.any_dirty()
    }

    pub fn clear_dirty(&mut self) {
        self.signals.clear_dirty();
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Rebuild the view tree if any signal changed since the last rebuild
    ///
    /// Returns true when a rebuild happened.
    pub fn refresh(&mut self) -> bool {
        if !self.signals.any_dirty() {
            return false;
        }
        let mounted = self.mount_ui();
        self.signals.clear_dirty();
        mounted
    }

    // Evaluation

    /// Tokenize and run a snippet against the current dictionary
    pub fn eval(&mut self, source: &str) -> bool {
        let result = self.eval_source(source);
        self.errors.record(result)
    }

    /// Run a block (or any body)
    pub fn execute_block(&mut self, body: &Body) -> bool {
        let result = self.execute(body);
        self.errors.record(result)
    }

    /// Run a block value from inside a builtin
    pub fn call_block(&mut self, block: &Value) -> Result<(), String> {
        match block {
            Value::Block(body) => self.execute(body),
            other => Err(format!("Expected block, got {}", other.type_name())),
        }
    }

    /// Write a line to the output sink
    pub fn print(&mut self, text: &str) -> Result<(), String> {
        writeln!(self.output, "{}", text)
            .and_then(|_| self.output.flush())
            .map_err(|e| format!("print failed: {}", e))
    }
}
