//! Pith Runtime: the interpreter for the Pith language
//!
//! Key design principles:
//! - Runtime: one owner for the stack, root dictionary, signals and errors
//! - Loader: source text becomes root slots and dictionaries in three passes
//! - Engine: a token-walking evaluator over shared arenas, no AST
//! - Builtins: plain functions over the runtime, one module per family
//! - Hosts: drive the runtime through load, mount, events and refresh
//!
//! # Modules
//!
//! - `runtime`: the `Runtime` struct and its host-facing API
//! - `loader`: dictionary loading and literal caching
//! - `engine`: word dispatch, control flow, paths and component mounting
//! - `resolver`: the word resolver chain hosts can extend
//! - `builtins`: builtin registration and shared operand helpers
//! - `config`: limits, project layout and host builtins
//! - `filesystem`: file-system collaborator and its adapters
//! - `event`: host input events
//! - `debug`: text dumps of runtime state and view trees
//! - `color`: colour strings to RGBA

pub mod arithmetic;
mod builtins;
pub mod color;
pub mod compare;
pub mod config;
pub mod debug;
mod engine;
pub mod event;
pub mod file;
pub mod filesystem;
pub mod gap_ops;
pub mod io;
pub mod json;
pub mod list_ops;
mod loader;
pub mod map_ops;
pub mod path_ops;
pub mod resolver;
pub mod runtime;
pub mod stack_ops;
pub mod string_ops;
pub mod type_ops;
pub mod ui;

pub use color::parse_color;
pub use config::{BuiltinFn, DEFAULT_TOKEN_LIMIT, ExternalBuiltin, RuntimeConfig};
pub use debug::format_view;
pub use event::Event;
pub use filesystem::{FileSystem, MemoryFileSystem, StdFileSystem};
pub use json::{json_to_value, value_to_json};
pub use map_ops::sanitize_value;
pub use resolver::{ResolverChain, WordResolver};
pub use runtime::{DEFAULT_RUNTIME_SOURCE, Runtime};

pub use pith_core;
pub use pith_core::{Dict, DictRef, Value, View, ViewKind, ViewRef};
