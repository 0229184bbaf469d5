//! Pith Core: primitives of the Pith language
//!
//! Everything the interpreter talks about, without the interpreter itself:
//!
//! - Value: the tagged union of runtime values and its copy semantics
//! - Token / Body: a shared token arena and index-range views into it
//! - Dict / Slot: inheritable dictionaries, also used as the map type
//! - Signal: reactive cells and the registry that sweeps them
//! - GapBuffer: editable text
//! - View: the UI tree handed to host renderers
//! - Stack: the bounded operand stack
//!
//! # Modules
//!
//! - `error`: the runtime's single error slot
//! - `token`: token kinds, tokens, the arena and `Body`
//! - `lexer`: source text to tokens
//! - `value`: core `Value` enum and number formatting
//! - `dict`: dictionaries, slots, lookup and data equality
//! - `signal`: signals and the signal registry
//! - `gap_buffer`: gap buffer text storage
//! - `view`: views and styles
//! - `stack`: operand stack and shuffle words

pub mod dict;
pub mod error;
pub mod gap_buffer;
pub mod lexer;
pub mod signal;
pub mod stack;
pub mod token;
pub mod value;
pub mod view;

pub use dict::{Dict, DictRef, Slot, data_eq};
pub use error::{ERROR_MAX, ErrorSlot};
pub use gap_buffer::GapBuffer;
pub use lexer::tokenize;
pub use signal::{Signal, SignalRef, SignalRegistry};
pub use stack::{DEFAULT_STACK_LIMIT, Stack};
pub use token::{Body, Token, TokenKind, Tokens};
pub use value::{Value, format_number};
pub use view::{Style, View, ViewKind, ViewRef};
