//! Builtin word table
//!
//! Every library word is a plain `fn(&mut Runtime) -> Result<(), String>`
//! grouped by family in its own module. This module registers them and
//! holds the operand helpers they share.
//!
//! Builtins pop all of their operands before checking types, so a failed
//! call never leaves half of its arguments behind.

use crate::runtime::Runtime;
use crate::{
    arithmetic, compare, file, gap_ops, io, json, list_ops, map_ops, path_ops, stack_ops,
    string_ops, type_ops, ui,
};
use pith_core::{Body, Value};

/// Register a list of `"word" => function` pairs
macro_rules! words {
    ($rt:ident, $($name:literal => $func:path),+ $(,)?) => {
        $(
            $rt.register_builtin($name, $func);
        )+
    };
}

pub(crate) fn register_all(rt: &mut Runtime) {
    // =========================================================================
    // Stack
    // =========================================================================

    words!(rt,
        "dup" => stack_ops::dup,
        "drop" => stack_ops::drop,
        "swap" => stack_ops::swap,
        "over" => stack_ops::over,
        "rot" => stack_ops::rot,
    );

    // =========================================================================
    // Arithmetic, comparison, logic
    // =========================================================================

    words!(rt,
        "add" => arithmetic::add,
        "+" => arithmetic::add,
        "subtract" => arithmetic::subtract,
        "-" => arithmetic::subtract,
        "multiply" => arithmetic::multiply,
        "*" => arithmetic::multiply,
        "divide" => arithmetic::divide,
        "/" => arithmetic::divide,
        "mod" => arithmetic::modulo,
        "abs" => arithmetic::abs,
        "min" => arithmetic::min,
        "max" => arithmetic::max,
    );

    words!(rt,
        "=" => compare::equal,
        "!=" => compare::not_equal,
        "<" => compare::less,
        ">" => compare::greater,
        "<=" => compare::less_equal,
        ">=" => compare::greater_equal,
        "and" => compare::and,
        "or" => compare::or,
        "not" => compare::not,
    );

    // =========================================================================
    // Strings and output
    // =========================================================================

    words!(rt,
        "length" => string_ops::length,
        "concat" => string_ops::concat,
        "split" => string_ops::split,
        "join" => string_ops::join,
        "trim" => string_ops::trim,
        "substring" => string_ops::substring,
        "contains" => string_ops::contains,
        "replace" => string_ops::replace,
        "uppercase" => string_ops::uppercase,
        "lowercase" => string_ops::lowercase,
        "lines" => string_ops::lines,
        "words" => string_ops::words,
        "print" => io::print,
    );

    // =========================================================================
    // UI and signals
    // =========================================================================

    words!(rt,
        "text" => ui::text,
        "textfield" => ui::textfield,
        "textarea" => ui::textarea,
        "button" => ui::button,
        "vstack" => ui::vstack,
        "hstack" => ui::hstack,
        "spacer" => ui::spacer,
        "texture" => ui::texture,
        "signal" => ui::signal,
        "deref" => ui::deref,
    );

    // =========================================================================
    // Arrays and higher-order words
    // =========================================================================

    words!(rt,
        "first" => list_ops::first,
        "last" => list_ops::last,
        "nth" => list_ops::nth,
        "append" => list_ops::append,
        "prepend" => list_ops::prepend,
        "slice" => list_ops::slice,
        "reverse" => list_ops::reverse,
        "sort" => list_ops::sort,
        "index-of" => list_ops::index_of,
        "empty?" => list_ops::is_empty,
        "map" => list_ops::map,
        "filter" => list_ops::filter,
        "each" => list_ops::each,
        "reduce" => list_ops::reduce,
        "find" => list_ops::find,
        "any" => list_ops::any,
        "all" => list_ops::all,
    );

    // =========================================================================
    // Types
    // =========================================================================

    words!(rt,
        "type" => type_ops::type_of,
        "string?" => type_ops::is_string,
        "number?" => type_ops::is_number,
        "array?" => type_ops::is_array,
        "map?" => type_ops::is_map,
        "bool?" => type_ops::is_bool,
        "nil?" => type_ops::is_nil,
        "block?" => type_ops::is_block,
        "view?" => type_ops::is_view,
        "signal?" => type_ops::is_signal,
        "to-string" => type_ops::to_string,
        "to-number" => type_ops::to_number,
    );

    // =========================================================================
    // Maps and JSON
    // =========================================================================

    words!(rt,
        "new-map" => map_ops::new_map,
        "get" => map_ops::get,
        "set" => map_ops::set,
        "keys" => map_ops::keys,
        "values" => map_ops::values,
        "has" => map_ops::has,
        "remove" => map_ops::remove,
        "merge" => map_ops::merge,
        "sanitize" => map_ops::sanitize,
        "to-json" => json::to_json,
        "parse-json" => json::parse_json,
    );

    // =========================================================================
    // Gap buffers
    // =========================================================================

    words!(rt,
        "new-gap" => gap_ops::new_gap,
        "string-to-gap" => gap_ops::string_to_gap,
        "gap-to-string" => gap_ops::gap_to_string,
        "gap-insert" => gap_ops::insert,
        "gap-delete" => gap_ops::delete,
        "gap-move" => gap_ops::move_cursor,
        "gap-goto" => gap_ops::goto,
        "gap-cursor" => gap_ops::cursor,
        "gap-length" => gap_ops::length,
        "gap-char" => gap_ops::char_at,
    );

    // =========================================================================
    // Files and paths
    // =========================================================================

    words!(rt,
        "file-read" => file::read,
        "file-write" => file::write,
        "file-append" => file::append,
        "file-exists" => file::exists,
        "dir-list" => file::dir_list,
        "set-path" => path_ops::set_path,
        "get-path" => path_ops::get_path,
    );
}

/// Pop `N` operands, bottom-to-top
///
/// Fails with `Stack underflow` without popping anything when fewer than
/// `N` values are present.
pub(crate) fn pop_args<const N: usize>(rt: &mut Runtime) -> Result<[Value; N], String> {
    let values = rt.stack.pop_n(N)?;
    values
        .try_into()
        .map_err(|_| "Stack underflow".to_string())
}

pub(crate) fn push_bool(rt: &mut Runtime, b: bool) -> Result<(), String> {
    rt.push(Value::Bool(b))
}

pub(crate) fn push_number(rt: &mut Runtime, n: f64) -> Result<(), String> {
    rt.push(Value::Number(n))
}

/// Run `block` with `args` pushed and return what it leaves on top
///
/// Anything the block pushes beyond its result is discarded, so the stack
/// is back at its starting height afterwards. `None` when the block left
/// nothing above the starting height.
pub(crate) fn call_with(
    rt: &mut Runtime,
    block: &Body,
    args: &[Value],
) -> Result<Option<Value>, String> {
    let base = rt.stack.depth();
    for arg in args {
        rt.push(arg.clone())?;
    }
    rt.execute(block)?;
    let mut left = rt.stack.truncate(base);
    Ok(left.pop())
}

/// Clamp a numeric index into `0..=len`
pub(crate) fn clamp_index(n: f64, len: usize) -> usize {
    if n.is_nan() || n <= 0.0 {
        0
    } else {
        (n as usize).min(len)
    }
}
