//! UI words and component styling
//!
//! These build the view tree while a `ui` slot runs. Views are
//! reference-semantic, so `apply_styles` mutates in place whatever view the
//! component left on the stack.

use crate::color::parse_color;
use crate::runtime::Runtime;
use pith_core::{Body, Dict, DictRef, GapBuffer, SignalRef, Value, View, ViewKind, ViewRef};

// =============================================================================
// Helpers
// =============================================================================

/// Pop an optional handler block and the operand below it
///
/// ( x -- ) or ( x block -- ). `missing` is the error when a block is on
/// top with nothing under it.
fn pop_with_handler(rt: &mut Runtime, missing: &str) -> Result<(Value, Option<Body>), String> {
    match rt.pop()? {
        Value::Block(body) => match rt.pop() {
            Ok(value) => Ok((value, Some(body))),
            Err(_) => Err(missing.to_string()),
        },
        value => Ok((value, None)),
    }
}

/// Initial buffer and optional source signal for an editable view
fn editable_source(value: Value) -> Option<(GapBuffer, Option<SignalRef>)> {
    match value {
        Value::String(s) => Some((GapBuffer::from_text(&s), None)),
        Value::GapBuffer(gb) => Some(((*gb).clone(), None)),
        Value::Signal(sig) => {
            let text = sig.borrow().value().to_string();
            Some((GapBuffer::from_text(&text), Some(sig)))
        }
        _ => None,
    }
}

fn stack_children(value: Value, word: &str) -> Result<Vec<ViewRef>, String> {
    let Value::Array(items) = value else {
        return Err(format!("{} requires array", word));
    };
    Ok(items
        .iter()
        .filter_map(|item| item.as_view().cloned())
        .collect())
}

fn push_view(rt: &mut Runtime, view: View) -> Result<(), String> {
    rt.push(Value::View(view.into_ref()))
}

// =============================================================================
// Views
// =============================================================================

/// Stack effect: ( str -- view )
pub fn text(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(s) => push_view(rt, View::text(&*s)),
        _ => Err("text requires string".to_string()),
    }
}

/// Stack effect: ( str|gapbuf|signal [block] -- view )
///
/// A signal becomes the field's source: the host writes the edited text back
/// into it on commit.
pub fn textfield(rt: &mut Runtime) -> Result<(), String> {
    let (value, on_change) = pop_with_handler(rt, "textfield requires string, gapbuf or signal")?;
    let Some((buffer, source)) = editable_source(value) else {
        return Err("textfield requires string, gapbuf or signal".to_string());
    };
    push_view(
        rt,
        View::new(ViewKind::TextField {
            buffer,
            on_change,
            source,
        }),
    )
}

/// Stack effect: ( str|gapbuf|signal [block] -- view )
pub fn textarea(rt: &mut Runtime) -> Result<(), String> {
    let (value, on_change) = pop_with_handler(rt, "textarea requires string, gapbuf or signal")?;
    let Some((buffer, source)) = editable_source(value) else {
        return Err("textarea requires string, gapbuf or signal".to_string());
    };
    push_view(
        rt,
        View::new(ViewKind::TextArea {
            buffer,
            on_change,
            source,
            scroll_offset: 0,
            visible_height: 0,
        }),
    )
}

/// Stack effect: ( label [block] -- view )
pub fn button(rt: &mut Runtime) -> Result<(), String> {
    let (label, on_click) = pop_with_handler(rt, "button requires label")?;
    match label {
        Value::String(s) => push_view(rt, View::button(&*s, on_click)),
        _ => Err("button requires string label".to_string()),
    }
}

/// Stack effect: ( arr -- view )
pub fn vstack(rt: &mut Runtime) -> Result<(), String> {
    let children = stack_children(rt.pop()?, "vstack")?;
    push_view(rt, View::new(ViewKind::VStack(children)))
}

/// Stack effect: ( arr -- view )
pub fn hstack(rt: &mut Runtime) -> Result<(), String> {
    let children = stack_children(rt.pop()?, "hstack")?;
    push_view(rt, View::new(ViewKind::HStack(children)))
}

pub fn spacer(rt: &mut Runtime) -> Result<(), String> {
    push_view(rt, View::spacer())
}

/// Stack effect: ( path -- view )
pub fn texture(rt: &mut Runtime) -> Result<(), String> {
    match rt.pop()? {
        Value::String(path) => push_view(
            rt,
            View::new(ViewKind::Texture {
                path: path.to_string(),
            }),
        ),
        _ => Err("texture requires string path".to_string()),
    }
}

// =============================================================================
// Signals
// =============================================================================

/// Stack effect: ( value -- signal )
pub fn signal(rt: &mut Runtime) -> Result<(), String> {
    let initial = rt.pop()?;
    let sig = rt.signals.create(initial);
    rt.push(Value::Signal(sig))
}

/// Stack effect: ( signal -- value )
///
/// Non-signals pass through unchanged.
pub fn deref(rt: &mut Runtime) -> Result<(), String> {
    let value = rt.pop()?;
    rt.push(value.unwrap_signal())
}

// =============================================================================
// Styling
// =============================================================================

/// Cached style value named `name`, following the parent chain
fn style_value(dict: &DictRef, name: &str) -> Option<Value> {
    Dict::lookup(dict, name).and_then(|slot| slot.cached)
}

/// Copy a component's style slots onto the view it produced
///
/// Only cached values of the expected type count: strings for `color`,
/// `background` and `border`, numbers for `padding` and `gap`, booleans for
/// `bold` and `fill`.
pub(crate) fn apply_styles(view: &ViewRef, dict: &DictRef) {
    let mut view = view.borrow_mut();
    let style = &mut view.style;

    if let Some(Value::String(color)) = style_value(dict, "color") {
        style.color = Some(parse_color(&color));
    }
    if let Some(Value::String(bg)) = style_value(dict, "background") {
        style.background = match &*bg {
            "none" | "transparent" => None,
            other => Some(parse_color(other)),
        };
    }
    if let Some(Value::Number(n)) = style_value(dict, "padding") {
        style.padding = Some(n as i32);
    }
    if let Some(Value::Number(n)) = style_value(dict, "gap") {
        style.gap = Some(n as i32);
    }
    if let Some(Value::String(border)) = style_value(dict, "border") {
        style.border = Some(border.to_string());
    }
    if let Some(Value::Bool(bold)) = style_value(dict, "bold") {
        style.bold = Some(bold);
    }
    if let Some(Value::Bool(fill)) = style_value(dict, "fill") {
        style.fill = fill;
    }
}
