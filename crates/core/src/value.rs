use crate::dict::{Dict, DictRef};
use crate::gap_buffer::GapBuffer;
use crate::signal::SignalRef;
use crate::token::Body;
use crate::view::ViewRef;
use std::fmt;
use std::rc::Rc;

/// Value: What the language talks about
///
/// # Copy semantics
///
/// `Clone` is the language's copy operation and the variants split in two:
///
/// - Value-semantic: Nil, Bool, Number, String, Array, GapBuffer, Block.
///   The heap-backed ones share storage through `Rc` and are only ever
///   changed via `Rc::make_mut`, so a copy is observably independent of its
///   source.
/// - Reference-semantic: View, Dict, Signal. A copy aliases the same cell;
///   the cell lives as long as its longest holder.
///
/// Persistent maps are unnamed dictionaries, so there is no separate map
/// variant.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,

    Bool(bool),

    /// All numbers are IEEE 754 doubles
    Number(f64),

    /// Immutable text
    String(Rc<str>),

    /// Ordered items, copy-on-write
    Array(Rc<Vec<Value>>),

    /// Deferred token range from `do ... end`
    ///
    /// Captures no environment: names resolve against whatever dictionary
    /// is current when the block runs.
    Block(Body),

    /// UI tree node produced by the UI builtins
    View(ViewRef),

    /// Dictionary, also used as the language's map type
    Dict(DictRef),

    /// Editable text, copy-on-write
    GapBuffer(Rc<GapBuffer>),

    /// Reactive cell shared by every holder
    Signal(SignalRef),
}

impl Value {
    pub fn string(text: impl Into<Rc<str>>) -> Value {
        Value::String(text.into())
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(items))
    }

    pub fn dict(dict: Dict) -> Value {
        Value::Dict(dict.into_ref())
    }

    pub fn gap_buffer(buffer: GapBuffer) -> Value {
        Value::GapBuffer(Rc::new(buffer))
    }

    /// Name reported by the `type` builtin
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Block(_) => "block",
            Value::View(_) => "view",
            Value::Dict(_) => "dict",
            Value::GapBuffer(_) => "gapbuf",
            Value::Signal(_) => "signal",
        }
    }

    /// Only `false`, `nil` and `0` are falsy
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&DictRef> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Body> {
        match self {
            Value::Block(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&ViewRef> {
        match self {
            Value::View(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Replace a signal by a copy of its current value
    pub fn unwrap_signal(self) -> Value {
        match self {
            Value::Signal(sig) => sig.borrow().get(),
            other => other,
        }
    }
}

impl PartialEq for Value {
    /// Language equality
    ///
    /// Structural for primitives, arrays (element-wise) and gap buffers
    /// (content); blocks compare their token range; dictionaries, views and
    /// signals compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::GapBuffer(a), Value::GapBuffer(b)) => a == b,
            (Value::Block(a), Value::Block(b)) => a.same_range(b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::View(a), Value::View(b)) => Rc::ptr_eq(a, b),
            (Value::Signal(a), Value::Signal(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{}", s),
            Value::Array(items) => write!(f, "[array:{}]", items.len()),
            Value::Block(_) => write!(f, "[block]"),
            Value::View(_) => write!(f, "[view]"),
            Value::Dict(d) => match d.borrow().name() {
                Some(name) => write!(f, "{}", name),
                None => write!(f, "[dict]"),
            },
            Value::GapBuffer(gb) => write!(f, "{}", gb),
            Value::Signal(sig) => write!(f, "{}", sig.borrow().value()),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

/// Format a number the way C's `%g` does
///
/// Six significant digits, trailing zeros removed, exponent notation when
/// the decimal exponent is below -4 or at least 6.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to six significant digits first; rounding may bump the exponent
    let sci = format!("{:.5e}", n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if !(-4..6).contains(&exp) {
        let mantissa = strip_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exp.abs())
    } else {
        let decimals = (5 - exp).max(0) as usize;
        strip_zeros(&format!("{:.*}", decimals, n)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::Signal;

    #[test]
    fn test_format_number_integers() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-42.0), "-42");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(100000.0), "100000");
    }

    #[test]
    fn test_format_number_fractions() {
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(3.14159265), "3.14159");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.0001), "0.0001");
    }

    #[test]
    fn test_format_number_exponent_form() {
        assert_eq!(format_number(1000000.0), "1e+06");
        assert_eq!(format_number(1234567.0), "1.23457e+06");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(999999.7), "1e+06");
    }

    #[test]
    fn test_format_number_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_number(f64::NAN), "nan");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Number(-1.0).is_truthy());
        assert!(Value::from("").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert!(Value::Bool(true).is_truthy());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("hi").to_string(), "hi");
        assert_eq!(Value::array(vec![Value::Nil, Value::Nil]).to_string(), "[array:2]");
        assert_eq!(Value::dict(Dict::new(None)).to_string(), "[dict]");
        assert_eq!(Value::dict(Dict::new(Some("app"))).to_string(), "app");
        assert_eq!(Value::gap_buffer(GapBuffer::from_text("abc")).to_string(), "abc");
    }

    #[test]
    fn test_signal_displays_inner_value() {
        let sig = Signal::new(Value::Number(7.0)).into_ref();
        assert_eq!(Value::Signal(sig).to_string(), "7");
    }

    #[test]
    fn test_array_copy_is_independent() {
        let original = Value::array(vec![Value::Number(1.0)]);
        let mut copy = original.clone();
        if let Value::Array(items) = &mut copy {
            Rc::make_mut(items).push(Value::Number(2.0));
        }
        assert_eq!(original.as_array().map(|a| a.len()), Some(1));
        assert_eq!(copy.as_array().map(|a| a.len()), Some(2));
    }

    #[test]
    fn test_dict_copy_aliases() {
        let original = Value::dict(Dict::new(None));
        let copy = original.clone();
        if let Value::Dict(d) = &copy {
            d.borrow_mut().set_value("k", Value::Number(1.0));
        }
        let d = original.as_dict().unwrap();
        assert!(d.borrow().own_slot("k").is_some());
        assert_eq!(original, copy);
    }

    #[test]
    fn test_equality() {
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::from("1"));
        assert_eq!(
            Value::array(vec![Value::from(1.0), Value::from("a")]),
            Value::array(vec![Value::from(1.0), Value::from("a")])
        );
        // Distinct dictionaries are never equal, even when empty
        assert_ne!(Value::dict(Dict::new(None)), Value::dict(Dict::new(None)));
    }

    #[test]
    fn test_unwrap_signal() {
        let sig = Signal::new(Value::from("x")).into_ref();
        assert_eq!(Value::Signal(sig).unwrap_signal(), Value::from("x"));
        assert_eq!(Value::Number(2.0).unwrap_signal(), Value::Number(2.0));
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Nil.type_name(), "nil");
        assert_eq!(Value::gap_buffer(GapBuffer::new()).type_name(), "gapbuf");
        assert_eq!(Value::dict(Dict::new(None)).type_name(), "dict");
    }
}
