//! Language-level guarantees checked across many inputs

use pith_runtime::pith_core::data_eq;
use pith_runtime::{Runtime, Value, json_to_value, sanitize_value, value_to_json};

fn eval_one(source: &str) -> Value {
    let mut rt = Runtime::new();
    assert!(rt.eval(source), "{}: {:?}", source, rt.error());
    assert_eq!(rt.stack_depth(), 1, "{}", source);
    rt.pop().unwrap()
}

#[test]
fn test_if_truthiness() {
    let cases = [
        ("false", false),
        ("nil", false),
        ("0", false),
        ("true", true),
        ("1", true),
        ("-0.5", true),
        ("\"\"", true),
        ("\"0\"", true),
        ("[]", true),
        ("new-map", true),
        ("do end", true),
    ];
    for (condition, expected) in cases {
        let source = format!("{} if \"yes\" else \"no\" end", condition);
        let expected = Value::from(if expected { "yes" } else { "no" });
        assert_eq!(eval_one(&source), expected, "condition {}", condition);
    }
}

#[test]
fn test_unknown_lookup_is_an_error_not_a_value() {
    for word in ["missing", "also-missing", "x.y"] {
        let mut rt = Runtime::new();
        assert!(!rt.eval(word), "{}", word);
        assert_eq!(rt.stack_depth(), 0);
    }
}

#[test]
fn test_persistent_updates_leave_input_unchanged() {
    let words = [
        "42 swap \"a\" set",
        "99 swap \"z\" set",
        "\"a\" remove",
        "\"missing\" remove",
        "7 new-map \"b\" set merge",
    ];
    for word in words {
        let mut rt = Runtime::new();
        assert!(rt.eval("1 new-map \"a\" set 2 swap \"b\" set"));
        let original = rt.peek().cloned().unwrap();
        let snapshot = sanitize_value(&original);

        assert!(rt.eval(&format!("dup {}", word)), "{}: {:?}", word, rt.error());
        let updated = rt.pop().unwrap();
        assert!(!matches!((&updated, &original), (Value::Dict(a), Value::Dict(b)) if std::rc::Rc::ptr_eq(a, b)));
        assert!(data_eq(&original, &snapshot), "{} mutated its input", word);
    }
}

#[test]
fn test_json_round_trip_preserves_data() {
    let sources = [
        "new-map",
        "1 new-map \"n\" set",
        "\"text\" new-map \"s\" set true swap \"flag\" set nil swap \"none\" set",
        "[1 2.5 \"three\" [true]] new-map \"list\" set",
        "0.125 new-map \"inner\" set new-map \"outer\" set",
        "-3 new-map \"neg\" set 9007199254740992 swap \"big\" set",
    ];
    for source in sources {
        let value = eval_one(source);
        let back = json_to_value(&value_to_json(&value));
        assert!(data_eq(&value, &back), "{}", source);

        let mut rt = Runtime::new();
        rt.push(value.clone()).unwrap();
        assert!(rt.eval("to-json parse-json"), "{}: {:?}", source, rt.error());
        assert!(data_eq(&value, &rt.pop().unwrap()), "{}", source);
    }
}

#[test]
fn test_sanitize_is_idempotent() {
    let mut rt = Runtime::new();
    let source = r#"
model:
    title: "notes"
    count: 4 signal
    render: title text
end
"#;
    assert!(rt.load_string(source, "model"), "{:?}", rt.error());
    assert!(rt.eval("[1 do 2 end \"x\"] model \"items\" set"), "{:?}", rt.error());
    let model = rt.pop().unwrap();

    let once = sanitize_value(&model);
    let twice = sanitize_value(&once);
    assert!(data_eq(&once, &twice));
    let json = value_to_json(&once);
    assert_eq!(json, value_to_json(&twice));
    assert_eq!(json["count"], serde_json::json!(4));
    assert_eq!(json["items"], serde_json::json!([1, null, "x"]));
    assert!(json.get("render").is_none());
}

#[test]
fn test_gap_buffer_text_survives_cursor_moves() {
    for target in [0, 1, 3, 5, 100] {
        let source = format!("\"hello\" string-to-gap {} swap gap-goto gap-to-string", target);
        assert_eq!(eval_one(&source), Value::from("hello"), "goto {}", target);
    }
    for (position, inserted) in [(0, "<"), (2, "--"), (5, ">")] {
        let source = format!(
            "\"hello\" string-to-gap {} swap gap-goto \"{}\" swap gap-insert {} swap gap-delete gap-to-string",
            position,
            inserted,
            -(inserted.len() as i64)
        );
        assert_eq!(eval_one(&source), Value::from("hello"), "insert at {}", position);
    }
}

#[test]
fn test_stack_limit_is_enforced() {
    let config = pith_runtime::RuntimeConfig::new().with_stack_limit(4);
    let mut rt = Runtime::with_config(config);
    assert!(rt.eval("1 2 3 4"));
    assert!(!rt.eval("5"));
    assert_eq!(rt.error(), Some("Stack overflow"));
    assert_eq!(rt.stack_depth(), 4);
}
