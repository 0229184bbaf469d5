//! End-to-end scenarios through the public runtime API

use pith_runtime::{Event, Runtime, Value, ViewKind};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Output sink that tests can read back
#[derive(Clone, Default)]
struct Captured(Rc<RefCell<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn load(source: &str) -> Runtime {
    let mut rt = Runtime::new();
    assert!(rt.load_string(source, "scenario"), "{:?}", rt.error());
    rt
}

fn numbers(value: &Value) -> Vec<f64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_number().unwrap())
        .collect()
}

#[test]
fn test_arithmetic_prints_result() {
    let out = Captured::default();
    let mut rt = Runtime::new().with_output(out.clone());
    assert!(rt.eval("1 2 add print"));
    assert_eq!(out.text(), "3\n");
}

#[test]
fn test_inherited_slot_resolves_through_parent() {
    let mut rt = load(
        r#"
a:
    greet: "hi"
end

b:
    parent: a
    other: 1
end
"#,
    );
    let b = rt.find_dict("b").unwrap();
    let evaluated = rt.with_dict(&b, |rt| Ok(rt.eval("greet")));
    assert_eq!(evaluated, Ok(true));
    assert_eq!(rt.pop().unwrap(), Value::from("hi"));
}

#[test]
fn test_inherited_slot_via_dotted_path() {
    let mut rt = load(
        r#"
a:
    greet: "hi"
end

b:
    parent: a
end
"#,
    );
    assert!(rt.eval("b.greet"), "{:?}", rt.error());
    assert_eq!(rt.pop().unwrap(), Value::from("hi"));
}

#[test]
fn test_dotted_signal_write_and_read() {
    let mut rt = load(
        r#"
app:
    count: 0 signal
end
"#,
    );
    assert!(!rt.has_dirty_signals());
    assert!(rt.eval("5 app.count!"), "{:?}", rt.error());
    assert!(rt.has_dirty_signals());

    assert!(rt.eval("app.count"));
    assert_eq!(rt.pop().unwrap(), Value::Number(5.0));
    assert!(rt.has_dirty_signals());

    rt.clear_dirty();
    assert!(!rt.has_dirty_signals());
}

#[test]
fn test_array_collects_what_lands_on_stack() {
    let mut rt = Runtime::new();
    assert!(rt.eval("[1 2 3] [1 2 add]"));
    let sum = rt.pop().unwrap();
    let three = rt.pop().unwrap();
    assert_eq!(numbers(&three), vec![1.0, 2.0, 3.0]);
    assert_eq!(numbers(&sum), vec![3.0]);
}

#[test]
fn test_filter_and_map() {
    let mut rt = Runtime::new();
    assert!(rt.eval("[1 2 3 4] do 2 > end filter [1 2 3 4] do 2 * end map"));
    let mapped = rt.pop().unwrap();
    let filtered = rt.pop().unwrap();
    assert_eq!(numbers(&filtered), vec![3.0, 4.0]);
    assert_eq!(numbers(&mapped), vec![2.0, 4.0, 6.0, 8.0]);
}

#[test]
fn test_counter_app_lifecycle() {
    let out = Captured::default();
    let mut rt = Runtime::new().with_output(out.clone());
    let source = r#"
counter:
    count: 0 signal
    ui:
        [count to-string text "+" do count 1 + count! end button] vstack
    end
end

init:
    "starting" print
end

on-key:
    drop 10 counter.count!
end

ui:
    counter
end
"#;
    assert!(rt.load_string(source, "counter"), "{:?}", rt.error());
    assert!(rt.run_slot("init"));
    assert_eq!(out.text(), "starting\n");
    assert!(!rt.run_slot("main"));
    assert!(!rt.has_error());

    assert!(rt.mount_ui(), "{:?}", rt.error());
    let view = rt.current_view().unwrap();
    let first = view.borrow().children()[0].clone();
    assert!(matches!(&first.borrow().kind, ViewKind::Text { content } if content == "0"));

    // Clicking the button runs its block against the component
    let on_click = match &view.borrow().children()[1].borrow().kind {
        ViewKind::Button { on_click, .. } => on_click.clone().unwrap(),
        other => panic!("expected button, got {:?}", other),
    };
    let counter = rt.find_dict("counter").unwrap();
    assert!(rt.with_dict(&counter, |rt| rt.call_block(&Value::Block(on_click))).is_ok());
    assert!(rt.refresh());
    let view = rt.current_view().unwrap();
    let first = view.borrow().children()[0].clone();
    assert!(matches!(&first.borrow().kind, ViewKind::Text { content } if content == "1"));
    assert!(!rt.refresh());

    assert!(rt.handle_event(Event::key(65)));
    assert!(rt.refresh());
    let view = rt.current_view().unwrap();
    let first = view.borrow().children()[0].clone();
    assert!(matches!(&first.borrow().kind, ViewKind::Text { content } if content == "10"));
}

#[test]
fn test_block_resolves_against_invoking_dictionary() {
    let mut rt = load(
        r#"
maker:
    label: "maker"
    action: do label end
end

user:
    label: "user"
end
"#,
    );
    assert!(rt.eval("maker.action"));
    let block = rt.pop().unwrap();
    assert!(matches!(block, Value::Block(_)));

    let user = rt.find_dict("user").unwrap();
    assert!(rt.with_dict(&user, |rt| rt.call_block(&block)).is_ok());
    assert_eq!(rt.pop().unwrap(), Value::from("user"));

    let maker = rt.find_dict("maker").unwrap();
    assert!(rt.with_dict(&maker, |rt| rt.call_block(&block)).is_ok());
    assert_eq!(rt.pop().unwrap(), Value::from("maker"));
}

#[test]
fn test_component_styles_applied_on_mount() {
    let mut rt = load(
        r##"
theme:
    color: "#00ff00"
    padding: 4
end

panel:
    parent: theme
    background: "blue 2"
    ui:
        "hello" text
    end
end

ui:
    panel
end
"##,
    );
    assert!(rt.mount_ui(), "{:?}", rt.error());
    let view = rt.current_view().unwrap();
    let style = view.borrow().style.clone();
    assert_eq!(style.color, Some(0x00FF00FF));
    assert_eq!(style.background, Some(0xa5d8ffFF));
    assert_eq!(style.padding, Some(4));
}

#[test]
fn test_error_slot_is_sticky_until_cleared() {
    let mut rt = Runtime::new();
    assert!(!rt.eval("nosuchword"));
    assert_eq!(rt.error(), Some("Unknown word: nosuchword"));
    assert!(rt.eval("1"));
    assert!(rt.has_error());
    rt.clear_error();
    assert!(!rt.has_error());
}
