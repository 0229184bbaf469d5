//! Output words
//!
//! `print` writes to the runtime's output sink, which is stdout unless the
//! host swapped it with [`Runtime::with_output`].

use crate::runtime::Runtime;

/// Print the display form of a value followed by a newline
///
/// Stack effect: ( a -- )
pub fn print(rt: &mut Runtime) -> Result<(), String> {
    let value = rt.pop()?;
    rt.print(&value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Capture(Rc<RefCell<Vec<u8>>>);

    impl Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn printed(source: &str) -> String {
        let capture = Capture::default();
        let mut rt = Runtime::new().with_output(capture.clone());
        assert!(rt.eval(source), "{:?}", rt.error());
        let bytes = capture.0.borrow().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_print_numbers_like_printf_g() {
        assert_eq!(printed("1 2 add print"), "3\n");
        assert_eq!(printed("0.1 0.2 + print"), "0.3\n");
        assert_eq!(printed("1000000 print"), "1e+06\n");
    }

    #[test]
    fn test_print_other_values() {
        assert_eq!(printed("\"hi\" print nil print true print"), "hi\nnil\ntrue\n");
        assert_eq!(printed("[1 2] print do end print"), "[array:2]\n[block]\n");
    }

    #[test]
    fn test_print_underflow() {
        let mut rt = Runtime::new().with_output(Capture::default());
        assert!(!rt.eval("print"));
        assert_eq!(rt.error(), Some("Stack underflow"));
    }
}
