//! Host input events
//!
//! The host polls its window system and hands each event to
//! [`Runtime::handle_event`](crate::Runtime::handle_event). Only key,
//! click and file-change events have handler slots (`on-key`, `on-click`,
//! `on-file-change`); the rest are accepted and ignored.

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    None,
    Key {
        code: i32,
        ctrl: bool,
        alt: bool,
        shift: bool,
        /// macOS command key
        cmd: bool,
    },
    /// Cell coordinates of a pointer click
    Click { x: i32, y: i32, button: i32 },
    TextInput { text: String },
    FileChange { path: String },
    Tick,
}

impl Event {
    /// Key press without modifiers
    pub fn key(code: i32) -> Self {
        Event::Key {
            code,
            ctrl: false,
            alt: false,
            shift: false,
            cmd: false,
        }
    }

    pub fn click(x: i32, y: i32) -> Self {
        Event::Click { x, y, button: 0 }
    }

    /// Name of the slot that handles this event, if any
    pub fn handler(&self) -> Option<&'static str> {
        match self {
            Event::Key { .. } => Some("on-key"),
            Event::Click { .. } => Some("on-click"),
            Event::FileChange { .. } => Some("on-file-change"),
            Event::None | Event::TextInput { .. } | Event::Tick => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_names() {
        assert_eq!(Event::key(13).handler(), Some("on-key"));
        assert_eq!(Event::click(1, 2).handler(), Some("on-click"));
        assert_eq!(
            Event::FileChange {
                path: "a".to_string()
            }
            .handler(),
            Some("on-file-change")
        );
        assert_eq!(Event::Tick.handler(), None);
        assert_eq!(
            Event::TextInput {
                text: "x".to_string()
            }
            .handler(),
            None
        );
    }
}
