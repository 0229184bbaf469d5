//! Runtime Error Slot
//!
//! Pith has exactly one error channel: a sticky slot owned by the runtime.
//! Any failing operation records a message here and returns failure; the
//! host decides what to do with it between lifecycle phases.
//!
//! # Usage
//!
//! ```
//! use pith_core::ErrorSlot;
//!
//! let mut errors = ErrorSlot::new();
//! errors.set("division by zero");
//! assert!(errors.has_error());
//! assert_eq!(errors.take().as_deref(), Some("division by zero"));
//! assert!(!errors.has_error());
//! ```

/// Maximum stored message size in bytes, including room for a terminator
/// in hosts that copy the message into a fixed buffer.
pub const ERROR_MAX: usize = 256;

/// The single mutable error slot of a runtime
#[derive(Debug, Default, Clone)]
pub struct ErrorSlot {
    message: Option<String>,
}

impl ErrorSlot {
    pub fn new() -> Self {
        ErrorSlot::default()
    }

    /// Record an error, replacing any previous one
    ///
    /// Messages longer than `ERROR_MAX - 1` bytes are cut at the nearest
    /// char boundary.
    pub fn set(&mut self, msg: impl Into<String>) {
        let mut msg = msg.into();
        if msg.len() >= ERROR_MAX {
            let mut cut = ERROR_MAX - 1;
            while !msg.is_char_boundary(cut) {
                cut -= 1;
            }
            msg.truncate(cut);
        }
        self.message = Some(msg);
    }

    /// Current message, if an error is pending
    pub fn get(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn has_error(&self) -> bool {
        self.message.is_some()
    }

    /// Take (and clear) the pending message
    pub fn take(&mut self) -> Option<String> {
        self.message.take()
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    /// Record the error of a failed result and hand back success as a bool
    pub fn record<T>(&mut self, result: Result<T, String>) -> bool {
        match result {
            Ok(_) => true,
            Err(msg) => {
                self.set(msg);
                false
            }
        }
    }
}
