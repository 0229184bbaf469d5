//! Gap buffer for editable text values
//!
//! Content is the part of the storage before the gap followed by the part
//! after it. The cursor is always `gap_start`. Every cursor motion is
//! expressed through [`GapBuffer::move_gap`].
//!
//! Positions and lengths count characters, so multi-byte text never splits.
//!
//! Invariant after every operation: `gap_start <= gap_end <= capacity`.

use std::fmt;

/// Capacity of a fresh, empty buffer
pub const INITIAL_CAPACITY: usize = 64;

/// Slack added whenever the gap has to grow
pub const MIN_GAP: usize = 32;

const FILL: char = '\0';

#[derive(Debug, Clone)]
pub struct GapBuffer {
    storage: Vec<char>,
    gap_start: usize,
    gap_end: usize,
}

impl Default for GapBuffer {
    fn default() -> Self {
        GapBuffer::new()
    }
}

impl GapBuffer {
    pub fn new() -> Self {
        GapBuffer {
            storage: vec![FILL; INITIAL_CAPACITY],
            gap_start: 0,
            gap_end: INITIAL_CAPACITY,
        }
    }

    /// Buffer holding `text` with the cursor at the start
    pub fn from_text(text: &str) -> Self {
        let mut storage = vec![FILL; MIN_GAP];
        storage.extend(text.chars());
        GapBuffer {
            storage,
            gap_start: 0,
            gap_end: MIN_GAP,
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn gap_size(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Content length in characters
    pub fn len(&self) -> usize {
        self.capacity() - self.gap_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> usize {
        self.gap_start
    }

    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    /// Make sure the gap holds at least `min_size` characters
    fn expand_gap(&mut self, min_size: usize) {
        let gap = self.gap_size();
        if gap >= min_size {
            return;
        }
        let new_capacity = self.capacity() + (min_size - gap) + MIN_GAP;
        let suffix_len = self.capacity() - self.gap_end;

        let mut storage = Vec::with_capacity(new_capacity);
        storage.extend_from_slice(&self.storage[..self.gap_start]);
        storage.resize(new_capacity - suffix_len, FILL);
        storage.extend_from_slice(&self.storage[self.gap_end..]);

        self.storage = storage;
        self.gap_end = new_capacity - suffix_len;
    }

    /// Relocate the gap so that it starts at content offset `pos`
    ///
    /// `pos` is clamped to the content length.
    pub fn move_gap(&mut self, pos: usize) {
        let pos = pos.min(self.len());
        if pos < self.gap_start {
            let n = self.gap_start - pos;
            self.storage.copy_within(pos..self.gap_start, self.gap_end - n);
            self.gap_start -= n;
            self.gap_end -= n;
        } else if pos > self.gap_start {
            let n = pos - self.gap_start;
            self.storage.copy_within(self.gap_end..self.gap_end + n, self.gap_start);
            self.gap_start += n;
            self.gap_end += n;
        }
    }

    /// Insert text at the cursor; the cursor ends up after it
    pub fn insert(&mut self, text: &str) {
        let chars: Vec<char> = text.chars().collect();
        self.expand_gap(chars.len());
        self.storage[self.gap_start..self.gap_start + chars.len()].copy_from_slice(&chars);
        self.gap_start += chars.len();
    }

    /// Delete `n` characters after the cursor (`n > 0`) or before it (`n < 0`)
    ///
    /// Deletion is clamped to what is available on that side.
    pub fn delete(&mut self, n: i64) {
        if n > 0 {
            let available = self.capacity() - self.gap_end;
            self.gap_end += (n as usize).min(available);
        } else if n < 0 {
            let available = self.gap_start;
            self.gap_start -= (n.unsigned_abs() as usize).min(available);
        }
    }

    /// Move the cursor by `delta`, clamped to the content
    pub fn move_cursor(&mut self, delta: i64) {
        let target = (self.gap_start as i64).saturating_add(delta).clamp(0, self.len() as i64);
        self.move_gap(target as usize);
    }

    /// Put the cursor at content offset `pos` (clamped)
    pub fn goto(&mut self, pos: usize) {
        self.move_gap(pos);
    }

    /// Character at content offset `pos`
    pub fn char_at(&self, pos: usize) -> Option<char> {
        if pos >= self.len() {
            None
        } else if pos < self.gap_start {
            Some(self.storage[pos])
        } else {
            Some(self.storage[pos + self.gap_size()])
        }
    }

    pub fn text(&self) -> String {
        self.storage[..self.gap_start]
            .iter()
            .chain(&self.storage[self.gap_end..])
            .collect()
    }
}

impl PartialEq for GapBuffer {
    /// Buffers are equal when their content is, wherever the gap sits
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.storage[..self.gap_start]
                .iter()
                .chain(&self.storage[self.gap_end..])
                .eq(other.storage[..other.gap_start].iter().chain(&other.storage[other.gap_end..]))
    }
}

impl fmt::Display for GapBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
