//! The rolling buffer of recently typed characters and trigger detection.

use std::collections::VecDeque;

/// Characters kept before the oldest are evicted.
pub const BUFFER_CAPACITY: usize = 300;

/// Typed at the end of a line to rephrase that line.
pub const TRIGGER_MARKER: &str = "::fix";

/// A completed trigger: the line typed before the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    line: String,
}

impl Trigger {
    /// The text to rephrase, without surrounding whitespace.
    pub fn source_text(&self) -> &str {
        self.line.trim()
    }

    /// Backspaces needed to erase the line and the marker. Counts code
    /// points, which can overshoot for multi-code-point graphemes.
    pub fn chars_to_delete(&self) -> usize {
        self.line.chars().count() + TRIGGER_MARKER.chars().count()
    }
}

/// Bounded FIFO of typed characters.
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    chars: VecDeque<char>,
    capacity: usize,
}

impl Default for RollingBuffer {
    fn default() -> Self {
        Self::with_capacity(BUFFER_CAPACITY)
    }
}

impl RollingBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chars: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn clear(&mut self) {
        self.chars.clear();
    }

    /// Remove the last character, as a backspace would.
    pub fn pop(&mut self) -> Option<char> {
        self.chars.pop_back()
    }

    /// Append typed text one character at a time. Characters after a
    /// trigger stay in the buffer. When the text completes more than one
    /// trigger the last one is returned and earlier lines are left as typed.
    pub fn append(&mut self, text: &str) -> Option<Trigger> {
        text.chars().fold(None, |last, c| self.push(c).or(last))
    }

    /// Append one character. When the buffer now ends with the marker the
    /// buffer is cleared and the current line is returned, unless that line
    /// is blank.
    pub fn push(&mut self, c: char) -> Option<Trigger> {
        self.chars.push_back(c);
        while self.chars.len() > self.capacity {
            self.chars.pop_front();
        }

        if !self.ends_with_marker() {
            return None;
        }

        let body = self.chars.len() - TRIGGER_MARKER.chars().count();
        let line_start = self
            .chars
            .range(..body)
            .rposition(|c| *c == '\n')
            .map_or(0, |newline| newline + 1);
        let line: String = self.chars.range(line_start..body).collect();
        self.chars.clear();

        if line.trim().is_empty() {
            return None;
        }
        Some(Trigger { line })
    }

    fn ends_with_marker(&self) -> bool {
        let marker = TRIGGER_MARKER.chars().rev();
        let n = TRIGGER_MARKER.chars().count();
        self.chars.len() >= n && self.chars.iter().rev().take(n).copied().eq(marker)
    }

    /// The buffered text, oldest first.
    pub fn contents(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_takes_whole_line() {
        let mut buffer = RollingBuffer::new();
        let trigger = buffer.append("fix my grammar::fix").unwrap();
        assert_eq!(trigger.source_text(), "fix my grammar");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_trigger_takes_text_after_last_newline() {
        let mut buffer = RollingBuffer::new();
        let trigger = buffer.append("hello\nfix my grammar::fix").unwrap();
        assert_eq!(trigger.source_text(), "fix my grammar");
        assert_eq!(trigger.chars_to_delete(), "fix my grammar".len() + 5);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_blank_line_is_rejected_and_cleared() {
        let mut buffer = RollingBuffer::new();
        assert_eq!(buffer.append("   ::fix"), None);
        assert!(buffer.is_empty());

        assert_eq!(buffer.append("hello\n::fix"), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_delete_count_covers_untrimmed_line() {
        let mut buffer = RollingBuffer::new();
        let trigger = buffer.append("  i cant come today ::fix").unwrap();
        assert_eq!(trigger.source_text(), "i cant come today");
        assert_eq!(trigger.chars_to_delete(), 20 + 5);
    }

    #[test]
    fn test_delete_count_is_in_chars() {
        let mut buffer = RollingBuffer::new();
        let trigger = buffer.append("café::fix").unwrap();
        assert_eq!(trigger.chars_to_delete(), 9);
    }

    #[test]
    fn test_partial_marker_does_not_trigger() {
        let mut buffer = RollingBuffer::new();
        assert_eq!(buffer.append("a ::fi"), None);
        assert_eq!(buffer.append("n"), None);
        assert_eq!(buffer.append(":fix"), None);
        assert_eq!(buffer.contents(), "a ::fin:fix");
    }

    #[test]
    fn test_backspace_edits_line() {
        let mut buffer = RollingBuffer::new();
        buffer.append("teh");
        buffer.pop();
        buffer.pop();
        assert_eq!(buffer.append("he cat::fix").unwrap().source_text(), "the cat");
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut buffer = RollingBuffer::new();
        assert_eq!(buffer.pop(), None);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_capacity_keeps_most_recent() {
        let mut buffer = RollingBuffer::new();
        let text: String = (0..450).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        buffer.append(&text);

        assert_eq!(buffer.len(), BUFFER_CAPACITY);
        assert_eq!(buffer.contents(), text[150..]);
    }

    #[test]
    fn test_text_after_trigger_is_kept() {
        let mut buffer = RollingBuffer::new();
        let trigger = buffer.append("ok::fix!").unwrap();
        assert_eq!(trigger.source_text(), "ok");
        assert_eq!(buffer.contents(), "!");
    }

    #[test]
    fn test_last_trigger_in_one_chunk_wins() {
        let mut buffer = RollingBuffer::new();
        let trigger = buffer.append("one::fix\ntwo::fix").unwrap();
        assert_eq!(trigger.source_text(), "two");
        assert_eq!(trigger.chars_to_delete(), 8);
        assert!(buffer.is_empty());
    }
}
