//! UTF-8 safe text input state with cursor management.

use unicode_width::UnicodeWidthStr;

/// Mask character shown in place of each character of a secret input.
const MASK: char = '•';

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
}

impl TextInputState {
    /// Input holding `text` with the cursor at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let input = text.into();
        let cursor = input.len();
        Self { input, cursor }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            self.cursor -= previous.len_utf8();
        }
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if let Some(previous) = self.input[..self.cursor].chars().next_back() {
            let start = self.cursor - previous.len_utf8();
            self.input.drain(start..self.cursor);
            self.cursor = start;
        }
    }

    /// Text as it should be drawn; secret inputs show one mask per character.
    pub fn display_text(&self, secret: bool) -> String {
        if secret {
            self.input.chars().map(|_| MASK).collect()
        } else {
            self.input.clone()
        }
    }

    /// Terminal column of the cursor relative to the start of the text.
    pub fn cursor_column(&self, secret: bool) -> u16 {
        let before = &self.input[..self.cursor];
        let width = if secret { before.chars().count() } else { before.width() };
        u16::try_from(width).unwrap_or(u16::MAX)
    }
}
