//! Single-line text buffer with a character-indexed cursor.

use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl TextInput {
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.chars().count();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(idx, _)| idx)
            .unwrap_or(self.text.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.byte_index(self.cursor);
        self.text.insert(byte_idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.byte_index(self.cursor);
            if byte_idx < self.text.len() {
                self.text.remove(byte_idx);
            }
        }
    }

    pub fn delete(&mut self) {
        let byte_idx = self.byte_index(self.cursor);
        if byte_idx < self.text.len() {
            self.text.remove(byte_idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Deletes the word before the cursor, along with any whitespace after it.
    pub fn delete_word(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let chars: Vec<char> = self.text.chars().collect();
        let mut i = self.cursor;
        while i > 0 && chars[i - 1].is_whitespace() {
            i -= 1;
        }
        while i > 0 && !chars[i - 1].is_whitespace() {
            i -= 1;
        }

        let byte_start = self.byte_index(i);
        let byte_end = self.byte_index(self.cursor);
        self.text.replace_range(byte_start..byte_end, "");
        self.cursor = i;
    }

    /// Display width of the text before the cursor.
    pub fn cursor_offset(&self) -> u16 {
        self.text
            .chars()
            .take(self.cursor)
            .filter_map(|c| c.width())
            .map(|w| w as u16)
            .sum::<u16>()
    }

    /// Horizontal scroll that keeps the cursor inside `visible_width` columns.
    pub fn horizontal_scroll(&self, visible_width: u16) -> u16 {
        if visible_width == 0 {
            return 0;
        }
        self.cursor_offset()
            .saturating_sub(visible_width.saturating_sub(1))
    }

    /// Places the cursor at the character under display column `target_column`.
    pub fn set_cursor_at_column(&mut self, target_column: u16) {
        let mut width = 0u16;
        for (idx, ch) in self.text.chars().enumerate() {
            let char_width = ch.width().unwrap_or(0) as u16;
            if width + char_width > target_column {
                self.cursor = idx;
                return;
            }
            width += char_width;
        }
        self.cursor = self.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_backspace_mid_text() {
        let mut input = TextInput::with_text("gora");
        input.move_left();
        input.move_left();
        input.insert_char('r');
        assert_eq!(input.text(), "gorra");
        assert_eq!(input.cursor(), 3);
        input.backspace();
        assert_eq!(input.text(), "gora");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn test_delete_at_end_is_noop() {
        let mut input = TextInput::with_text("abc");
        input.delete();
        assert_eq!(input.text(), "abc");
        input.move_to_start();
        input.delete();
        assert_eq!(input.text(), "bc");
    }

    #[test]
    fn test_delete_word() {
        let mut input = TextInput::with_text("hello world  ");
        input.delete_word();
        assert_eq!(input.text(), "hello ");
        assert_eq!(input.cursor(), 6);
        input.delete_word();
        assert_eq!(input.text(), "");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut input = TextInput::with_text("día");
        input.move_left();
        input.backspace();
        assert_eq!(input.text(), "da");
        input.insert_char('í');
        assert_eq!(input.text(), "día");
    }

    #[test]
    fn test_horizontal_scroll_keeps_cursor_visible() {
        let mut input = TextInput::with_text("abcdefghijklmnopqrstuvwxyz");
        input.move_to_start();
        assert_eq!(input.horizontal_scroll(10), 0);
        for _ in 0..15 {
            input.move_right();
        }
        assert_eq!(input.horizontal_scroll(10), 6);
    }

    #[test]
    fn test_cursor_for_column_handles_wide_characters() {
        let mut input = TextInput::with_text("🦀a");
        input.set_cursor_at_column(1);
        assert_eq!(input.cursor(), 0);
        input.set_cursor_at_column(2);
        assert_eq!(input.cursor(), 1);
        input.set_cursor_at_column(50);
        assert_eq!(input.cursor(), 2);
    }
}
