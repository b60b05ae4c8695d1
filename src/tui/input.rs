//! Input field handling for the terminal user interface.

/// A text input field with cursor position, active state, and an
/// optional length cap.
#[derive(Clone)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
    pub active: bool,
    pub max_len: Option<usize>,
}

impl InputField {
    /// Create a new empty input field without a length cap.
    pub fn new() -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            active: false,
            max_len: None,
        }
    }

    /// Create a new empty input field that refuses input beyond `max_len`
    /// characters.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            value: String::new(),
            cursor: 0,
            active: false,
            max_len: Some(max_len),
        }
    }

    /// Insert a character at the current cursor position, unless the
    /// field is already at its length cap.
    pub fn handle_char(&mut self, c: char) {
        if let Some(max) = self.max_len {
            if self.value.chars().count() >= max {
                return;
            }
        }
        let byte_idx = self.byte_index();
        self.value.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_idx = self.byte_index();
            self.value.remove(byte_idx);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let byte_idx = self.byte_index();
            self.value.remove(byte_idx);
        }
    }

    /// Move cursor one position to the left.
    pub fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move cursor one position to the right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    /// Reset the field to empty.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    // Cursor is tracked in characters; string edits need bytes.
    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

impl Default for InputField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typing_and_editing() {
        let mut field = InputField::new();
        for c in "milk".chars() {
            field.handle_char(c);
        }
        assert_eq!(field.value, "milk");
        field.handle_backspace();
        assert_eq!(field.value, "mil");
        field.move_cursor_left();
        field.move_cursor_left();
        field.handle_delete();
        assert_eq!(field.value, "ml");
    }

    #[test]
    fn test_max_len_caps_input() {
        let mut field = InputField::with_max_len(3);
        for c in "abcdef".chars() {
            field.handle_char(c);
        }
        assert_eq!(field.value, "abc");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = InputField::new();
        for c in "héllo".chars() {
            field.handle_char(c);
        }
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.move_cursor_left();
        field.handle_delete();
        assert_eq!(field.value, "hllo");
    }
}
