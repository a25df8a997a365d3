/// Minimal single-line input editor shared by every text field
/// (individual draft, amount, description).
#[derive(Default, Clone)]
pub struct LineEdit {
    pub value: String,
    pub cursor: usize,
}

impl LineEdit {
    pub fn set(&mut self, s: impl Into<String>) {
        self.value = s.into();
        self.cursor = self.value.len();
    }
    pub fn push(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.cursor -= prev;
            self.value.remove(self.cursor);
        }
    }
    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }
    pub fn left(&mut self) {
        if self.cursor > 0 {
            let prev = self.value[..self.cursor]
                .chars()
                .next_back()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.cursor -= prev;
        }
    }
    pub fn right(&mut self) {
        if self.cursor < self.value.len() {
            let next = self.value[self.cursor..]
                .chars()
                .next()
                .map(char::len_utf8)
                .unwrap_or(1);
            self.cursor += next;
        }
    }
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_at_cursor() {
        let mut e = LineEdit::default();
        e.push('a');
        e.push('c');
        e.left();
        e.push('b');
        assert_eq!(e.value, "abc");

        e.right();
        e.backspace();
        assert_eq!(e.value, "ab");

        e.set("hello");
        assert_eq!(e.cursor, 5);
        e.clear();
        assert_eq!(e.value, "");
        assert_eq!(e.cursor, 0);
    }

    #[test]
    fn handles_multibyte_chars() {
        let mut e = LineEdit::default();
        e.push('é');
        e.push('!');
        e.left();
        e.left();
        e.right();
        assert_eq!(e.cursor, 'é'.len_utf8());
        e.backspace();
        assert_eq!(e.value, "!");
    }
}
