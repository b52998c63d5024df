//! Editable form fields used by every screen.

const MAX_FIELD_LEN: usize = 64;

/// Single-line text field with a character cursor.
#[derive(Debug, Clone)]
pub struct TextInput {
    pub label: &'static str,
    value: String,
    cursor: usize,
}

impl TextInput {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            cursor: 0,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.value.len())
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.len() as isize;
        let next = (self.cursor as isize + delta).clamp(0, len);
        self.cursor = next as usize;
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn insert(&mut self, ch: char) {
        if self.len() >= MAX_FIELD_LEN || ch.is_control() {
            return;
        }
        let index = self.byte_index();
        self.value.insert(index, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let index = self.byte_index();
            self.value.remove(index);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            let index = self.byte_index();
            self.value.remove(index);
        }
    }
}

/// Choice between a fixed list of labelled options, cycled with arrow keys.
#[derive(Debug, Clone)]
pub struct Picker<K> {
    pub label: &'static str,
    options: Vec<(K, String)>,
    index: Option<usize>,
}

impl<K: Clone + PartialEq> Picker<K> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            options: Vec::new(),
            index: None,
        }
    }

    /// Replace the options, keeping the current selection when it survives.
    pub fn set_options(&mut self, options: Vec<(K, String)>) {
        let previous = self.selected().cloned();
        self.options = options;
        self.index = previous.and_then(|key| self.options.iter().position(|(k, _)| *k == key));
    }

    pub fn clear(&mut self) {
        self.index = None;
    }

    pub fn cycle(&mut self, delta: isize) {
        if self.options.is_empty() {
            self.index = None;
            return;
        }
        let len = self.options.len() as isize;
        let next = match self.index {
            Some(current) => (current as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.index = Some(next as usize);
    }

    pub fn selected(&self) -> Option<&K> {
        self.index
            .and_then(|index| self.options.get(index))
            .map(|(key, _)| key)
    }

    pub fn display(&self) -> String {
        match self.index.and_then(|index| self.options.get(index)) {
            Some((_, label)) => format!("< {label} >"),
            None if self.options.is_empty() => "(none available)".to_string(),
            None => "< select >".to_string(),
        }
    }
}

/// Clamp a table cursor to `len` rows.
pub fn clamp_cursor(cursor: usize, len: usize) -> usize {
    cursor.min(len.saturating_sub(1))
}

/// Move a table cursor by `delta`, staying within `len` rows.
pub fn step_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (cursor as isize + delta).clamp(0, len as isize - 1) as usize
}
