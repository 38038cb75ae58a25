//! Small reusable TUI widgets: a bounded scrollable list and a one-line
//! input box with cursor editing.

use ratatui::widgets::{ListItem, ListState, ScrollbarState};

/// A scrollable list of pre-rendered items with a bounded history.
/// Item 0 is the newest; lists rendering bottom-to-top show it last.
pub struct ScrollableList {
    pub list_items: Vec<ListItem<'static>>,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    max_items: usize,
}

impl ScrollableList {
    pub fn new(max_items: usize) -> Self {
        Self {
            list_items: Vec::new(),
            list_state: ListState::default(),
            scroll_state: ScrollbarState::default(),
            max_items,
        }
    }

    pub fn push(&mut self, item: ListItem<'static>) {
        if self.list_items.len() == self.max_items {
            self.list_items.pop();
        }
        self.list_items.insert(0, item);
        self.scroll_state = self.scroll_state.content_length(self.list_items.len());
    }

    pub fn move_up(&mut self) {
        if self.list_items.is_empty() {
            return;
        }
        let selected = match self.list_state.selected() {
            Some(selected) => (selected + 1).min(self.list_items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(selected));
        self.scroll_state = self.scroll_state.position(selected);
    }

    pub fn move_down(&mut self) {
        let selected = self.list_state.selected().unwrap_or(0).saturating_sub(1);
        self.list_state.select(Some(selected));
        self.scroll_state = self.scroll_state.position(selected);
    }

    /// Jump to the oldest item.
    pub fn jump_to_first(&mut self) {
        if self.list_items.is_empty() {
            return;
        }
        let last = self.list_items.len() - 1;
        self.list_state.select(Some(last));
        self.scroll_state = self.scroll_state.position(last);
    }

    /// Jump back to the newest item.
    pub fn jump_to_last(&mut self) {
        self.list_state.select(None);
        self.scroll_state = self.scroll_state.position(0);
    }
}

/// One-line text input with a character-indexed cursor.
pub struct UserInput {
    pub value: String,
    pub char_idx: usize,
}

impl UserInput {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            char_idx: 0,
        }
    }

    fn byte_idx(&self) -> usize {
        self.value
            .char_indices()
            .map(|(idx, _)| idx)
            .nth(self.char_idx)
            .unwrap_or(self.value.len())
    }

    pub fn input(&mut self, c: char) {
        let idx = self.byte_idx();
        self.value.insert(idx, c);
        self.char_idx += 1;
    }

    pub fn backspace(&mut self) {
        if self.char_idx == 0 {
            return;
        }
        let before = self.value.chars().take(self.char_idx - 1);
        let after = self.value.chars().skip(self.char_idx);
        self.value = before.chain(after).collect();
        self.char_idx -= 1;
    }

    pub fn delete(&mut self) {
        if self.char_idx >= self.value.chars().count() {
            return;
        }
        let before = self.value.chars().take(self.char_idx);
        let after = self.value.chars().skip(self.char_idx + 1);
        self.value = before.chain(after).collect();
    }

    pub fn move_left(&mut self) {
        self.char_idx = self.char_idx.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.char_idx = (self.char_idx + 1).min(self.value.chars().count());
    }

    pub fn jump_to_first(&mut self) {
        self.char_idx = 0;
    }

    pub fn jump_to_last(&mut self) {
        self.char_idx = self.value.chars().count();
    }

    /// Take the trimmed value and reset the box.
    pub fn submit(&mut self) -> String {
        let value = std::mem::take(&mut self.value);
        self.char_idx = 0;
        value.trim().to_string()
    }
}

impl Default for UserInput {
    fn default() -> Self {
        Self::new()
    }
}
