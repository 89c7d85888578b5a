#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Results,
}

#[derive(Default)]
pub struct UIState {
    pub input: String,
    pub focus: Focus,

    // Highlighted entry of the suggestions grid
    pub selection: usize,

    pub scroll_offset: usize,
    // Largest useful scroll_offset, measured at the last draw
    pub max_scroll: usize,
    pub status_message: Option<String>,

    // Modal notice, dismissed by any key
    pub notice: Option<String>,

    // Link-preview panel toggle
    pub show_preview: bool,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-result view state after the displayed result changes.
    pub fn reset_view(&mut self) {
        self.selection = 0;
        self.scroll_offset = 0;
    }
}
