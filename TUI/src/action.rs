use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ui_state::{Focus, UIState};

/// User actions that can be triggered by keys or UI events.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Look up the text in the input box
    Submit,
    /// Look up the highlighted suggestion
    Activate,
    /// Restore the previous result
    Back,
    /// Copy a share link for the current result
    Share,
    /// Show or hide the link-preview panel
    TogglePreview,
    ToggleFocus,
    Insert(char),
    DeleteBack,
    /// Insert text delivered by a bracketed paste
    Paste(String),
    /// Read the system clipboard into the input
    PasteClipboard,
    Move(Move),
    ScrollUp,
    ScrollDown,
    /// Close the open notice
    DismissNotice,
    /// Clear the input, or quit when it is already empty
    Escape,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

/// Map a key press to an action given the current UI state.
pub fn key_action(key: KeyEvent, ui: &UIState) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    if ui.notice.is_some() {
        return Some(Action::DismissNotice);
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let action = match key.code {
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('b') if ctrl => Action::Back,
        KeyCode::Char('s') if ctrl => Action::Share,
        KeyCode::Char('v') if ctrl => Action::PasteClipboard,
        KeyCode::Char(_) if ctrl => return None,
        KeyCode::Esc => Action::Escape,
        KeyCode::F(2) => Action::TogglePreview,
        KeyCode::Tab | KeyCode::BackTab => Action::ToggleFocus,
        KeyCode::PageUp => Action::ScrollUp,
        KeyCode::PageDown => Action::ScrollDown,
        KeyCode::Char(c) => Action::Insert(c),
        KeyCode::Backspace => Action::DeleteBack,
        KeyCode::Enter => match ui.focus {
            Focus::Input => Action::Submit,
            Focus::Results => Action::Activate,
        },
        KeyCode::Up => match ui.focus {
            Focus::Input => Action::ScrollUp,
            Focus::Results => Action::Move(Move::Up),
        },
        KeyCode::Down => match ui.focus {
            Focus::Input => Action::ScrollDown,
            Focus::Results => Action::Move(Move::Down),
        },
        KeyCode::Left if ui.focus == Focus::Results => Action::Move(Move::Left),
        KeyCode::Right if ui.focus == Focus::Results => Action::Move(Move::Right),
        _ => return None,
    };

    Some(action)
}
