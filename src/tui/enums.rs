//! Enumerations for TUI state management.

/// Which part of the chat screen receives key presses.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    Input,
    Buttons,
}

impl Focus {
    pub fn toggled(self) -> Self {
        match self {
            Focus::Input => Focus::Buttons,
            Focus::Buttons => Focus::Input,
        }
    }
}

/// Screen layered over the conversation.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Overlay {
    None,
    Help,
}
