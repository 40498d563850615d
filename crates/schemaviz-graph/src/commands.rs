//! Keyboard shortcut mapping.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    /// Cmd on macOS.
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        shift: false,
        alt: false,
    };

    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    /// Character produced by the key, as the host reports it.
    pub key: char,
    pub modifiers: Modifiers,
    /// Set while a text field owns keyboard focus.
    pub text_input_focused: bool,
}

impl KeyInput {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
            text_input_focused: false,
        }
    }

    pub fn with_command(key: char, shift: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers {
                ctrl: true,
                shift,
                ..Modifiers::NONE
            },
            text_input_focused: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    // Handled by the engine
    ZoomIn,
    ZoomOut,
    ZoomReset,
    FitToView,
    AutoArrange,
    Undo,
    Redo,

    // Forwarded to the host
    ToggleViewMode,
    ToggleSidePanel,
    ToggleFilterPanel,
    ToggleExportPanel,
    RefreshSchema,
    FocusSearch,
}

impl Command {
    pub fn from_key(input: &KeyInput) -> Option<Command> {
        if input.text_input_focused || input.modifiers.alt {
            return None;
        }

        if input.modifiers.command() {
            return match input.key.to_ascii_lowercase() {
                'z' if input.modifiers.shift => Some(Command::Redo),
                'z' => Some(Command::Undo),
                _ => None,
            };
        }

        let command = match input.key {
            'g' => Command::ToggleViewMode,
            'c' => Command::ToggleSidePanel,
            'a' => Command::AutoArrange,
            'f' => Command::FitToView,
            'F' => Command::ToggleFilterPanel,
            'e' => Command::ToggleExportPanel,
            '+' | '=' => Command::ZoomIn,
            '-' | '_' => Command::ZoomOut,
            '0' => Command::ZoomReset,
            'r' => Command::RefreshSchema,
            '/' => Command::FocusSearch,
            _ => return None,
        };
        Some(command)
    }
}
