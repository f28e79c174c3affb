//! Keyboard shortcuts for the viewer and its search panel.

/// A key as reported by the host's keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    /// A printable key, as typed (shift may have changed its case).
    Char(char),
}

/// One key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyInput {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            shift: false,
            ctrl: false,
            meta: false,
        }
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }
}

/// Host platform; decides which key acts as the command modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Platform {
    /// Cmd is the modifier.
    Mac,
    /// Ctrl is the modifier.
    #[default]
    Other,
}

impl Platform {
    /// Guess the platform from a browser user-agent string.
    pub fn from_user_agent(user_agent: &str) -> Self {
        if user_agent.to_ascii_lowercase().contains("mac") {
            Platform::Mac
        } else {
            Platform::Other
        }
    }

    pub fn modifier_held(self, input: &KeyInput) -> bool {
        match self {
            Platform::Mac => input.meta,
            Platform::Other => input.ctrl,
        }
    }

    /// Label for the modifier key in tooltips.
    pub fn modifier_label(self) -> &'static str {
        match self {
            Platform::Mac => "⌘",
            Platform::Other => "Ctrl",
        }
    }
}

/// An action a key press can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    OpenSearch,
    CloseSearch,
    NextMatch,
    PreviousMatch,
    ZoomIn,
    ZoomOut,
}

/// Viewer state relevant to key resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyContext {
    /// Whether the search panel is open and has focus.
    pub search_open: bool,
    /// Whether the viewer shows exactly one PDF (search is only offered then).
    pub single_document: bool,
}

/// Maps key presses to [`Command`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyBindings {
    platform: Platform,
}

impl KeyBindings {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Resolve a key press, or `None` if it should pass through.
    ///
    /// Search panel keys (Escape, Enter, Shift+Enter, Mod+G, Mod+Shift+G)
    /// only apply while the panel is open. Zoom keys always apply; Mod+F
    /// applies only to a single-document viewer.
    pub fn resolve(&self, input: &KeyInput, context: &KeyContext) -> Option<Command> {
        let modifier = self.platform.modifier_held(input);
        let navigate = if input.shift {
            Command::PreviousMatch
        } else {
            Command::NextMatch
        };

        if context.search_open {
            match input.key {
                Key::Escape => return Some(Command::CloseSearch),
                Key::Enter => return Some(navigate),
                Key::Char(c) if modifier && c.eq_ignore_ascii_case(&'g') => return Some(navigate),
                _ => {}
            }
        }

        if !modifier {
            return None;
        }
        match input.key {
            Key::Char('+' | '=') => Some(Command::ZoomIn),
            Key::Char('-') => Some(Command::ZoomOut),
            Key::Char(c) if c.eq_ignore_ascii_case(&'f') && context.single_document => {
                Some(Command::OpenSearch)
            }
            _ => None,
        }
    }
}
