//! Static on-screen keyboard layout

/// Relative width class of a key cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyWidth {
    Normal,
    W1,
    W2,
    W3,
    Space,
}

impl KeyWidth {
    /// Style class name; empty for a normal key
    pub fn class(&self) -> &'static str {
        match self {
            KeyWidth::Normal => "",
            KeyWidth::W1 => "w-1",
            KeyWidth::W2 => "w-2",
            KeyWidth::W3 => "w-3",
            KeyWidth::Space => "space",
        }
    }

    /// Width in character cells when drawn in a terminal
    pub fn cells(&self) -> u16 {
        match self {
            KeyWidth::Normal => 5,
            KeyWidth::W1 => 6,
            KeyWidth::W2 => 8,
            KeyWidth::W3 => 10,
            KeyWidth::Space => 26,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCap {
    /// Lowercase identifier matched against keybinds; right-hand variants end in `-r`
    pub code: &'static str,
    pub label: &'static str,
    pub width: KeyWidth,
    pub modifier: bool,
}

impl KeyCap {
    const fn key(code: &'static str, label: &'static str) -> Self {
        Self {
            code,
            label,
            width: KeyWidth::Normal,
            modifier: false,
        }
    }

    const fn wide(code: &'static str, label: &'static str, width: KeyWidth) -> Self {
        Self {
            code,
            label,
            width,
            modifier: false,
        }
    }

    const fn modifier(code: &'static str, label: &'static str, width: KeyWidth) -> Self {
        Self {
            code,
            label,
            width,
            modifier: true,
        }
    }

    /// Code with the right-hand `-r` suffix removed
    pub fn base_code(&self) -> &'static str {
        normalize_code(self.code)
    }
}

/// Strip the right-hand `-r` suffix from a key code
pub fn normalize_code(code: &str) -> &str {
    code.strip_suffix("-r").unwrap_or(code)
}

const ROW_FUNCTION: &[KeyCap] = &[
    KeyCap::key("esc", "Esc"),
    KeyCap::key("f1", "F1"),
    KeyCap::key("f2", "F2"),
    KeyCap::key("f3", "F3"),
    KeyCap::key("f4", "F4"),
    KeyCap::key("f5", "F5"),
    KeyCap::key("f6", "F6"),
    KeyCap::key("f7", "F7"),
    KeyCap::key("f8", "F8"),
    KeyCap::key("f9", "F9"),
    KeyCap::key("f10", "F10"),
    KeyCap::key("f11", "F11"),
    KeyCap::key("f12", "F12"),
    KeyCap::key("del", "Del"),
];

const ROW_NUMBER: &[KeyCap] = &[
    KeyCap::key("backtick", "`"),
    KeyCap::key("1", "1"),
    KeyCap::key("2", "2"),
    KeyCap::key("3", "3"),
    KeyCap::key("4", "4"),
    KeyCap::key("5", "5"),
    KeyCap::key("6", "6"),
    KeyCap::key("7", "7"),
    KeyCap::key("8", "8"),
    KeyCap::key("9", "9"),
    KeyCap::key("0", "0"),
    KeyCap::key("minus", "-"),
    KeyCap::key("equals", "="),
    KeyCap::wide("backspace", "Bksp", KeyWidth::W2),
];

const ROW_TOP: &[KeyCap] = &[
    KeyCap::wide("tab", "Tab", KeyWidth::W1),
    KeyCap::key("q", "Q"),
    KeyCap::key("w", "W"),
    KeyCap::key("e", "E"),
    KeyCap::key("r", "R"),
    KeyCap::key("t", "T"),
    KeyCap::key("y", "Y"),
    KeyCap::key("u", "U"),
    KeyCap::key("i", "I"),
    KeyCap::key("o", "O"),
    KeyCap::key("p", "P"),
    KeyCap::key("[", "["),
    KeyCap::key("]", "]"),
    KeyCap::key("\\", "\\"),
];

const ROW_HOME: &[KeyCap] = &[
    KeyCap::wide("caps", "Caps", KeyWidth::W2),
    KeyCap::key("a", "A"),
    KeyCap::key("s", "S"),
    KeyCap::key("d", "D"),
    KeyCap::key("f", "F"),
    KeyCap::key("g", "G"),
    KeyCap::key("h", "H"),
    KeyCap::key("j", "J"),
    KeyCap::key("k", "K"),
    KeyCap::key("l", "L"),
    KeyCap::key(";", ";"),
    KeyCap::key("quote", "\""),
    KeyCap::wide("enter", "Enter", KeyWidth::W2),
];

const ROW_BOTTOM: &[KeyCap] = &[
    KeyCap::modifier("shift", "Shift", KeyWidth::W3),
    KeyCap::key("z", "Z"),
    KeyCap::key("x", "X"),
    KeyCap::key("c", "C"),
    KeyCap::key("v", "V"),
    KeyCap::key("b", "B"),
    KeyCap::key("n", "N"),
    KeyCap::key("m", "M"),
    KeyCap::key(",", ","),
    KeyCap::key(".", "."),
    KeyCap::key("/", "/"),
    KeyCap::modifier("shift-r", "Shift", KeyWidth::W3),
];

const ROW_MODIFIERS: &[KeyCap] = &[
    KeyCap::wide("fn", "fn", KeyWidth::W1),
    KeyCap::modifier("ctrl", "Ctrl", KeyWidth::W1),
    KeyCap::modifier("opt", "Opt", KeyWidth::W1),
    KeyCap::modifier("cmd", "Cmd", KeyWidth::W1),
    KeyCap::wide("space", "", KeyWidth::Space),
    KeyCap::modifier("cmd-r", "Cmd", KeyWidth::W1),
    KeyCap::modifier("opt-r", "Opt", KeyWidth::W1),
];

const ROW_ARROWS: &[KeyCap] = &[
    KeyCap::key("left", "\u{2190}"),
    KeyCap::key("up", "\u{2191}"),
    KeyCap::key("down", "\u{2193}"),
    KeyCap::key("right", "\u{2192}"),
];

const LAYOUT: &[&[KeyCap]] = &[
    ROW_FUNCTION,
    ROW_NUMBER,
    ROW_TOP,
    ROW_HOME,
    ROW_BOTTOM,
    ROW_MODIFIERS,
    ROW_ARROWS,
];

/// Rows of the keyboard, top to bottom
pub fn keyboard_layout() -> &'static [&'static [KeyCap]] {
    LAYOUT
}

/// Look up a cap by its code
pub fn find_key(code: &str) -> Option<&'static KeyCap> {
    LAYOUT.iter().flat_map(|row| row.iter()).find(|k| k.code == code)
}
