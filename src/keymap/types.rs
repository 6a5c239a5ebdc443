//! Keystrokes as the grid sees them
//!
//! Keys are written lowercase with modifiers first, joined by `+`
//! (`ctrl+shift+z`, `escape`, `f2`). Keymap files, `--keys` sequences and
//! `Display` all use that form, so a printed keystroke parses back.

use std::fmt;
use std::ops::BitOr;

/// Held modifier keys
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(1);
    pub const SHIFT: Modifiers = Modifiers(1 << 1);
    pub const ALT: Modifiers = Modifiers(1 << 2);
    /// Cmd on macOS, Super/Win elsewhere
    pub const META: Modifiers = Modifiers(1 << 3);

    /// Written order for `Display`
    const NAMED: [(Modifiers, &'static str); 4] = [
        (Modifiers::CTRL, "ctrl"),
        (Modifiers::SHIFT, "shift"),
        (Modifiers::ALT, "alt"),
        (Modifiers::META, "meta"),
    ];

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.has(Self::CTRL)
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.has(Self::SHIFT)
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.has(Self::ALT)
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.has(Self::META)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    const fn has(self, flag: Modifiers) -> bool {
        self.0 & flag.0 == flag.0
    }

    /// The `cmd` alias: Meta on macOS, Ctrl elsewhere
    pub fn cmd() -> Modifiers {
        if cfg!(target_os = "macos") {
            Self::META
        } else {
            Self::CTRL
        }
    }

    /// Look up one modifier name from a key string
    pub(crate) fn from_name(name: &str) -> Option<Modifiers> {
        match name {
            "ctrl" | "control" => Some(Self::CTRL),
            "shift" => Some(Self::SHIFT),
            "alt" | "option" => Some(Self::ALT),
            "meta" | "super" | "win" => Some(Self::META),
            "cmd" => Some(Self::cmd()),
            _ => None,
        }
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Modifiers(self.0 | rhs.0)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Self::NAMED
            .iter()
            .filter(|(flag, _)| self.has(*flag))
            .map(|(_, name)| *name);
        if let Some(first) = names.next() {
            f.write_str(first)?;
            for name in names {
                write!(f, "+{}", name)?;
            }
        }
        Ok(())
    }
}

/// Keys the grid binds or forwards to an open editor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character, stored lowercase
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Space,
    /// F1 through F24
    F(u8),
}

/// Named keys with their accepted spellings, canonical spelling first
const NAMED_KEYS: [(KeyCode, &[&str]); 6] = [
    (KeyCode::Enter, &["enter", "return"]),
    (KeyCode::Escape, &["escape", "esc"]),
    (KeyCode::Tab, &["tab"]),
    (KeyCode::Backspace, &["backspace"]),
    (KeyCode::Delete, &["delete", "del"]),
    (KeyCode::Space, &["space"]),
];

impl KeyCode {
    /// Parse the key part of a key string (already lowercased)
    pub(crate) fn from_name(name: &str) -> Option<KeyCode> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Some(KeyCode::Char(c.to_ascii_lowercase()));
        }

        if let Some(n) = name.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
            return (1..=24).contains(&n).then_some(KeyCode::F(n));
        }

        NAMED_KEYS
            .iter()
            .find(|(_, spellings)| spellings.iter().any(|s| *s == name))
            .map(|(key, _)| *key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::F(n) => write!(f, "f{}", n),
            named => {
                let spelling = NAMED_KEYS
                    .iter()
                    .find(|(key, _)| key == named)
                    .map_or("?", |(_, spellings)| spellings[0]);
                f.write_str(spelling)
            }
        }
    }
}

/// A key plus the modifiers held with it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Keystroke {
    pub key: KeyCode,
    pub mods: Modifiers,
}

impl Keystroke {
    pub fn new(key: KeyCode, mods: Modifiers) -> Self {
        Self { key, mods }
    }

    /// A key with no modifiers
    pub fn key(key: KeyCode) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    pub fn char(c: char) -> Self {
        Self::key(KeyCode::Char(c.to_ascii_lowercase()))
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), Modifiers::CTRL)
    }

    pub fn meta(c: char) -> Self {
        Self::new(KeyCode::Char(c.to_ascii_lowercase()), Modifiers::META)
    }

    /// The character this keystroke types into a cell editor
    ///
    /// `None` for named keys and for chords held with Ctrl, Alt or Meta.
    pub fn typed_char(&self) -> Option<char> {
        if self.mods.ctrl() || self.mods.alt() || self.mods.meta() {
            return None;
        }
        match self.key {
            KeyCode::Char(c) if self.mods.shift() => Some(c.to_ascii_uppercase()),
            KeyCode::Char(c) => Some(c),
            KeyCode::Space => Some(' '),
            _ => None,
        }
    }
}

impl fmt::Display for Keystroke {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.mods, self.key)
        }
    }
}
