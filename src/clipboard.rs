//! Clipboard access behind a small trait
//!
//! The engine never talks to the platform clipboard directly. Hosts pick a
//! provider: the system clipboard via arboard, an in-memory buffer for tests
//! and headless use, or one that always fails.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Why a clipboard operation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard could be opened (headless session, missing display server)
    Unavailable(String),
    /// The clipboard holds no text
    Empty,
    /// The clipboard exists but the read or write was refused
    Access(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable(e) => write!(f, "Clipboard unavailable: {}", e),
            ClipboardError::Empty => write!(f, "Clipboard contains no text"),
            ClipboardError::Access(e) => write!(f, "Clipboard access failed: {}", e),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// Plain-text clipboard
pub trait ClipboardProvider {
    fn read_text(&mut self) -> Result<String, ClipboardError>;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The platform clipboard
///
/// A fresh `arboard::Clipboard` is opened per call so a missing display
/// server only fails the operation that needed it.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }

    fn open() -> Result<arboard::Clipboard, ClipboardError> {
        arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))
    }
}

impl ClipboardProvider for SystemClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Self::open()?.get_text().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => ClipboardError::Empty,
            other => ClipboardError::Access(other.to_string()),
        })
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Self::open()?
            .set_text(text)
            .map_err(|e| ClipboardError::Access(e.to_string()))
    }
}

/// In-process clipboard
///
/// Clones share the same buffer, so a test can keep one handle and give
/// another to the engine.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Rc<RefCell<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let clipboard = Self::new();
        clipboard.set_contents(text);
        clipboard
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }

    pub fn set_contents(&self, text: impl Into<String>) {
        *self.contents.borrow_mut() = Some(text.into());
    }

    pub fn clear(&self) {
        *self.contents.borrow_mut() = None;
    }
}

impl ClipboardProvider for MemoryClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        self.contents.borrow().clone().ok_or(ClipboardError::Empty)
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.set_contents(text);
        Ok(())
    }
}

/// A clipboard that always fails, for hosts without one
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl ClipboardProvider for UnavailableClipboard {
    fn read_text(&mut self) -> Result<String, ClipboardError> {
        Err(ClipboardError::Unavailable("no clipboard configured".to_string()))
    }

    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable("no clipboard configured".to_string()))
    }
}
