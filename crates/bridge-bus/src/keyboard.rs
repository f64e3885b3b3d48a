//! Keyboard events forwarded by the platform.

/// Virtual key code of `P`.
pub const KEY_CODE_P: u32 = 80;

/// A key-down event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// Virtual key code.
    pub key_code: u32,
    /// Control held.
    pub ctrl_key: bool,
    /// Command / meta held.
    pub meta_key: bool,
}

impl KeyEvent {
    /// Create an event.
    #[must_use]
    pub fn new(key_code: u32, ctrl_key: bool, meta_key: bool) -> Self {
        Self {
            key_code,
            ctrl_key,
            meta_key,
        }
    }

    /// Ctrl+P or Cmd+P.
    #[must_use]
    pub fn is_print_shortcut(&self) -> bool {
        self.key_code == KEY_CODE_P && (self.ctrl_key || self.meta_key)
    }
}
