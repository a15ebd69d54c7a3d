/// A raw browser keyboard event, carried to the application untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key value, e.g. "w" or "Escape".
    pub key: String,
    /// Physical key code, e.g. "KeyW".
    pub code: String,
    /// True when the event comes from the key being held down.
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: &str, code: &str, repeat: bool) -> Self {
        Self {
            key: key.to_string(),
            code: code.to_string(),
            repeat,
        }
    }
}
