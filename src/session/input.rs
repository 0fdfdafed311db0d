/// Keys the session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Toggle play/pause.
    Space,
    /// Scroll back by one step.
    ArrowUp,
    /// Scroll forward by one step.
    ArrowDown,
    /// Faster.
    Plus,
    /// Slower.
    Minus,
    /// Toggle fullscreen.
    F,
    /// Anything else (still counts as activity).
    Other,
}

impl Key {
    /// Map a DOM-style key name (`" "`, `"ArrowUp"`, `"+"`, `"f"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name {
            " " | "Space" | "Spacebar" => Key::Space,
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "+" | "=" | "Plus" => Key::Plus,
            "-" | "_" | "Minus" => Key::Minus,
            "f" | "F" => Key::F,
            _ => Key::Other,
        }
    }
}
