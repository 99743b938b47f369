//! ANSI color codes for dump output.
//!
//! Three semantic colors with a dim modifier:
//! - Blue: chunk tags, opcode names
//! - Green: resolved symbol names, string payloads
//! - Dim: offsets, sizes, raw bytes
//! - Reset: Return to default

/// ANSI color palette for CLI output.
///
/// Uses only standard 16-color ANSI codes so dumps read the same on light
/// and dark terminals.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub blue: &'static str,
    pub green: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    /// Colors enabled (ANSI escape codes).
    pub const ON: Self = Self {
        blue: "\x1b[34m",
        green: "\x1b[32m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    /// Colors disabled (empty strings).
    pub const OFF: Self = Self {
        blue: "",
        green: "",
        dim: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }

    /// Wrap a chunk tag or opcode name.
    pub fn tag(&self, text: &str) -> String {
        format!("{}{}{}", self.blue, text, self.reset)
    }

    /// Wrap a resolved name.
    pub fn name(&self, text: &str) -> String {
        format!("{}{}{}", self.green, text, self.reset)
    }

    /// Wrap structural noise (offsets, sizes).
    pub fn meta(&self, text: &str) -> String {
        format!("{}{}{}", self.dim, text, self.reset)
    }
}
