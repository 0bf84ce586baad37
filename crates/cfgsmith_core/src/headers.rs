//! Header lines for sectioned log output.
//!
//! A header overlays a message onto a configured line of filler characters:
//!
//! ```text
//! ***** my_projects/demo/input_data/ios/r1.yaml *******************************
//! ===== my_projects/demo/input_data/vars.yaml ================
//! ```

use std::collections::BTreeMap;

/// Characters of the line kept before the message.
const SHIFT: usize = 5;

/// Header line templates keyed by level (1 is the most prominent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLines(BTreeMap<u8, String>);

impl Default for HeaderLines {
    fn default() -> Self {
        let mut lines = BTreeMap::new();
        lines.insert(1, "*".repeat(80));
        lines.insert(2, "=".repeat(60));
        lines.insert(3, "-".repeat(60));
        Self(lines)
    }
}

impl HeaderLines {
    pub fn new(lines: BTreeMap<u8, String>) -> Self {
        Self(lines)
    }

    pub fn into_inner(self) -> BTreeMap<u8, String> {
        self.0
    }

    /// The bare line for a level; empty for unknown levels.
    pub fn rule(&self, level: u8) -> &str {
        self.0.get(&level).map(String::as_str).unwrap_or("")
    }

    /// Overlay `message` onto the line for `level`.
    ///
    /// The first five characters of the line are kept, the message follows
    /// between single spaces, and the rest of the line pads the result to the
    /// line's length. Long messages are never truncated.
    pub fn header(&self, level: u8, message: &str) -> String {
        let line = self.rule(level);
        let mut result: String = line.chars().take(SHIFT).collect();
        result.push(' ');
        result.push_str(message);
        result.push(' ');

        let used = result.chars().count();
        if used < line.chars().count() {
            result.extend(line.chars().skip(used));
        }
        result
    }
}
