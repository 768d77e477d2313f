use serde::{Deserialize, Serialize};

/// Syntax extensions the parser recognizes beyond the core grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// `- [ ] item` task list items
    pub gfm_task_list: bool,
    /// `~~struck~~`
    pub gfm_strikethrough: bool,
    /// Pipe tables
    pub gfm_table: bool,
    /// `:alias:` emoji
    pub emoji: bool,
    /// `$inline$` and `$$` block math
    pub math: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm_task_list: true,
            gfm_strikethrough: true,
            gfm_table: true,
            emoji: true,
            math: true,
        }
    }
}

impl ParseOptions {
    /// Core grammar only.
    pub fn commonmark() -> Self {
        Self {
            gfm_task_list: false,
            gfm_strikethrough: false,
            gfm_table: false,
            emoji: false,
            math: false,
        }
    }
}
