//! Built-in `:alias:` emoji table.

/// What an alias stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// A Unicode emoji
    Unicode(&'static str),
    /// A custom emoji drawn from an image URL
    Image(&'static str),
}

// Sorted by alias for binary search.
static EMOJI: &[(&str, Glyph)] = &[
    ("+1", Glyph::Unicode("👍")),
    ("-1", Glyph::Unicode("👎")),
    ("bug", Glyph::Unicode("🐛")),
    ("bulb", Glyph::Unicode("💡")),
    ("check", Glyph::Unicode("✔️")),
    ("clap", Glyph::Unicode("👏")),
    ("coffee", Glyph::Unicode("☕")),
    ("construction", Glyph::Unicode("🚧")),
    ("crab", Glyph::Unicode("🦀")),
    ("eyes", Glyph::Unicode("👀")),
    ("fire", Glyph::Unicode("🔥")),
    ("heart", Glyph::Unicode("❤️")),
    ("hourglass", Glyph::Unicode("⌛")),
    ("joy", Glyph::Unicode("😂")),
    ("memo", Glyph::Unicode("📝")),
    ("octocat", Glyph::Image("https://github.githubassets.com/images/icons/emoji/octocat.png")),
    ("ok_hand", Glyph::Unicode("👌")),
    ("rocket", Glyph::Unicode("🚀")),
    ("shipit", Glyph::Image("https://github.githubassets.com/images/icons/emoji/shipit.png")),
    ("smile", Glyph::Unicode("😄")),
    ("sparkles", Glyph::Unicode("✨")),
    ("star", Glyph::Unicode("⭐")),
    ("tada", Glyph::Unicode("🎉")),
    ("thinking", Glyph::Unicode("🤔")),
    ("thumbsdown", Glyph::Unicode("👎")),
    ("thumbsup", Glyph::Unicode("👍")),
    ("warning", Glyph::Unicode("⚠️")),
    ("wave", Glyph::Unicode("👋")),
    ("white_check_mark", Glyph::Unicode("✅")),
    ("x", Glyph::Unicode("❌")),
    ("zap", Glyph::Unicode("⚡")),
];

/// Look up an alias given without its colons.
pub fn lookup(alias: &str) -> Option<Glyph> {
    EMOJI
        .binary_search_by(|(name, _)| (*name).cmp(alias))
        .ok()
        .map(|i| EMOJI[i].1)
}

/// Characters allowed between the colons.
pub fn is_alias_char(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit() || matches!(b, b'_' | b'+' | b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(EMOJI.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn lookup_known_and_unknown() {
        assert_eq!(lookup("crab"), Some(Glyph::Unicode("🦀")));
        assert!(matches!(lookup("octocat"), Some(Glyph::Image(_))));
        assert_eq!(lookup("not_an_emoji"), None);
    }
}
