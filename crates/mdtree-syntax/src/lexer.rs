//! # Lexer - Classifying Markdown Source Into Items
//!
//! This module provides the first stage of parsing: breaking source text into
//! classified items using the [Logos] lexer generator.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## The Lossless Guarantee
//!
//! Every byte in the input appears in exactly one item. Nothing is skipped,
//! so concatenating item texts gives back the original source:
//!
//! ```
//! use mdtree_syntax::lexer::lex;
//!
//! let input = "- item\n";
//! let items = lex(input);
//!
//! let reconstructed: String = items.iter().map(|i| i.text).collect();
//! assert_eq!(input, reconstructed);
//! ```
//!
//! ## The Sentinel
//!
//! [`lex`] always terminates the stream with one [`ItemKind::Eof`] item whose
//! text is empty. The block parser relies on this: every line ends with either
//! a newline item or the sentinel, so looking a fixed number of items past the
//! first non-whitespace item never runs off the end.
//!
//! ## Why Two Item Enums?
//!
//! Logos needs its own enum for `#[derive(Logos)]`, and that enum cannot carry
//! the sentinel (it never matches input). [`Token`] is the Logos side and
//! [`ItemKind`] is what the parser sees; [`Token::to_item_kind`] converts.
//!
//! Items are kept **minimal and context-free**. The lexer doesn't know if `*`
//! starts a list, emphasis, or a thematic break - that's the parser's job.

use logos::Logos;

/// Raw tokens produced by the Logos lexer.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"")]
pub enum Token {
    /// A run of spaces
    #[regex(r" +")]
    Space,

    /// A single tab (4 columns)
    #[token("\t")]
    Tab,

    /// Line ending (LF or CRLF)
    #[regex(r"\r?\n")]
    Newline,

    #[token("*")]
    Asterisk,

    #[token("-")]
    Hyphen,

    #[token("+")]
    Plus,

    /// A run of ASCII digits (ordered list ordinals)
    #[regex(r"[0-9]+")]
    Digits,

    #[token(".")]
    Dot,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("#")]
    Hash,

    #[token(">")]
    Greater,

    #[token("<")]
    Less,

    #[token("`")]
    Backtick,

    #[token("~")]
    Tilde,

    #[token("_")]
    Underscore,

    #[token("[")]
    OpenBracket,

    #[token("]")]
    CloseBracket,

    #[token("!")]
    Bang,

    #[token("$")]
    Dollar,

    #[token("|")]
    Pipe,

    #[token(":")]
    Colon,

    #[token("\\")]
    Backslash,

    /// Plain text - anything not matched by other rules
    #[regex(r"[^ \t\r\n*+\-0-9.()#<>`~_\[\]!$|:\\]+")]
    Text,
}

/// Kinds of items in the stream handed to the block parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Space,
    Tab,
    Newline,
    Asterisk,
    Hyphen,
    Plus,
    Digits,
    Dot,
    OpenParen,
    CloseParen,
    Hash,
    Greater,
    Less,
    Backtick,
    Tilde,
    Underscore,
    OpenBracket,
    CloseBracket,
    Bang,
    Dollar,
    Pipe,
    Colon,
    Backslash,
    Text,
    /// End of input sentinel; always the last item of a stream
    Eof,
}

impl Token {
    /// Convert to ItemKind.
    pub fn to_item_kind(self) -> ItemKind {
        match self {
            Token::Space => ItemKind::Space,
            Token::Tab => ItemKind::Tab,
            Token::Newline => ItemKind::Newline,
            Token::Asterisk => ItemKind::Asterisk,
            Token::Hyphen => ItemKind::Hyphen,
            Token::Plus => ItemKind::Plus,
            Token::Digits => ItemKind::Digits,
            Token::Dot => ItemKind::Dot,
            Token::OpenParen => ItemKind::OpenParen,
            Token::CloseParen => ItemKind::CloseParen,
            Token::Hash => ItemKind::Hash,
            Token::Greater => ItemKind::Greater,
            Token::Less => ItemKind::Less,
            Token::Backtick => ItemKind::Backtick,
            Token::Tilde => ItemKind::Tilde,
            Token::Underscore => ItemKind::Underscore,
            Token::OpenBracket => ItemKind::OpenBracket,
            Token::CloseBracket => ItemKind::CloseBracket,
            Token::Bang => ItemKind::Bang,
            Token::Dollar => ItemKind::Dollar,
            Token::Pipe => ItemKind::Pipe,
            Token::Colon => ItemKind::Colon,
            Token::Backslash => ItemKind::Backslash,
            Token::Text => ItemKind::Text,
        }
    }
}

/// A classified item with its kind and text slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item<'a> {
    pub kind: ItemKind,
    pub text: &'a str,
}

impl<'a> Item<'a> {
    pub const EOF: Item<'static> = Item {
        kind: ItemKind::Eof,
        text: "",
    };

    pub fn new(kind: ItemKind, text: &'a str) -> Self {
        Self { kind, text }
    }

    /// Space, tab, line ending or the end-of-input sentinel.
    pub fn is_whitespace(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Space | ItemKind::Tab | ItemKind::Newline | ItemKind::Eof
        )
    }

    /// Horizontal whitespace only.
    pub fn is_indent(&self) -> bool {
        matches!(self.kind, ItemKind::Space | ItemKind::Tab)
    }

    /// Newline or end-of-input sentinel.
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, ItemKind::Newline | ItemKind::Eof)
    }

    /// A digit run short enough to be an ordered list ordinal.
    pub fn is_ordinal(&self) -> bool {
        self.kind == ItemKind::Digits && self.text.len() <= 9
    }
}

/// Lex the input into a sequence of items terminated by [`ItemKind::Eof`].
///
/// Guarantees that all bytes from the input appear in the output items.
pub fn lex(input: &str) -> Vec<Item<'_>> {
    let mut items = Vec::new();
    let mut lexer = Token::lexer(input);

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        let kind = match result {
            Ok(token) => token.to_item_kind(),
            // Unrecognized characters (a lone `\r`) are plain text
            Err(()) => ItemKind::Text,
        };
        items.push(Item { kind, text });
    }

    items.push(Item::EOF);
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(kind: ItemKind, text: &str) -> Item<'_> {
        Item { kind, text }
    }

    #[test]
    fn lex_empty_input() {
        assert_eq!(lex(""), vec![Item::EOF]);
    }

    #[test]
    fn lex_plain_text() {
        assert_eq!(
            lex("hello"),
            vec![item(ItemKind::Text, "hello"), Item::EOF]
        );
    }

    #[test]
    fn lex_space_runs_and_tabs() {
        assert_eq!(
            lex("  \t "),
            vec![
                item(ItemKind::Space, "  "),
                item(ItemKind::Tab, "\t"),
                item(ItemKind::Space, " "),
                Item::EOF,
            ]
        );
    }

    #[test]
    fn lex_newline_crlf() {
        assert_eq!(lex("\r\n"), vec![item(ItemKind::Newline, "\r\n"), Item::EOF]);
    }

    #[test]
    fn lex_bullet_markers() {
        assert_eq!(
            lex("- * + "),
            vec![
                item(ItemKind::Hyphen, "-"),
                item(ItemKind::Space, " "),
                item(ItemKind::Asterisk, "*"),
                item(ItemKind::Space, " "),
                item(ItemKind::Plus, "+"),
                item(ItemKind::Space, " "),
                Item::EOF,
            ]
        );
    }

    #[test]
    fn lex_ordered_marker() {
        assert_eq!(
            lex("12) x"),
            vec![
                item(ItemKind::Digits, "12"),
                item(ItemKind::CloseParen, ")"),
                item(ItemKind::Space, " "),
                item(ItemKind::Text, "x"),
                Item::EOF,
            ]
        );
    }

    #[test]
    fn lex_digits_inside_words_split() {
        assert_eq!(
            lex("v2"),
            vec![
                item(ItemKind::Text, "v"),
                item(ItemKind::Digits, "2"),
                Item::EOF,
            ]
        );
    }

    #[test]
    fn lex_lone_carriage_return_is_text() {
        let items = lex("a\rb");
        let reconstructed: String = items.iter().map(|i| i.text).collect();
        assert_eq!(reconstructed, "a\rb");
        assert!(items.iter().all(|i| i.kind != ItemKind::Newline));
    }

    #[test]
    fn ordinal_limit_is_nine_digits() {
        assert!(item(ItemKind::Digits, "123456789").is_ordinal());
        assert!(!item(ItemKind::Digits, "1234567890").is_ordinal());
        assert!(!item(ItemKind::Text, "1").is_ordinal());
    }

    #[test]
    fn all_bytes_preserved_complex() {
        let input = "## Heading\n\n> A *quote* with [link](url)\n\n1. List item\n   - Nested\n\n```rust\ncode\n```";
        let reconstructed: String = lex(input).iter().map(|i| i.text).collect();
        assert_eq!(input, reconstructed);
    }
}
