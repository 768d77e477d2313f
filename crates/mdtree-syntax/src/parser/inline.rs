//! # Inline Pass
//!
//! Turns the raw text of paragraphs, headings and table cells into inline
//! nodes. Constructs are tried in a fixed precedence at each delimiter byte:
//!
//! | Byte | Construct |
//! |------|-----------|
//! | `\`  | escape or hard break |
//! | `` ` `` | code span (raw zone: nothing inside is parsed) |
//! | `$`  | inline math |
//! | `*` `_` | strong, then emphasis |
//! | `~`  | strikethrough |
//! | `!`  | image |
//! | `[`  | link |
//! | `<`  | autolink or inline HTML |
//! | `:`  | emoji |
//! | `\n` | hard or soft break |
//!
//! Anything that fails to close is kept as text, so every input produces a
//! tree. Delimited constructs keep their delimiters as marker children:
//!
//! ```text
//! *em*  →  Emphasis
//!          ├─ EmAsteriskOpenMarker "*"
//!          ├─ Text "em"
//!          └─ EmAsteriskCloseMarker "*"
//! ```

use crate::node::{LinkData, NodeData, NodeKind};
use crate::options::ParseOptions;
use crate::tree::{NodeId, Tree};

use super::cursor::Cursor;
use super::emoji::{self, Glyph};

/// Run the inline pass over every inline-bearing block of `tree`.
pub fn parse_inlines(tree: &mut Tree, options: &ParseOptions) {
    let targets: Vec<NodeId> = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| tree.kind(id).has_inline_content())
        .collect();

    let mut parser = InlineParser {
        tree,
        options: *options,
    };
    for id in targets {
        let text = parser.tree.take_content(id);
        parser.parse(id, &text);
    }
}

struct InlineParser<'t> {
    tree: &'t mut Tree,
    options: ParseOptions,
}

impl InlineParser<'_> {
    /// Parse `s` and append the resulting nodes to `parent`.
    fn parse(&mut self, parent: NodeId, s: &str) {
        let mut cur = Cursor::new(s);
        let mut text = String::new();

        while let Some(b) = cur.peek() {
            let handled = match b {
                b'\\' => self.escape(&mut cur, parent, &mut text),
                b'`' => self.code_span(&mut cur, parent, &mut text),
                b'$' if self.options.math => self.inline_math(&mut cur, parent, &mut text),
                b'*' | b'_' => self.emphasis(&mut cur, parent, &mut text, b),
                b'~' if self.options.gfm_strikethrough => {
                    self.strikethrough(&mut cur, parent, &mut text)
                }
                b'!' if cur.peek_at(1) == Some(b'[') => {
                    self.link(&mut cur, parent, &mut text, NodeKind::Image)
                }
                b'[' => self.link(&mut cur, parent, &mut text, NodeKind::Link),
                b'<' => self.angle(&mut cur, parent, &mut text),
                b':' if self.options.emoji => self.emoji(&mut cur, parent, &mut text),
                b'\n' => {
                    self.line_break(&mut cur, parent, &mut text);
                    true
                }
                _ => false,
            };
            if !handled {
                if let Some(c) = cur.bump_char() {
                    text.push(c);
                }
            }
        }

        self.flush(parent, &mut text);
    }

    fn flush(&mut self, parent: NodeId, text: &mut String) {
        if !text.is_empty() {
            self.tree.push(parent, NodeKind::Text, std::mem::take(text));
        }
    }

    /// Flush pending text, then append a node.
    fn node(
        &mut self,
        parent: NodeId,
        text: &mut String,
        kind: NodeKind,
        content: impl Into<String>,
    ) -> NodeId {
        self.flush(parent, text);
        self.tree.push(parent, kind, content)
    }

    fn escape(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) -> bool {
        match cur.peek_at(1) {
            Some(b'\n') => {
                cur.bump_n(2);
                self.node(parent, text, NodeKind::HardBreak, "");
                true
            }
            Some(b) if b.is_ascii_punctuation() => {
                cur.bump_n(2);
                text.push(b as char);
                true
            }
            _ => false,
        }
    }

    fn line_break(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) {
        cur.bump_n(1);
        let kind = if text.ends_with("  ") {
            NodeKind::HardBreak
        } else {
            NodeKind::SoftBreak
        };
        let trimmed = text.trim_end_matches(' ').len();
        text.truncate(trimmed);
        self.node(parent, text, kind, "");
    }

    fn code_span(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) -> bool {
        let n = cur.run_len(b'`');
        let open_end = cur.i + n;
        let Some(close) = find_backtick_run(cur.s, open_end, n) else {
            // Unmatched run stays literal as a whole
            text.push_str(&cur.s[cur.i..open_end]);
            cur.bump_n(n);
            return true;
        };

        let raw = cur.s[open_end..close].replace('\n', " ");
        let inner = match raw.strip_prefix(' ').and_then(|r| r.strip_suffix(' ')) {
            Some(stripped) if !raw.trim().is_empty() => stripped.to_string(),
            _ => raw,
        };
        self.node(parent, text, NodeKind::CodeSpan, inner);
        cur.i = close + n;
        true
    }

    fn inline_math(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) -> bool {
        let start = cur.i + 1;
        let opens = cur
            .s
            .get(start..)
            .and_then(|r| r.chars().next())
            .is_some_and(|c| !c.is_whitespace() && c != '$');
        if !opens {
            return false;
        }

        let bytes = cur.s.as_bytes();
        let mut j = start;
        while j < bytes.len() {
            match bytes[j] {
                b'\\' => j += 2,
                b'$' if !cur.s[..j].ends_with(char::is_whitespace) => break,
                _ => j += 1,
            }
        }
        if j >= bytes.len() {
            return false;
        }

        let content = &cur.s[start..j];
        let math = self.node(parent, text, NodeKind::InlineMath, content);
        self.tree.push(math, NodeKind::InlineMathOpenMarker, "$");
        self.tree.push(math, NodeKind::InlineMathContent, content);
        self.tree.push(math, NodeKind::InlineMathCloseMarker, "$");
        cur.i = j + 1;
        true
    }

    fn emphasis(
        &mut self,
        cur: &mut Cursor<'_>,
        parent: NodeId,
        text: &mut String,
        delim: u8,
    ) -> bool {
        let run = cur.run_len(delim);
        let intraword = delim == b'_' && cur.prev_char().is_some_and(char::is_alphanumeric);

        if !intraword {
            for width in [2, 1] {
                if run < width || !opens_at(cur.s, cur.i + width) {
                    continue;
                }
                let Some(close) = find_closer(cur.s, cur.i + width, delim, width) else {
                    continue;
                };
                let (kind, open, close_marker) = emphasis_kinds(delim, width);
                let node = self.node(parent, text, kind, "");
                let marker = &cur.s[cur.i..cur.i + width];
                self.tree.push(node, open, marker);
                self.parse(node, &cur.s[cur.i + width..close]);
                self.tree.push(node, close_marker, marker);
                cur.i = close + width;
                return true;
            }
        }

        text.push_str(&cur.s[cur.i..cur.i + run]);
        cur.bump_n(run);
        true
    }

    fn strikethrough(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) -> bool {
        let run = cur.run_len(b'~');
        let close = (run <= 2 && opens_at(cur.s, cur.i + run))
            .then(|| find_closer(cur.s, cur.i + run, b'~', run))
            .flatten();
        let Some(close) = close else {
            text.push_str(&cur.s[cur.i..cur.i + run]);
            cur.bump_n(run);
            return true;
        };

        let (open, close_marker) = if run == 1 {
            (
                NodeKind::Strikethrough1OpenMarker,
                NodeKind::Strikethrough1CloseMarker,
            )
        } else {
            (
                NodeKind::Strikethrough2OpenMarker,
                NodeKind::Strikethrough2CloseMarker,
            )
        };
        let marker = &cur.s[cur.i..cur.i + run];
        let node = self.node(parent, text, NodeKind::Strikethrough, "");
        self.tree.push(node, open, marker);
        self.parse(node, &cur.s[cur.i + run..close]);
        self.tree.push(node, close_marker, marker);
        cur.i = close + run;
        true
    }

    /// `[label](dest "title")`, or an image when `kind` is [`NodeKind::Image`].
    fn link(
        &mut self,
        cur: &mut Cursor<'_>,
        parent: NodeId,
        text: &mut String,
        kind: NodeKind,
    ) -> bool {
        let open = if kind == NodeKind::Image { 2 } else { 1 };
        let label_start = cur.i + open;
        let Some(label_end) = find_label_end(cur.s, label_start) else {
            return false;
        };
        let Some((link, end)) = parse_destination(cur.s, label_end + 1) else {
            return false;
        };

        self.flush(parent, text);
        let id = self
            .tree
            .alloc_with(kind, link.destination.clone(), NodeData::Link(link));
        self.tree.append_child(parent, id);
        self.parse(id, &cur.s[label_start..label_end]);
        cur.i = end;
        true
    }

    /// `<scheme:...>` autolinks and `<tag ...>` inline HTML.
    fn angle(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) -> bool {
        let rest = &cur.s[cur.i + 1..];
        let Some(close) = rest.find('>') else {
            return false;
        };
        let inner = &rest[..close];

        if is_autolink(inner) {
            self.flush(parent, text);
            let link = LinkData {
                destination: inner.to_string(),
                title: None,
            };
            let id = self.tree.alloc_with(NodeKind::Link, inner, NodeData::Link(link));
            self.tree.append_child(parent, id);
            self.tree.push(id, NodeKind::Text, inner);
            cur.bump_n(close + 2);
            return true;
        }

        let tag = inner.trim_start_matches('/');
        let html = inner.starts_with('!')
            || inner.starts_with('?')
            || tag.starts_with(|c: char| c.is_ascii_alphabetic());
        if !html {
            return false;
        }
        let raw = &cur.s[cur.i..cur.i + close + 2];
        self.node(parent, text, NodeKind::InlineHtml, raw);
        cur.bump_n(close + 2);
        true
    }

    fn emoji(&mut self, cur: &mut Cursor<'_>, parent: NodeId, text: &mut String) -> bool {
        let bytes = cur.s.as_bytes();
        let start = cur.i + 1;
        let len = bytes[start..]
            .iter()
            .take_while(|&&b| emoji::is_alias_char(b))
            .count();
        if len == 0 || bytes.get(start + len) != Some(&b':') {
            return false;
        }
        let alias = &cur.s[start..start + len];
        let Some(glyph) = emoji::lookup(alias) else {
            return false;
        };

        let node = self.node(parent, text, NodeKind::Emoji, alias);
        match glyph {
            Glyph::Unicode(ch) => self.tree.push(node, NodeKind::EmojiUnicode, ch),
            Glyph::Image(url) => self.tree.push(node, NodeKind::EmojiImg, url),
        };
        self.tree
            .push(node, NodeKind::EmojiAlias, &cur.s[cur.i..start + len + 1]);
        cur.i = start + len + 1;
        true
    }
}

fn emphasis_kinds(delim: u8, width: usize) -> (NodeKind, NodeKind, NodeKind) {
    match (delim, width) {
        (b'*', 2) => (
            NodeKind::Strong,
            NodeKind::StrongAsteriskOpenMarker,
            NodeKind::StrongAsteriskCloseMarker,
        ),
        (_, 2) => (
            NodeKind::Strong,
            NodeKind::StrongUnderscoreOpenMarker,
            NodeKind::StrongUnderscoreCloseMarker,
        ),
        (b'*', _) => (
            NodeKind::Emphasis,
            NodeKind::EmAsteriskOpenMarker,
            NodeKind::EmAsteriskCloseMarker,
        ),
        _ => (
            NodeKind::Emphasis,
            NodeKind::EmUnderscoreOpenMarker,
            NodeKind::EmUnderscoreCloseMarker,
        ),
    }
}

/// An opening delimiter must be followed by a non-whitespace character.
fn opens_at(s: &str, i: usize) -> bool {
    s.get(i..)
        .and_then(|r| r.chars().next())
        .is_some_and(|c| !c.is_whitespace())
}

/// Start of the next run of exactly `n` backticks at or after `from`.
fn find_backtick_run(s: &str, from: usize, n: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut j = from;
    while j < bytes.len() {
        if bytes[j] == b'`' {
            let m = bytes[j..].iter().take_while(|&&b| b == b'`').count();
            if m == n {
                return Some(j);
            }
            j += m;
        } else {
            j += 1;
        }
    }
    None
}

/// Skip a code span starting at `j`, returning the index after it.
fn skip_code_span(s: &str, j: usize) -> usize {
    let n = s.as_bytes()[j..].iter().take_while(|&&b| b == b'`').count();
    match find_backtick_run(s, j + n, n) {
        Some(close) => close + n,
        None => j + n,
    }
}

/// Closing run of exactly `n` `delim` bytes after non-empty content.
///
/// Escapes and code spans are skipped; runs of a different length belong to
/// nested constructs and are stepped over whole.
fn find_closer(s: &str, from: usize, delim: u8, n: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'`' => j = skip_code_span(s, j),
            b if b == delim => {
                let m = bytes[j..].iter().take_while(|&&c| c == delim).count();
                let after_ws = s[..j].ends_with(char::is_whitespace);
                let intraword = delim == b'_'
                    && s[j + m..].starts_with(|c: char| c.is_alphanumeric());
                if m == n && j > from && !after_ws && !intraword {
                    return Some(j);
                }
                j += m;
            }
            _ => j += 1,
        }
    }
    None
}

/// Index of the `]` matching the `[` just before `from`.
fn find_label_end(s: &str, from: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut j = from;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            b'`' => j = skip_code_span(s, j),
            b'[' => {
                depth += 1;
                j += 1;
            }
            b']' if depth == 0 => return Some(j),
            b']' => {
                depth -= 1;
                j += 1;
            }
            _ => j += 1,
        }
    }
    None
}

/// `(dest "title")` starting at `i`; returns the link and the index after it.
fn parse_destination(s: &str, i: usize) -> Option<(LinkData, usize)> {
    let bytes = s.as_bytes();
    if bytes.get(i) != Some(&b'(') {
        return None;
    }
    let skip_ws = |mut j: usize| {
        while bytes.get(j).is_some_and(|b| b.is_ascii_whitespace()) {
            j += 1;
        }
        j
    };

    let mut j = skip_ws(i + 1);
    let destination = if bytes.get(j) == Some(&b'<') {
        let end = j + 1 + s[j + 1..].find('>')?;
        let dest = s[j + 1..end].to_string();
        j = end + 1;
        dest
    } else {
        let start = j;
        let mut parens = 0usize;
        while let Some(&b) = bytes.get(j) {
            match b {
                b'(' => parens += 1,
                b')' if parens == 0 => break,
                b')' => parens -= 1,
                _ if b.is_ascii_whitespace() => break,
                _ => {}
            }
            j += 1;
        }
        s[start..j].to_string()
    };

    j = skip_ws(j);
    let title = match bytes.get(j) {
        Some(&q @ (b'"' | b'\'')) => {
            let end = j + 1 + s[j + 1..].find(q as char)?;
            let title = s[j + 1..end].to_string();
            j = skip_ws(end + 1);
            Some(title)
        }
        _ => None,
    };

    (bytes.get(j) == Some(&b')')).then(|| (LinkData { destination, title }, j + 1))
}

/// `scheme:rest` with a 2-32 letter scheme and no whitespace.
fn is_autolink(inner: &str) -> bool {
    let Some((scheme, rest)) = inner.split_once(':') else {
        return false;
    };
    (2..=32).contains(&scheme.len())
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        && !rest.is_empty()
        && !inner.contains(|c: char| c.is_whitespace() || c == '<')
}
