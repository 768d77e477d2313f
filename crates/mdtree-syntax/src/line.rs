//! Lines of items and the cursor the block parser reads them through.
//!
//! A [`Line`] holds the items of one source line including its terminator
//! (a newline item, or the [`ItemKind::Eof`] sentinel on the last line).
//! Containers strip their prefixes by producing new lines, so nested block
//! parsing always sees indentation relative to its container.

use crate::lexer::{Item, ItemKind};

/// Leading whitespace of a line, split into spaces and tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indent {
    pub spaces: usize,
    pub tabs: usize,
    /// Number of items making up the whitespace run
    pub items: usize,
}

impl Indent {
    /// Width in columns, a tab counting as 4.
    pub fn columns(&self) -> usize {
        self.spaces + self.tabs * 4
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    items: Vec<Item<'a>>,
}

impl<'a> Line<'a> {
    pub fn new(items: Vec<Item<'a>>) -> Self {
        Self { items }
    }

    /// The line standing for end of input.
    pub fn eof() -> Self {
        Self {
            items: vec![Item::EOF],
        }
    }

    pub fn items(&self) -> &[Item<'a>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True when nothing but the end-of-input sentinel is left.
    pub fn is_eof(&self) -> bool {
        self.items.first().is_none_or(|i| i.kind == ItemKind::Eof)
    }

    /// Whitespace only (including a line that is just a terminator).
    pub fn is_blank(&self) -> bool {
        self.items.iter().all(Item::is_whitespace)
    }

    /// Item `n` of the line, or the sentinel when out of range.
    pub fn nth(&self, n: usize) -> Item<'a> {
        self.items.get(n).copied().unwrap_or(Item::EOF)
    }

    pub fn indent(&self) -> Indent {
        let mut indent = Indent::default();
        for item in &self.items {
            match item.kind {
                ItemKind::Space => indent.spaces += item.text.len(),
                ItemKind::Tab => indent.tabs += 1,
                _ => break,
            }
            indent.items += 1;
        }
        indent
    }

    /// Items after the leading whitespace.
    pub fn trim_left(&self) -> &[Item<'a>] {
        &self.items[self.indent().items..]
    }

    /// The first item that is not horizontal whitespace.
    pub fn first_non_whitespace(&self) -> Item<'a> {
        self.trim_left().first().copied().unwrap_or(Item::EOF)
    }

    /// Drop the first `n` items.
    pub fn skip(&self, n: usize) -> Line<'a> {
        Line {
            items: self.items[n.min(self.items.len())..].to_vec(),
        }
    }

    /// Line with all leading whitespace removed.
    pub fn trimmed(&self) -> Line<'a> {
        self.skip(self.indent().items)
    }

    /// Remove up to `columns` columns of leading whitespace.
    ///
    /// Space runs are split when needed; a tab straddling the boundary is
    /// replaced by the spaces it still covers.
    pub fn indent_offset(&self, columns: usize) -> Line<'a> {
        let mut remaining = columns;
        let mut out = Vec::with_capacity(self.items.len());
        let mut iter = self.items.iter().copied().peekable();

        while remaining > 0 {
            let Some(item) = iter.peek().copied() else {
                break;
            };
            match item.kind {
                ItemKind::Space => {
                    iter.next();
                    let len = item.text.len();
                    if len <= remaining {
                        remaining -= len;
                    } else {
                        out.push(Item::new(ItemKind::Space, &item.text[remaining..]));
                        remaining = 0;
                    }
                }
                ItemKind::Tab => {
                    iter.next();
                    if remaining >= 4 {
                        remaining -= 4;
                    } else {
                        out.push(Item::new(ItemKind::Space, &SPACES[..4 - remaining]));
                        remaining = 0;
                    }
                }
                _ => break,
            }
        }

        out.extend(iter);
        Line { items: out }
    }

    /// Source text of the whole line, terminator included.
    pub fn text(&self) -> String {
        self.items.iter().map(|i| i.text).collect()
    }

    /// Source text without the line terminator.
    pub fn content(&self) -> String {
        self.items
            .iter()
            .filter(|i| !i.is_terminator())
            .map(|i| i.text)
            .collect()
    }

    /// True if the line contains an item of `kind` before its terminator.
    pub fn contains(&self, kind: ItemKind) -> bool {
        self.items.iter().any(|i| i.kind == kind)
    }
}

const SPACES: &str = "    ";

/// Group items into lines, each keeping its terminator.
///
/// The final line always ends with the sentinel; an input ending in a newline
/// therefore yields a last line consisting of the sentinel alone.
pub fn split_lines(items: Vec<Item<'_>>) -> Vec<Line<'_>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();

    for item in items {
        let kind = item.kind;
        current.push(item);
        match kind {
            ItemKind::Newline => lines.push(Line::new(std::mem::take(&mut current))),
            ItemKind::Eof => break,
            _ => {}
        }
    }

    if current.last().is_none_or(|i| i.kind != ItemKind::Eof) {
        current.push(Item::EOF);
    }
    lines.push(Line::new(current));
    lines
}

/// Sequential access to lines with one-step backtracking.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Lines<'a> {
    pub fn new(lines: Vec<Line<'a>>) -> Self {
        Self { lines, pos: 0 }
    }

    /// Take the next line; past the end this keeps returning [`Line::eof`].
    pub fn next_line(&mut self) -> Line<'a> {
        let line = self.lines.get(self.pos).cloned().unwrap_or_else(Line::eof);
        self.pos += 1;
        line
    }

    /// Look at the line after the current one without consuming anything.
    pub fn peek_line(&self) -> Option<&Line<'a>> {
        self.lines.get(self.pos)
    }

    /// Give back the line most recently returned by [`Lines::next_line`].
    pub fn backup_line(&mut self) {
        debug_assert!(self.pos > 0, "backup_line called before next_line");
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn at_end(&self) -> bool {
        self.lines.get(self.pos).is_none_or(Line::is_eof)
    }
}
