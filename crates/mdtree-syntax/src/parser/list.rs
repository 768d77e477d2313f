//! # Lists
//!
//! A list is a run of items sharing one marker: the same bullet character
//! (`-`, `*`, `+`) or, for ordered lists, the same delimiter after the
//! ordinal (`.` or `)`). A different marker ends the list; the line is left
//! for the caller, where it usually starts the next list.
//!
//! ## Item Layout
//!
//! ```text
//!   -   item text
//! ^^ ^^^
//! |  |  └ n: whitespace after the marker
//! |  └ w: marker width
//! └ base indent
//! ```
//!
//! Continuation lines must be indented by `base + w + n` columns, measured
//! on the first item. Later items reuse that requirement even when their own
//! marker is wider, so `10.` after `1.` still takes three-column continuations. When `n` is 4 or more the item text would otherwise read as an
//! indented code block, so only one column counts as the separator and the
//! requirement drops to 2.
//!
//! ## Tightness
//!
//! An item is tight when no blank line separates two of its non-blank lines.
//! The list is marked tight once all items are parsed if any item was tight.
//!
//! Ordinals are recorded but never validated or renumbered.

use log::debug;

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::lexer::{Item, ItemKind};
use crate::line::{Line, Lines};
use crate::node::{ListData, ListItemData, ListType, NodeData, NodeKind};
use crate::tree::{NodeId, Tree};

use super::block::{append, interrupts_paragraph, is_thematic_break, parse_blocks};

/// Lookahead check for a list marker at the start of `line`.
///
/// Reads at most three items past the leading whitespace, relying on every
/// line ending with a terminator item.
pub fn is_list(line: &Line<'_>) -> bool {
    // At least a marker and a terminator
    if line.len() < 2 {
        return false;
    }

    let items = line.trim_left();
    let nth = |n: usize| items.get(n).copied().unwrap_or(Item::EOF);
    let first = nth(0);
    match first.kind {
        ItemKind::Asterisk | ItemKind::Hyphen | ItemKind::Plus => nth(1).is_whitespace(),
        ItemKind::Digits if first.is_ordinal() => {
            matches!(nth(1).kind, ItemKind::Dot | ItemKind::CloseParen) && nth(2).is_whitespace()
        }
        _ => false,
    }
}

/// A list marker that may end a paragraph: a non-empty bullet item, or a
/// non-empty ordered item numbered 1.
pub fn can_interrupt_paragraph(line: &Line<'_>) -> bool {
    if !is_list(line) {
        return false;
    }
    let start = ItemStart::of(line);
    !start.content.is_blank() && (start.bullet_char.is_some() || start.number == 1)
}

/// The marker and first-line content of one list item.
#[derive(Debug, Clone)]
pub struct ItemStart<'a> {
    /// `-`, `*`, `+`, or the ordinal with its delimiter (`1.`, `3)`)
    pub marker: String,
    pub bullet_char: Option<char>,
    pub delimiter: Option<char>,
    pub number: u32,
    /// Columns before the marker
    pub indent: usize,
    /// Marker plus the whitespace after it, in columns
    pub marker_width: usize,
    /// Columns a continuation line needs to belong to the item
    pub child_indent: usize,
    /// The rest of the first line
    pub content: Line<'a>,
}

impl<'a> ItemStart<'a> {
    /// Split `line` into marker and content. `line` must satisfy [`is_list`].
    pub fn of(line: &Line<'a>) -> Self {
        let indent = line.indent().columns();
        let trimmed = line.trimmed();
        let first = trimmed.nth(0);

        let (marker, marker_items, bullet_char, delimiter, number) =
            if first.kind == ItemKind::Digits {
                let delim = trimmed.nth(1);
                (
                    format!("{}{}", first.text, delim.text),
                    2,
                    None,
                    delim.text.chars().next(),
                    first.text.parse().unwrap_or(1),
                )
            } else {
                (first.text.to_string(), 1, first.text.chars().next(), None, 1)
            };

        let w = marker.chars().count();
        let after = trimmed.skip(marker_items);
        let n = after.indent().columns();

        let (content, child_indent) = if after.first_non_whitespace().is_terminator() {
            // Empty first line
            (after.trimmed(), indent + w + 1)
        } else if n >= 4 {
            (after.indent_offset(1), 2)
        } else {
            (after.trimmed(), indent + w + n)
        };

        Self {
            marker,
            bullet_char,
            delimiter,
            number,
            indent,
            marker_width: w + n,
            child_indent,
            content,
        }
    }

    /// Same bullet character, or same ordinal delimiter.
    fn continues(&self, other: &ItemStart<'_>) -> bool {
        self.bullet_char == other.bullet_char && self.delimiter == other.delimiter
    }
}

/// Build a list starting at `line` and append it to `parent`.
///
/// Consumes the contiguous run of items sharing the first item's marker and
/// leaves the first line that ends the list (different marker, thematic
/// break, anything that is not an item) unread.
pub fn parse_list<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: Line<'a>,
) -> Result<NodeId, ParseError> {
    if !is_list(&line) {
        return Err(ParseError::NotAListStart {
            line: line.content(),
        });
    }

    let first = ItemStart::of(&line);
    let data = ListData {
        typ: if first.bullet_char.is_some() {
            ListType::Bullet
        } else {
            ListType::Ordered
        },
        bullet_char: first.bullet_char,
        bullet: first.bullet_char.is_some(),
        start: first.number,
        tight: false,
        indent_width: first.indent,
        marker: first.marker.clone(),
        marker_width: first.marker_width,
        delimiter: first.delimiter,
    };
    let list = append(tree, ctx, parent, NodeKind::List, "", NodeData::List(data));
    debug!("list {:?} at indent {}", first.marker, first.indent);

    let mut tight = false;
    let mut task = false;
    let mut start = first.clone();
    let mut scope = ctx.enter(first.child_indent);

    for index in 0.. {
        let Some(item) = parse_list_item(tree, &mut scope, lines, list, &start)? else {
            break;
        };
        if item.tight {
            tight = true;
        }
        if index == 0 {
            task = item.task;
        }

        let next = lines.next_line();
        if next.is_eof() {
            break;
        }
        if is_thematic_break(&next) {
            lines.backup_line();
            break;
        }
        if !is_list(&next) || next.indent().columns() >= 4 {
            lines.backup_line();
            break;
        }
        let candidate = ItemStart::of(&next);
        if !first.continues(&candidate) {
            lines.backup_line();
            break;
        }
        start = candidate;
    }
    drop(scope);

    if let NodeData::List(data) = tree.data_mut(list) {
        data.tight = tight;
        if task {
            data.typ = ListType::Task;
        }
    }
    Ok(list)
}

/// Result of parsing one list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedItem {
    pub id: NodeId,
    pub tight: bool,
    /// First paragraph opened with a task marker
    pub task: bool,
}

/// Parse one item whose marker was split off into `start`.
///
/// Collects the item's lines: lines indented by at least the context's
/// required indent (with that indent removed), blank lines followed by such
/// lines, and lazy paragraph continuations. The collected lines are then
/// parsed as the item's blocks. Returns `None` when `start` carries nothing
/// to build an item from.
pub fn parse_list_item<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    list: NodeId,
    start: &ItemStart<'a>,
) -> Result<Option<ParsedItem>, ParseError> {
    if start.marker.is_empty() {
        return Ok(None);
    }

    let options = *ctx.options();
    let mut first = start.content.clone();
    let mut checked = None;
    if options.gfm_task_list {
        if let Some((is_checked, rest)) = task_marker(&first) {
            checked = Some(is_checked);
            first = rest;
        }
    }

    let required = ctx.indent();
    let mut seen_content = !first.is_blank();
    let mut gathered = vec![first];
    let mut pending_blank = Vec::new();
    let mut loose = false;

    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if next.is_blank() {
            pending_blank.push(next.indent_offset(required));
            continue;
        }
        if next.indent().columns() >= required {
            if !pending_blank.is_empty() {
                if seen_content {
                    loose = true;
                }
                gathered.append(&mut pending_blank);
            }
            gathered.push(next.indent_offset(required));
            seen_content = true;
            continue;
        }
        // Any marker here starts a sibling item, numbered 1 or not
        let lazy = pending_blank.is_empty()
            && gathered.last().is_some_and(|l| !l.is_blank())
            && !is_list(&next)
            && !interrupts_paragraph(&next, &options);
        if lazy {
            gathered.push(next);
            continue;
        }
        lines.backup_line();
        break;
    }

    let tight = !loose;
    let item = append(
        tree,
        ctx,
        list,
        NodeKind::ListItem,
        "",
        NodeData::ListItem(ListItemData {
            marker: start.marker.clone(),
            tight,
        }),
    );
    parse_blocks(tree, ctx, &mut Lines::new(gathered), item)?;

    if let Some(checked) = checked {
        let marker = tree.alloc_with(
            NodeKind::TaskListItemMarker,
            "",
            NodeData::TaskListItem { checked },
        );
        match tree.first_child(item) {
            Some(para) if tree.kind(para) == NodeKind::Paragraph => {
                tree.prepend_child(para, marker)
            }
            _ => tree.prepend_child(item, marker),
        }
    }

    Ok(Some(ParsedItem {
        id: item,
        tight,
        task: checked.is_some(),
    }))
}

/// `[ ]`, `[x]` or `[X]` followed by whitespace and some text.
fn task_marker<'a>(line: &Line<'a>) -> Option<(bool, Line<'a>)> {
    if line.nth(0).kind != ItemKind::OpenBracket || line.nth(2).kind != ItemKind::CloseBracket {
        return None;
    }
    let mark = line.nth(1);
    let checked = match (mark.kind, mark.text) {
        (ItemKind::Space, " ") => false,
        (ItemKind::Text, "x" | "X") => true,
        _ => return None,
    };
    if !line.nth(3).is_indent() {
        return None;
    }
    let rest = line.skip(3).trimmed();
    (!rest.is_blank()).then_some((checked, rest))
}
