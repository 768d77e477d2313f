//! Block-level grammar rules.

use log::trace;

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::lexer::{Item, ItemKind};
use crate::line::{Line, Lines};
use crate::node::{NodeData, NodeKind};
use crate::options::ParseOptions;
use crate::tree::{NodeId, Tree};

use super::list;

/// Parse every remaining line of `lines` as blocks under `parent`.
pub fn parse_blocks<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
) -> Result<(), ParseError> {
    loop {
        let line = lines.next_line();
        if line.is_eof() {
            return Ok(());
        }
        if line.is_blank() {
            continue;
        }
        block(tree, ctx, lines, parent, line)?;
    }
}

/// Parse one block starting at `line`.
pub fn block<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: Line<'a>,
) -> Result<(), ParseError> {
    let options = *ctx.options();

    if line.indent().columns() >= 4 {
        indented_code(tree, ctx, lines, parent, line);
    } else if is_thematic_break(&line) {
        append(tree, ctx, parent, NodeKind::ThematicBreak, "", NodeData::None);
    } else if let Some(level) = atx_level(&line) {
        heading(tree, ctx, parent, &line, level);
    } else if let Some(fence) = Fence::open(&line) {
        fenced_code(tree, ctx, lines, parent, &line, fence);
    } else if options.math && is_math_fence(&line) {
        math_block(tree, ctx, lines, parent);
    } else if is_blockquote(&line) {
        blockquote(tree, ctx, lines, parent, line)?;
    } else if list::is_list(&line) {
        list::parse_list(tree, ctx, lines, parent, line)?;
    } else if is_html_start(&line) {
        html_block(tree, ctx, lines, parent, line);
    } else if let Some(header) = table_start(&line, lines, &options) {
        table(tree, ctx, lines, parent, header);
    } else {
        paragraph(tree, ctx, lines, parent, line);
    }

    Ok(())
}

/// Allocate a node under `parent` and record it as the current node.
pub(crate) fn append(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    parent: NodeId,
    kind: NodeKind,
    content: impl Into<String>,
    data: NodeData,
) -> NodeId {
    let id = tree.alloc_with(kind, content, data);
    tree.append_child(parent, id);
    ctx.set_current(id);
    trace!("{kind:?} under {:?}", tree.kind(parent));
    id
}

/// True if `line` would end a paragraph in progress.
///
/// Also decides lazy continuation: a line that does not interrupt a
/// paragraph may continue one inside a blockquote or list item.
pub fn interrupts_paragraph(line: &Line<'_>, options: &ParseOptions) -> bool {
    if line.indent().columns() >= 4 {
        return false;
    }
    is_thematic_break(line)
        || atx_level(line).is_some()
        || Fence::open(line).is_some()
        || (options.math && is_math_fence(line))
        || is_blockquote(line)
        || is_html_start(line)
        || list::can_interrupt_paragraph(line)
}

/// Three or more `-`, `*` or `_`, all the same, spaces allowed between.
pub fn is_thematic_break(line: &Line<'_>) -> bool {
    if line.indent().columns() >= 4 {
        return false;
    }
    let marker = line.first_non_whitespace().kind;
    if !matches!(
        marker,
        ItemKind::Hyphen | ItemKind::Asterisk | ItemKind::Underscore
    ) {
        return false;
    }

    let mut count = 0;
    for item in line.trim_left() {
        match item.kind {
            k if k == marker => count += 1,
            _ if item.is_whitespace() => {}
            _ => return false,
        }
    }
    count >= 3
}

/// Level of an ATX heading opener (`#` to `######` then whitespace).
fn atx_level(line: &Line<'_>) -> Option<u8> {
    let items = line.trim_left();
    let hashes = items
        .iter()
        .take_while(|i| i.kind == ItemKind::Hash)
        .count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    let after = items.get(hashes).copied().unwrap_or(Item::EOF);
    after.is_whitespace().then_some(hashes as u8)
}

fn heading(tree: &mut Tree, ctx: &mut ParseContext, parent: NodeId, line: &Line<'_>, level: u8) {
    let text = line.trimmed().skip(level as usize).content();
    let mut text = text.trim();

    // Optional closing sequence: a run of `#` preceded by whitespace
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.len() != text.len()
        && (without_hashes.is_empty() || without_hashes.ends_with([' ', '\t']))
    {
        text = without_hashes.trim_end();
    }

    append(
        tree,
        ctx,
        parent,
        NodeKind::Heading,
        text,
        NodeData::Heading { level },
    );
}

fn indented_code<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: Line<'a>,
) {
    let mut body = vec![line.indent_offset(4)];
    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if next.is_blank() || next.indent().columns() >= 4 {
            body.push(next.indent_offset(4));
        } else {
            lines.backup_line();
            break;
        }
    }
    while body.last().is_some_and(Line::is_blank) {
        body.pop();
    }

    let code: String = body.iter().map(|l| l.content() + "\n").collect();
    append(
        tree,
        ctx,
        parent,
        NodeKind::CodeBlock,
        code,
        NodeData::CodeBlock { info: None },
    );
}

/// An opening code fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    kind: ItemKind,
    len: usize,
    indent: usize,
}

impl Fence {
    /// Recognize three or more backticks or tildes.
    pub fn open(line: &Line<'_>) -> Option<Fence> {
        let indent = line.indent().columns();
        if indent >= 4 {
            return None;
        }
        let items = line.trim_left();
        let kind = items.first()?.kind;
        if !matches!(kind, ItemKind::Backtick | ItemKind::Tilde) {
            return None;
        }
        let len = items.iter().take_while(|i| i.kind == kind).count();
        if len < 3 {
            return None;
        }
        // Backtick fences cannot carry backticks in their info string
        if kind == ItemKind::Backtick && items[len..].iter().any(|i| i.kind == kind) {
            return None;
        }
        Some(Fence { kind, len, indent })
    }

    fn closes(&self, line: &Line<'_>) -> bool {
        if line.indent().columns() >= 4 {
            return false;
        }
        let items = line.trim_left();
        let len = items.iter().take_while(|i| i.kind == self.kind).count();
        len >= self.len && items[len..].iter().all(Item::is_whitespace)
    }
}

fn fenced_code<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: &Line<'a>,
    fence: Fence,
) {
    let info = line.trimmed().skip(fence.len).content();
    let info = Some(info.trim().to_string()).filter(|s| !s.is_empty());

    let mut code = String::new();
    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if fence.closes(&next) {
            break;
        }
        code.push_str(&next.indent_offset(fence.indent).content());
        code.push('\n');
    }

    append(
        tree,
        ctx,
        parent,
        NodeKind::CodeBlock,
        code,
        NodeData::CodeBlock { info },
    );
}

/// `$$` alone on a line.
fn is_math_fence(line: &Line<'_>) -> bool {
    let trimmed = line.trimmed();
    trimmed.nth(0).kind == ItemKind::Dollar
        && trimmed.nth(1).kind == ItemKind::Dollar
        && trimmed.skip(2).is_blank()
}

fn math_block(tree: &mut Tree, ctx: &mut ParseContext, lines: &mut Lines<'_>, parent: NodeId) {
    let mut body = Vec::new();
    let mut closed = false;
    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if next.indent().columns() < 4 && is_math_fence(&next) {
            closed = true;
            break;
        }
        body.push(next.content());
    }
    let content = body.join("\n");

    let block = append(tree, ctx, parent, NodeKind::MathBlock, "", NodeData::None);
    tree.push(block, NodeKind::MathBlockOpenMarker, "$$");
    tree.push(block, NodeKind::MathBlockContent, content);
    if closed {
        tree.push(block, NodeKind::MathBlockCloseMarker, "$$");
    }
}

fn is_blockquote(line: &Line<'_>) -> bool {
    line.indent().columns() < 4 && line.first_non_whitespace().kind == ItemKind::Greater
}

/// The line with its `>` and one following column of whitespace removed.
fn strip_quote_marker<'a>(line: &Line<'a>) -> Line<'a> {
    line.trimmed().skip(1).indent_offset(1)
}

fn blockquote<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: Line<'a>,
) -> Result<(), ParseError> {
    let options = *ctx.options();
    let mut inner = vec![strip_quote_marker(&line)];

    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if is_blockquote(&next) {
            inner.push(strip_quote_marker(&next));
            continue;
        }
        let lazy = !next.is_blank()
            && inner.last().is_some_and(|l| !l.is_blank())
            && !interrupts_paragraph(&next, &options);
        if lazy {
            inner.push(next);
            continue;
        }
        lines.backup_line();
        break;
    }

    let quote = append(tree, ctx, parent, NodeKind::Blockquote, "", NodeData::None);
    tree.push(quote, NodeKind::BlockquoteMarker, ">");

    let mut scope = ctx.enter(0);
    parse_blocks(tree, &mut scope, &mut Lines::new(inner), quote)
}

/// `<tag`, `</tag` or `<!` at the start of a line.
fn is_html_start(line: &Line<'_>) -> bool {
    if line.indent().columns() >= 4 {
        return false;
    }
    let trimmed = line.trimmed();
    if trimmed.nth(0).kind != ItemKind::Less {
        return false;
    }
    let next = trimmed.nth(1);
    match next.kind {
        ItemKind::Bang => true,
        ItemKind::Text => {
            let name = next.text.trim_start_matches('/').trim_end_matches('/');
            let after = trimmed.nth(2);
            name.starts_with(|c: char| c.is_ascii_alphabetic())
                && name.chars().all(|c| c.is_ascii_alphanumeric())
                && (after.is_whitespace() || after.kind == ItemKind::Greater)
        }
        _ => false,
    }
}

fn html_block<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: Line<'a>,
) {
    let mut html = line.content();
    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if next.is_blank() {
            break;
        }
        html.push('\n');
        html.push_str(&next.content());
    }
    append(tree, ctx, parent, NodeKind::HtmlBlock, html, NodeData::None);
}

/// Split a table row on unescaped pipes, dropping the outer ones.
pub(crate) fn split_row(row: &str) -> Vec<String> {
    let row = row.trim();
    let row = row.strip_prefix('|').unwrap_or(row);
    let row = match row.strip_suffix('|') {
        Some(rest) if !rest.ends_with('\\') => rest,
        _ => row,
    };

    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = row.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                cell.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(c),
        }
    }
    cells.push(cell.trim().to_string());
    cells
}

fn is_delimiter_cell(cell: &str) -> bool {
    let inner = cell.strip_prefix(':').unwrap_or(cell);
    let inner = inner.strip_suffix(':').unwrap_or(inner);
    !inner.is_empty() && inner.chars().all(|c| c == '-')
}

/// Header cells when `line` and the line after it open a table.
fn table_header(line: &Line<'_>, next: Option<&Line<'_>>) -> Option<Vec<String>> {
    let delimiter = next?;
    if !line.contains(ItemKind::Pipe) || delimiter.indent().columns() >= 4 {
        return None;
    }
    let allowed = delimiter.trim_left().iter().all(|i| {
        i.is_whitespace()
            || matches!(
                i.kind,
                ItemKind::Pipe | ItemKind::Hyphen | ItemKind::Colon
            )
    });
    if !allowed || !delimiter.contains(ItemKind::Hyphen) {
        return None;
    }

    let header = split_row(&line.content());
    let delimiters = split_row(&delimiter.content());
    (delimiters.len() == header.len() && delimiters.iter().all(|c| is_delimiter_cell(c)))
        .then_some(header)
}

fn table_start(line: &Line<'_>, lines: &Lines<'_>, options: &ParseOptions) -> Option<Vec<String>> {
    if !options.gfm_table {
        return None;
    }
    table_header(line, lines.peek_line())
}

fn table_row(tree: &mut Tree, parent: NodeId, cells: Vec<String>, width: usize) {
    let row = tree.push(parent, NodeKind::TableRow, "");
    for i in 0..width {
        let text = cells.get(i).cloned().unwrap_or_default();
        tree.push(row, NodeKind::TableCell, text);
    }
}

fn table(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'_>,
    parent: NodeId,
    header: Vec<String>,
) {
    let options = *ctx.options();
    let width = header.len();

    // Delimiter row, already validated
    lines.next_line();

    let table = append(tree, ctx, parent, NodeKind::Table, "", NodeData::None);
    let head = tree.push(table, NodeKind::TableHead, "");
    table_row(tree, head, header, width);

    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if next.is_blank() {
            break;
        }
        if interrupts_paragraph(&next, &options) {
            lines.backup_line();
            break;
        }
        table_row(tree, table, split_row(&next.content()), width);
    }
}

fn paragraph<'a>(
    tree: &mut Tree,
    ctx: &mut ParseContext,
    lines: &mut Lines<'a>,
    parent: NodeId,
    line: Line<'a>,
) {
    let options = *ctx.options();
    let mut text = vec![line.trimmed().content()];

    loop {
        let next = lines.next_line();
        if next.is_eof() {
            lines.backup_line();
            break;
        }
        if next.is_blank() {
            break;
        }
        if interrupts_paragraph(&next, &options) {
            lines.backup_line();
            break;
        }
        text.push(next.trimmed().content());
    }

    let content = text.join("\n");
    append(
        tree,
        ctx,
        parent,
        NodeKind::Paragraph,
        content.trim_end(),
        NodeData::None,
    );
}

#[cfg(test)]
mod tests {
    use crate::lexer::lex;
    use crate::line::split_lines;
    use crate::node::{NodeData, NodeKind};
    use crate::options::ParseOptions;
    use crate::parser::{parse, parse_with_options};
    use crate::tree::Tree;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn kinds(tree: &Tree) -> Vec<NodeKind> {
        tree.children(tree.root()).map(|id| tree.kind(id)).collect()
    }

    fn first_line(input: &str) -> Line<'_> {
        split_lines(lex(input)).remove(0)
    }

    #[rstest]
    #[case("---\n", true)]
    #[case("***", true)]
    #[case("_ _ _\n", true)]
    #[case(" - - -\n", true)]
    #[case("--\n", false)]
    #[case("-*-\n", false)]
    #[case("--- a\n", false)]
    #[case("    ---\n", false)]
    fn thematic_break_detection(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_thematic_break(&first_line(input)), expected);
    }

    #[rstest]
    #[case("# h\n", Some(1))]
    #[case("###### h\n", Some(6))]
    #[case("####### h\n", None)]
    #[case("#h\n", None)]
    #[case("#\n", Some(1))]
    fn atx_heading_levels(#[case] input: &str, #[case] expected: Option<u8>) {
        assert_eq!(atx_level(&first_line(input)), expected);
    }

    #[test]
    fn heading_strips_closing_sequence() {
        let tree = parse_with_options("## Title ##\n", ParseOptions::commonmark()).unwrap();
        let heading = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.data(heading), &NodeData::Heading { level: 2 });
        let text = tree.first_child(heading).unwrap();
        assert_eq!(tree.content(text), "Title");
    }

    #[test]
    fn heading_keeps_hash_inside_word() {
        let tree = parse("# C#\n").unwrap();
        let heading = tree.first_child(tree.root()).unwrap();
        let text = tree.first_child(heading).unwrap();
        assert_eq!(tree.content(text), "C#");
    }

    #[test]
    fn fenced_code_with_info() {
        let tree = parse("```rust\nfn main() {}\n```\nafter\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::CodeBlock, NodeKind::Paragraph]);
        let code = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.content(code), "fn main() {}\n");
        assert_eq!(
            tree.data(code),
            &NodeData::CodeBlock {
                info: Some("rust".to_string())
            }
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        let tree = parse("~~~\na\n\nb\n").unwrap();
        let code = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.content(code), "a\n\nb\n");
    }

    #[test]
    fn shorter_fence_does_not_close() {
        let tree = parse("````\n```\n````\n").unwrap();
        let code = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.content(code), "```\n");
    }

    #[test]
    fn indented_code_drops_trailing_blank_lines() {
        let tree = parse("    a\n\n    b\n\n\npara\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::CodeBlock, NodeKind::Paragraph]);
        let code = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.content(code), "a\n\nb\n");
    }

    #[test]
    fn indented_line_continues_paragraph() {
        let tree = parse("para\n    more\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn math_block_children() {
        let tree = parse("$$\nx^2\n$$\n").unwrap();
        let math = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(math), NodeKind::MathBlock);
        let children: Vec<_> = tree.children(math).map(|c| tree.kind(c)).collect();
        assert_eq!(
            children,
            vec![
                NodeKind::MathBlockOpenMarker,
                NodeKind::MathBlockContent,
                NodeKind::MathBlockCloseMarker,
            ]
        );
        let content = tree.children(math).nth(1).unwrap();
        assert_eq!(tree.content(content), "x^2");
    }

    #[test]
    fn blockquote_starts_with_marker() {
        let tree = parse("> quoted\n").unwrap();
        let quote = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(quote), NodeKind::Blockquote);
        let children: Vec<_> = tree.children(quote).map(|c| tree.kind(c)).collect();
        assert_eq!(children, vec![NodeKind::BlockquoteMarker, NodeKind::Paragraph]);
    }

    #[test]
    fn blockquote_lazy_continuation() {
        let tree = parse("> a\nb\n\nc\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::Blockquote, NodeKind::Paragraph]);
        let quote = tree.first_child(tree.root()).unwrap();
        let para = tree.last_child(quote).unwrap();
        assert_eq!(tree.children(para).count(), 3);
    }

    #[test]
    fn blockquote_nests_blocks() {
        let tree = parse("> # h\n> - x\n").unwrap();
        let quote = tree.first_child(tree.root()).unwrap();
        let children: Vec<_> = tree.children(quote).map(|c| tree.kind(c)).collect();
        assert_eq!(
            children,
            vec![NodeKind::BlockquoteMarker, NodeKind::Heading, NodeKind::List]
        );
    }

    #[test]
    fn html_block_runs_to_blank_line() {
        let tree = parse("<div>\n*x*\n</div>\n\ntext\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::HtmlBlock, NodeKind::Paragraph]);
        let html = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.content(html), "<div>\n*x*\n</div>");
    }

    #[test]
    fn autolink_line_is_not_html_block() {
        let tree = parse("<https://example.com>\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn table_rows_and_cells() {
        let tree = parse("| a | b |\n|---|:-:|\n| 1 | 2 |\n| 3 |\n").unwrap();
        let table = tree.first_child(tree.root()).unwrap();
        assert_eq!(tree.kind(table), NodeKind::Table);

        let parts: Vec<_> = tree.children(table).map(|c| tree.kind(c)).collect();
        assert_eq!(
            parts,
            vec![NodeKind::TableHead, NodeKind::TableRow, NodeKind::TableRow]
        );
        let last_row = tree.last_child(table).unwrap();
        assert_eq!(tree.children(last_row).count(), 2);
    }

    #[test]
    fn pipe_without_delimiter_row_is_paragraph() {
        let tree = parse("a | b\nc | d\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn split_row_handles_escapes() {
        assert_eq!(split_row("| a \\| b | c |"), vec!["a | b", "c"]);
        assert_eq!(split_row("a|b"), vec!["a", "b"]);
    }

    #[test]
    fn paragraph_interrupted_by_blocks() {
        let tree = parse("text\n# h\ntext\n> q\n").unwrap();
        assert_eq!(
            kinds(&tree),
            vec![
                NodeKind::Paragraph,
                NodeKind::Heading,
                NodeKind::Paragraph,
                NodeKind::Blockquote,
            ]
        );
    }

    #[test]
    fn paragraph_not_interrupted_by_ordered_list_from_two() {
        let tree = parse("text\n2. no\n").unwrap();
        assert_eq!(kinds(&tree), vec![NodeKind::Paragraph]);
    }

    #[test]
    fn blocks_record_current_node() {
        let mut tree = Tree::new();
        let mut ctx = ParseContext::default();
        let mut lines = Lines::new(split_lines(lex("a\n\n---\n")));
        let root = tree.root();
        parse_blocks(&mut tree, &mut ctx, &mut lines, root).unwrap();
        assert_eq!(ctx.current(), tree.last_child(root));
    }
}
