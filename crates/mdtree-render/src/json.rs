//! # JSON Tree Renderer
//!
//! Renders the tree as nested objects for tree-chart visualization:
//!
//! ```text
//! - a        [{"name":"Document","children":[
//!              {"name":"List\nul","children":[
//!                {"name":"List Item\nli -","children":[
//!                  {"name":"Paragraph\np","children":[
//!                    {"name":"Text\na"}]}]}]}]}]
//! ```
//!
//! Output is minified. Names go through [`label`], which escapes backslashes
//! and newlines and drops quotes rather than escaping them, so names are
//! display labels and not a faithful copy of the text.
//!
//! Delimiter kinds (`*`, `~~`, `$`, `>` markers) and the inner parts of math
//! and emoji nodes are never emitted and do not count as siblings when
//! deciding where commas go.

use log::debug;
use mdtree_syntax::{ListType, NodeData, NodeId, NodeKind, Tree};

use crate::error::RenderError;
use crate::renderer::{BaseRenderer, RenderContext, Renderer, RendererFn};
use crate::walk::WalkStatus;

/// Characters of a text node kept in its label.
const TEXT_SUMMARY_CHARS: usize = 4;

static HANDLERS: &[(NodeKind, RendererFn)] = &[
    (NodeKind::Document, render_document),
    (NodeKind::Paragraph, render_paragraph),
    (NodeKind::Text, render_text),
    (NodeKind::CodeSpan, render_code_span),
    (NodeKind::CodeBlock, render_code_block),
    (NodeKind::MathBlock, render_math_block),
    (NodeKind::InlineMath, render_inline_math),
    (NodeKind::Emphasis, render_emphasis),
    (NodeKind::Strong, render_strong),
    (NodeKind::Blockquote, render_blockquote),
    (NodeKind::Heading, render_heading),
    (NodeKind::ThematicBreak, render_thematic_break),
    (NodeKind::List, render_list),
    (NodeKind::ListItem, render_list_item),
    (NodeKind::TaskListItemMarker, render_task_list_item_marker),
    (NodeKind::HardBreak, render_hard_break),
    (NodeKind::SoftBreak, render_soft_break),
    (NodeKind::HtmlBlock, render_html),
    (NodeKind::InlineHtml, render_inline_html),
    (NodeKind::Link, render_link),
    (NodeKind::Image, render_image),
    (NodeKind::Strikethrough, render_strikethrough),
    (NodeKind::Table, render_table),
    (NodeKind::TableHead, render_table_head),
    (NodeKind::TableRow, render_table_row),
    (NodeKind::TableCell, render_table_cell),
    (NodeKind::Emoji, render_emoji),
    (NodeKind::EmojiUnicode, render_emoji_unicode),
    (NodeKind::EmojiImg, render_emoji_img),
];

/// Whether nodes of `kind` produce an object.
pub fn emits(kind: NodeKind) -> bool {
    HANDLERS.iter().any(|(k, _)| *k == kind)
}

/// Renderer producing the JSON tree for one document.
pub struct JsonRenderer<'t> {
    base: BaseRenderer<'t>,
}

impl<'t> JsonRenderer<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        let mut base = BaseRenderer::new(tree);
        for &(kind, handler) in HANDLERS {
            base.register(kind, handler);
        }
        Self { base }
    }
}

impl Renderer for JsonRenderer<'_> {
    fn render(self) -> Result<String, RenderError> {
        let out = self.base.render()?;
        debug!("json output {} bytes", out.len());
        Ok(out)
    }
}

/// Render `tree` with a fresh [`JsonRenderer`].
pub fn render_json(tree: &Tree) -> Result<String, RenderError> {
    JsonRenderer::new(tree).render()
}

/// Display label for a `name` value: backslash and newline escaped, quotes
/// dropped.
pub fn label(val: &str) -> String {
    val.replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace(['"', '\''], "")
}

fn next_emitted(tree: &Tree, id: NodeId) -> Option<NodeId> {
    std::iter::successors(tree.next_sibling(id), |&n| tree.next_sibling(n))
        .find(|&n| emits(tree.kind(n)))
}

fn has_emitted_child(tree: &Tree, id: NodeId) -> bool {
    tree.children(id).any(|c| emits(tree.kind(c)))
}

fn open_obj(ctx: &mut RenderContext<'_>, name: &str) {
    ctx.write_str("{\"name\":\"");
    ctx.write_str(&label(name));
    ctx.write_char('"');
}

fn close_obj(ctx: &mut RenderContext<'_>, id: NodeId) {
    ctx.write_char('}');
    if next_emitted(ctx.tree(), id).is_some() {
        ctx.write_char(',');
    }
}

fn open_children(ctx: &mut RenderContext<'_>, id: NodeId) {
    if has_emitted_child(ctx.tree(), id) {
        ctx.write_str(",\"children\":[");
    }
}

fn close_children(ctx: &mut RenderContext<'_>, id: NodeId) {
    if has_emitted_child(ctx.tree(), id) {
        ctx.write_char(']');
    }
}

/// Self-closed object; the node's children are not visited.
fn leaf(ctx: &mut RenderContext<'_>, id: NodeId, name: &str) -> Result<WalkStatus, RenderError> {
    open_obj(ctx, name);
    close_obj(ctx, id);
    Ok(WalkStatus::Stop)
}

/// Object wrapping the children of `id`.
fn container(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
    name: impl FnOnce(&Tree) -> Result<String, RenderError>,
) -> Result<WalkStatus, RenderError> {
    if entering {
        let name = name(ctx.tree())?;
        open_obj(ctx, &name);
        open_children(ctx, id);
    } else {
        close_children(ctx, id);
        close_obj(ctx, id);
    }
    Ok(WalkStatus::Continue)
}

fn fixed(name: &str) -> impl FnOnce(&Tree) -> Result<String, RenderError> + '_ {
    move |_| Ok(name.to_string())
}

fn render_document(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    if entering {
        ctx.write_char('[');
        container(ctx, id, true, fixed("Document"))
    } else {
        container(ctx, id, false, fixed("Document"))?;
        ctx.write_char(']');
        Ok(WalkStatus::Continue)
    }
}

fn render_paragraph(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, fixed("Paragraph\np"))
}

fn render_text(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    let text = ctx.tree().content(id);
    let mut summary: String = text.chars().take(TEXT_SUMMARY_CHARS).collect();
    if text.chars().nth(TEXT_SUMMARY_CHARS).is_some() {
        summary.push_str("...");
    }
    leaf(ctx, id, &format!("Text\n{summary}"))
}

fn render_code_span(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Code Span\ncode")
}

fn render_code_block(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Code Block\npre.code")
}

fn render_math_block(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Math Block\ndiv")
}

fn render_inline_math(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Inline Math\nspan")
}

fn render_emphasis(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, fixed("Emphasis\nem"))
}

fn render_strong(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, fixed("Strong\nstrong"))
}

fn render_blockquote(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, fixed("Blockquote\nblockquote"))
}

fn render_heading(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, |tree| match tree.data(id) {
        NodeData::Heading { level: level @ 1..=6 } => Ok(format!("Heading\nh{level}")),
        NodeData::Heading { level } => Err(RenderError::InvalidHeadingLevel { level: *level }),
        _ => Err(RenderError::MissingPayload {
            kind: NodeKind::Heading,
        }),
    })
}

fn render_thematic_break(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Thematic Break\nhr")
}

fn render_list(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, |tree| {
        let NodeData::List(data) = tree.data(id) else {
            return Err(RenderError::MissingPayload {
                kind: NodeKind::List,
            });
        };
        let ordered = data.typ == ListType::Ordered
            || (data.typ == ListType::Task && data.bullet_char.is_none());
        Ok(format!("List\n{}", if ordered { "ol" } else { "ul" }))
    })
}

fn render_list_item(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, |tree| match tree.data(id) {
        NodeData::ListItem(data) => Ok(format!("List Item\nli {}", data.marker)),
        _ => Err(RenderError::MissingPayload {
            kind: NodeKind::ListItem,
        }),
    })
}

fn render_task_list_item_marker(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, |tree| match tree.data(id) {
        NodeData::TaskListItem { checked } => Ok(format!(
            "Task List Item Marker\n[{}]",
            if *checked { "X" } else { " " }
        )),
        _ => Err(RenderError::MissingPayload {
            kind: NodeKind::TaskListItemMarker,
        }),
    })
}

fn render_hard_break(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Hard Break\nbr")
}

fn render_soft_break(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Soft Break\n")
}

fn render_html(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "HTML Block\n")
}

fn render_inline_html(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Inline HTML\n")
}

fn render_link(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, fixed("Link\na"))
}

fn render_image(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    entering: bool,
) -> Result<WalkStatus, RenderError> {
    container(ctx, id, entering, fixed("Image\nimg"))
}

fn render_strikethrough(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Strikethrough\ndel")
}

fn render_table(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Table\ntable")
}

fn render_table_head(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Table Head\nthead")
}

fn render_table_row(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Table Row\ntr")
}

fn render_table_cell(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    leaf(ctx, id, "Table Cell\ntd")
}

fn render_emoji(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    let name = format!("Emoji\n{}", ctx.tree().content(id));
    leaf(ctx, id, &name)
}

fn render_emoji_unicode(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    let name = format!("Emoji Unicode\n{}", ctx.tree().content(id));
    leaf(ctx, id, &name)
}

fn render_emoji_img(
    ctx: &mut RenderContext<'_>,
    id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    let name = format!("Emoji Img\n{}", ctx.tree().content(id));
    leaf(ctx, id, &name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use mdtree_syntax::{ListData, parse};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn json(input: &str) -> String {
        render_json(&parse(input).unwrap()).unwrap()
    }

    #[test]
    fn tight_bullet_list() {
        assert_eq!(
            json("- a\n- b\n"),
            r#"[{"name":"Document","children":[{"name":"List\nul","children":[{"name":"List Item\nli -","children":[{"name":"Paragraph\np","children":[{"name":"Text\na"}]}]},{"name":"List Item\nli -","children":[{"name":"Paragraph\np","children":[{"name":"Text\nb"}]}]}]}]}]"#
        );
    }

    #[test]
    fn empty_document_has_no_children_array() {
        assert_eq!(json(""), r#"[{"name":"Document"}]"#);
    }

    #[rstest]
    #[case("abcd", "abcd")]
    #[case("abcde", "abcd...")]
    #[case("héllo wörld", "héll...")]
    #[case("a", "a")]
    fn text_summary(#[case] text: &str, #[case] summary: &str) {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.push(root, NodeKind::Text, text);
        let out = render_json(&tree).unwrap();
        assert_eq!(
            out,
            format!(r#"[{{"name":"Document","children":[{{"name":"Text\n{summary}"}}]}}]"#)
        );
    }

    #[test]
    fn label_escapes_and_strips_quotes() {
        assert_eq!(label("a\\b\nc\"d'e"), r"a\\b\ncde");
    }

    #[rstest]
    #[case(1, "h1")]
    #[case(3, "h3")]
    #[case(6, "h6")]
    fn heading_levels(#[case] level: u8, #[case] tag: &str) {
        let out = json(&format!("{} x\n", "#".repeat(level as usize)));
        assert!(out.contains(&format!(r#""name":"Heading\n{tag}""#)), "{out}");
    }

    #[test]
    fn heading_level_out_of_range_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        let heading = tree.alloc_with(NodeKind::Heading, "", NodeData::Heading { level: 7 });
        tree.append_child(root, heading);
        assert_eq!(
            render_json(&tree).unwrap_err(),
            RenderError::InvalidHeadingLevel { level: 7 }
        );
    }

    #[test]
    fn list_without_payload_fails() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.push(root, NodeKind::List, "");
        assert_eq!(
            render_json(&tree).unwrap_err(),
            RenderError::MissingPayload {
                kind: NodeKind::List
            }
        );
    }

    #[test]
    fn markers_are_not_emitted_and_take_no_comma() {
        let out = json("*a* b\n");
        assert_snapshot!(out, @r#"[{"name":"Document","children":[{"name":"Paragraph\np","children":[{"name":"Emphasis\nem","children":[{"name":"Text\na"}]},{"name":"Text\n b"}]}]}]"#);
        assert!(!out.contains("Marker"));
    }

    #[test]
    fn marker_kinds_never_emit() {
        let all = [
            NodeKind::Document,
            NodeKind::Paragraph,
            NodeKind::Heading,
            NodeKind::ThematicBreak,
            NodeKind::Blockquote,
            NodeKind::BlockquoteMarker,
            NodeKind::List,
            NodeKind::ListItem,
            NodeKind::TaskListItemMarker,
            NodeKind::CodeBlock,
            NodeKind::HtmlBlock,
            NodeKind::MathBlock,
            NodeKind::MathBlockOpenMarker,
            NodeKind::MathBlockContent,
            NodeKind::MathBlockCloseMarker,
            NodeKind::Table,
            NodeKind::TableHead,
            NodeKind::TableRow,
            NodeKind::TableCell,
            NodeKind::Text,
            NodeKind::CodeSpan,
            NodeKind::Emphasis,
            NodeKind::EmAsteriskOpenMarker,
            NodeKind::EmAsteriskCloseMarker,
            NodeKind::EmUnderscoreOpenMarker,
            NodeKind::EmUnderscoreCloseMarker,
            NodeKind::Strong,
            NodeKind::StrongAsteriskOpenMarker,
            NodeKind::StrongAsteriskCloseMarker,
            NodeKind::StrongUnderscoreOpenMarker,
            NodeKind::StrongUnderscoreCloseMarker,
            NodeKind::Strikethrough,
            NodeKind::Strikethrough1OpenMarker,
            NodeKind::Strikethrough1CloseMarker,
            NodeKind::Strikethrough2OpenMarker,
            NodeKind::Strikethrough2CloseMarker,
            NodeKind::Link,
            NodeKind::Image,
            NodeKind::HardBreak,
            NodeKind::SoftBreak,
            NodeKind::InlineHtml,
            NodeKind::InlineMath,
            NodeKind::InlineMathOpenMarker,
            NodeKind::InlineMathContent,
            NodeKind::InlineMathCloseMarker,
            NodeKind::Emoji,
            NodeKind::EmojiUnicode,
            NodeKind::EmojiImg,
            NodeKind::EmojiAlias,
        ];
        let markers: Vec<_> = all.into_iter().filter(|k| k.is_marker()).collect();
        assert_eq!(markers.len(), 17);
        for kind in markers {
            assert!(!emits(kind), "{kind:?} must not be emitted");
        }
        assert!(emits(NodeKind::TaskListItemMarker));
        for kind in [
            NodeKind::MathBlockContent,
            NodeKind::InlineMathContent,
            NodeKind::EmojiAlias,
        ] {
            assert!(!emits(kind), "{kind:?} must not be emitted");
        }
    }

    #[test]
    fn blockquote_marker_skipped() {
        assert_snapshot!(json("> q\n"), @r#"[{"name":"Document","children":[{"name":"Blockquote\nblockquote","children":[{"name":"Paragraph\np","children":[{"name":"Text\nq"}]}]}]}]"#);
    }

    #[test]
    fn code_span_children_never_visited() {
        let mut tree = Tree::new();
        let root = tree.root();
        let span = tree.push(root, NodeKind::CodeSpan, "x");
        tree.push(span, NodeKind::Text, "inner");
        assert_eq!(
            render_json(&tree).unwrap(),
            r#"[{"name":"Document","children":[{"name":"Code Span\ncode"}]}]"#
        );
    }

    #[test]
    fn unregistered_trailing_sibling_takes_no_comma() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.push(root, NodeKind::ThematicBreak, "");
        tree.push(root, NodeKind::EmojiAlias, ":x:");
        assert_eq!(
            render_json(&tree).unwrap(),
            r#"[{"name":"Document","children":[{"name":"Thematic Break\nhr"}]}]"#
        );
    }

    #[rstest]
    #[case(ListType::Bullet, Some('-'), "ul")]
    #[case(ListType::Ordered, None, "ol")]
    #[case(ListType::Task, Some('*'), "ul")]
    #[case(ListType::Task, None, "ol")]
    fn list_tag(#[case] typ: ListType, #[case] bullet_char: Option<char>, #[case] tag: &str) {
        let mut tree = Tree::new();
        let root = tree.root();
        let data = ListData {
            typ,
            bullet_char,
            bullet: bullet_char.is_some(),
            start: 1,
            tight: true,
            indent_width: 0,
            marker: String::new(),
            marker_width: 2,
            delimiter: None,
        };
        let list = tree.alloc_with(NodeKind::List, "", NodeData::List(data));
        tree.append_child(root, list);
        assert_eq!(
            render_json(&tree).unwrap(),
            format!(r#"[{{"name":"Document","children":[{{"name":"List\n{tag}"}}]}}]"#)
        );
    }

    #[test]
    fn task_markers() {
        let out = json("1. [ ] a\n2. [x] b\n");
        assert!(out.starts_with(r#"[{"name":"Document","children":[{"name":"List\nol""#));
        assert!(out.contains(r#"{"name":"List Item\nli 1.","children":[{"name":"Paragraph\np","children":[{"name":"Task List Item Marker\n[ ]"},{"name":"Text\na"}]}]}"#));
        assert!(out.contains(r#"{"name":"Task List Item Marker\n[X]"},{"name":"Text\nb"}"#));
    }

    #[test]
    fn emoji_is_a_leaf() {
        assert_snapshot!(json(":crab:\n"), @r#"[{"name":"Document","children":[{"name":"Paragraph\np","children":[{"name":"Emoji\ncrab"}]}]}]"#);
    }

    #[test]
    fn output_is_valid_json() {
        let out = json("# T\n\n> *a* **b** `c` ~~d~~\n\n1. x\n2. y\n\n| h |\n|---|\n| c |\n\n$$\nm\n$$\n");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "Document");
        assert_eq!(value.as_array().map(Vec::len), Some(1));
    }
}
