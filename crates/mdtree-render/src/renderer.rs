//! # Renderer Framework
//!
//! A renderer is a table of handlers keyed by [`NodeKind`]. The walk calls the
//! handler for each node twice, entering and exiting (see [`crate::walk`]).
//! Kinds without a handler go to the default handler, which writes nothing
//! and returns [`WalkStatus::Stop`]: a kind a renderer does not know about is
//! dropped with its whole subtree, never reported as an error.
//!
//! ```
//! use mdtree_render::{BaseRenderer, RenderContext, RenderError, WalkStatus};
//! use mdtree_syntax::{parse, NodeId, NodeKind};
//!
//! fn text(
//!     ctx: &mut RenderContext<'_>,
//!     id: NodeId,
//!     entering: bool,
//! ) -> Result<WalkStatus, RenderError> {
//!     if entering {
//!         let content = ctx.tree().content(id).to_string();
//!         ctx.write_str(&content);
//!     }
//!     Ok(WalkStatus::Continue)
//! }
//!
//! fn container(_: &mut RenderContext<'_>, _: NodeId, _: bool) -> Result<WalkStatus, RenderError> {
//!     Ok(WalkStatus::Continue)
//! }
//!
//! let tree = parse("Hello *world*\n").unwrap();
//! let mut renderer = BaseRenderer::new(&tree);
//! renderer.register(NodeKind::Document, container);
//! renderer.register(NodeKind::Paragraph, container);
//! renderer.register(NodeKind::Text, text);
//!
//! // Emphasis has no handler, so it is skipped entirely
//! assert_eq!(renderer.render().unwrap(), "Hello ");
//! ```

use std::collections::HashMap;

use log::{debug, trace};
use mdtree_syntax::{NodeId, NodeKind, Tree};

use crate::error::RenderError;
use crate::walk::{WalkStatus, walk};

/// Handler invoked for one node visit.
pub type RendererFn =
    fn(&mut RenderContext<'_>, NodeId, bool) -> Result<WalkStatus, RenderError>;

/// The tree being rendered and the output written so far.
#[derive(Debug)]
pub struct RenderContext<'t> {
    tree: &'t Tree,
    out: String,
}

impl<'t> RenderContext<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self {
            tree,
            out: String::new(),
        }
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn write_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub fn write_char(&mut self, c: char) {
        self.out.push(c);
    }

    pub fn output(&self) -> &str {
        &self.out
    }

    pub fn into_output(self) -> String {
        self.out
    }
}

/// Emits nothing and skips the subtree.
pub fn render_default(
    _ctx: &mut RenderContext<'_>,
    _id: NodeId,
    _entering: bool,
) -> Result<WalkStatus, RenderError> {
    Ok(WalkStatus::Stop)
}

/// Dispatch table bound to one tree and one output buffer.
///
/// Single use: [`BaseRenderer::render`] consumes the renderer.
pub struct BaseRenderer<'t> {
    ctx: RenderContext<'t>,
    handlers: HashMap<NodeKind, RendererFn>,
    default: RendererFn,
}

impl<'t> BaseRenderer<'t> {
    pub fn new(tree: &'t Tree) -> Self {
        Self {
            ctx: RenderContext::new(tree),
            handlers: HashMap::new(),
            default: render_default,
        }
    }

    /// Set the handler for `kind`, replacing any earlier one.
    pub fn register(&mut self, kind: NodeKind, handler: RendererFn) {
        self.handlers.insert(kind, handler);
    }

    /// Replace the fallback for unregistered kinds.
    pub fn set_default(&mut self, handler: RendererFn) {
        self.default = handler;
    }

    pub fn is_registered(&self, kind: NodeKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Walk the whole tree and return the output.
    ///
    /// On error the partial output is dropped with the renderer.
    pub fn render(self) -> Result<String, RenderError> {
        let Self {
            mut ctx,
            handlers,
            default,
        } = self;
        let tree = ctx.tree();
        debug!(
            "rendering {} nodes with {} handlers",
            tree.len(),
            handlers.len()
        );

        walk(tree, tree.root(), |id, entering| {
            let kind = tree.kind(id);
            trace!("{} {kind:?}", if entering { "enter" } else { "exit" });
            let handler = handlers.get(&kind).copied().unwrap_or(default);
            handler(&mut ctx, id, entering)
        })?;

        Ok(ctx.into_output())
    }
}

/// A complete output format.
pub trait Renderer {
    fn render(self) -> Result<String, RenderError>;
}

impl Renderer for BaseRenderer<'_> {
    fn render(self) -> Result<String, RenderError> {
        BaseRenderer::render(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtree_syntax::parse;
    use pretty_assertions::assert_eq;

    fn cont(_: &mut RenderContext<'_>, _: NodeId, _: bool) -> Result<WalkStatus, RenderError> {
        Ok(WalkStatus::Continue)
    }

    fn tag(
        ctx: &mut RenderContext<'_>,
        id: NodeId,
        entering: bool,
    ) -> Result<WalkStatus, RenderError> {
        let kind = ctx.tree().kind(id);
        ctx.write_str(&format!("{}{kind:?} ", if entering { "+" } else { "-" }));
        Ok(WalkStatus::Continue)
    }

    fn fail(
        _: &mut RenderContext<'_>,
        id: NodeId,
        _: bool,
    ) -> Result<WalkStatus, RenderError> {
        Err(RenderError::Handler {
            kind: NodeKind::List,
            message: format!("node {}", id.index()),
        })
    }

    #[test]
    fn unregistered_kind_is_silently_skipped() {
        let tree = parse("- a\n\npara\n").unwrap();
        let mut renderer = BaseRenderer::new(&tree);
        renderer.register(NodeKind::Document, cont);
        renderer.register(NodeKind::Paragraph, tag);
        renderer.register(NodeKind::Text, tag);

        // The list subtree holds a paragraph but is never entered
        assert_eq!(renderer.render().unwrap(), "+Paragraph +Text -Text -Paragraph ");
    }

    #[test]
    fn empty_table_renders_nothing() {
        let tree = parse("# a\n").unwrap();
        assert_eq!(BaseRenderer::new(&tree).render().unwrap(), "");
    }

    #[test]
    fn custom_default_handler() {
        let tree = parse("a\n").unwrap();
        let mut renderer = BaseRenderer::new(&tree);
        renderer.set_default(tag);
        assert_eq!(
            renderer.render().unwrap(),
            "+Document +Paragraph +Text -Text -Paragraph -Document "
        );
    }

    #[test]
    fn handler_failure_aborts_render() {
        let tree = parse("- a\n").unwrap();
        let mut renderer = BaseRenderer::new(&tree);
        renderer.register(NodeKind::Document, cont);
        renderer.register(NodeKind::List, fail);
        renderer.register(NodeKind::ListItem, tag);

        let err = renderer.render().unwrap_err();
        assert!(matches!(err, RenderError::Handler { kind: NodeKind::List, .. }));
    }

    #[test]
    fn register_replaces_handler() {
        let tree = parse("a\n").unwrap();
        let mut renderer = BaseRenderer::new(&tree);
        renderer.register(NodeKind::Document, fail);
        renderer.register(NodeKind::Document, cont);
        assert!(renderer.is_registered(NodeKind::Document));
        assert!(!renderer.is_registered(NodeKind::Paragraph));
        assert_eq!(Renderer::render(renderer).unwrap(), "");
    }
}
