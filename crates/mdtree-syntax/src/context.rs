//! Per-parse state threaded through the block parser.
//!
//! The block parser descends recursively into containers (lists, list items,
//! blockquotes). Each descent may raise the indentation a line needs before
//! it belongs to the container. [`ParseContext::enter`] hands out an
//! [`IndentScope`] guard; when the guard goes out of scope the previous
//! requirement is restored, so returning to a shallower container can never
//! keep a deeper container's indent.
//!
//! ```
//! use mdtree_syntax::context::ParseContext;
//!
//! let mut ctx = ParseContext::default();
//! {
//!     let scope = ctx.enter(2);
//!     assert_eq!(scope.indent(), 2);
//! }
//! assert_eq!(ctx.indent(), 0);
//! ```

use std::ops::{Deref, DerefMut};

use crate::options::ParseOptions;
use crate::tree::NodeId;

/// Mutable state owned by exactly one parse.
#[derive(Debug, Default)]
pub struct ParseContext {
    /// Columns of indentation a line needs to belong to the innermost
    /// container
    indent: usize,
    /// Most recently created block node
    current: Option<NodeId>,
    options: ParseOptions,
}

impl ParseContext {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            indent: 0,
            current: None,
            options,
        }
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    pub fn set_current(&mut self, id: NodeId) {
        self.current = Some(id);
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Require `indent` columns until the returned scope is dropped.
    pub fn enter(&mut self, indent: usize) -> IndentScope<'_> {
        let saved = std::mem::replace(&mut self.indent, indent);
        log::trace!("indent {saved} -> {indent}");
        IndentScope { ctx: self, saved }
    }
}

/// Guard restoring the previous indent requirement on drop.
///
/// Derefs to the [`ParseContext`] so nested parsing goes through the scope.
#[must_use = "dropping the scope immediately restores the previous indent"]
pub struct IndentScope<'c> {
    ctx: &'c mut ParseContext,
    saved: usize,
}

impl Deref for IndentScope<'_> {
    type Target = ParseContext;

    fn deref(&self) -> &ParseContext {
        self.ctx
    }
}

impl DerefMut for IndentScope<'_> {
    fn deref_mut(&mut self) -> &mut ParseContext {
        self.ctx
    }
}

impl Drop for IndentScope<'_> {
    fn drop(&mut self) {
        self.ctx.indent = self.saved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_restores_indent() {
        let mut ctx = ParseContext::default();
        {
            let _scope = ctx.enter(4);
        }
        assert_eq!(ctx.indent(), 0);
    }

    #[test]
    fn nested_scopes_unwind_in_order() {
        let mut ctx = ParseContext::default();
        {
            let mut outer = ctx.enter(2);
            {
                let inner = outer.enter(6);
                assert_eq!(inner.indent(), 6);
            }
            assert_eq!(outer.indent(), 2);
        }
        assert_eq!(ctx.indent(), 0);
    }

    #[test]
    fn current_survives_scope_exit() {
        let mut tree = crate::tree::Tree::new();
        let root = tree.root();
        let para = tree.push(root, crate::node::NodeKind::Paragraph, "");

        let mut ctx = ParseContext::default();
        {
            let mut scope = ctx.enter(2);
            scope.set_current(para);
        }
        assert_eq!(ctx.current(), Some(para));
    }
}
