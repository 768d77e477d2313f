//! # Parser - From Lines to a Node Tree
//!
//! Parsing runs in two passes over one [`Tree`]:
//!
//! ```text
//! Source → lex → split_lines → block pass → inline pass → Tree
//!                              (block, list)  (inline)
//! ```
//!
//! ## Block Pass
//!
//! The block pass reads whole [`Line`](crate::line::Line)s through a
//! [`Lines`] cursor and builds the container structure: lists, list items,
//! blockquotes, headings, code blocks, tables and paragraphs. Containers
//! strip their prefixes and hand the remaining lines to a fresh cursor, so
//! every nested parse sees indentation relative to its container. Indent
//! requirements live in the [`ParseContext`] and are scoped with
//! [`ParseContext::enter`].
//!
//! Paragraphs, headings and table cells keep their raw text in
//! [`Node::content`](crate::tree::Node::content) at the end of this pass.
//!
//! ## Inline Pass
//!
//! The inline pass replaces that raw text with inline children: text,
//! emphasis, links, code spans, math, emoji and breaks.
//!
//! ## Leniency
//!
//! The grammar never rejects input. Unclosed constructs fall back to text,
//! unterminated fences run to the end of their container. The only error
//! is calling [`list::parse_list`] on a line that does not start a list.
//!
//! ```
//! use mdtree_syntax::{parse, NodeKind};
//!
//! let tree = parse("- a\n- b\n").unwrap();
//! let list = tree.first_child(tree.root()).unwrap();
//! assert_eq!(tree.kind(list), NodeKind::List);
//! assert_eq!(tree.children(list).count(), 2);
//! ```

pub mod block;
pub mod emoji;
pub mod inline;
pub mod list;

mod cursor;

use log::debug;

use crate::context::ParseContext;
use crate::error::ParseError;
use crate::lexer::lex;
use crate::line::{Lines, split_lines};
use crate::options::ParseOptions;
use crate::tree::Tree;

/// Parse markdown source with every extension enabled.
pub fn parse(source: &str) -> Result<Tree, ParseError> {
    parse_with_options(source, ParseOptions::default())
}

/// Parse markdown source with the given extensions.
pub fn parse_with_options(source: &str, options: ParseOptions) -> Result<Tree, ParseError> {
    let items = lex(source);
    let mut lines = Lines::new(split_lines(items));
    let mut tree = Tree::new();
    let mut ctx = ParseContext::new(options);

    let root = tree.root();
    block::parse_blocks(&mut tree, &mut ctx, &mut lines, root)?;
    debug!("block pass produced {} nodes", tree.len());

    inline::parse_inlines(&mut tree, &options);
    debug!("inline pass finished with {} nodes", tree.len());

    Ok(tree)
}
