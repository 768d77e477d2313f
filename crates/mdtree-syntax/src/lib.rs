//! # mdtree-syntax
//!
//! A Markdown block parser producing an arena-backed node tree, built on a
//! [Logos] lexer.
//!
//! [Logos]: https://docs.rs/logos
//!
//! ## Architecture Overview
//!
//! The parsing pipeline has four stages:
//!
//! ```text
//! Source Text → Lexer → Items → Lines → Block pass → Inline pass → Tree
//!               (Logos)        (split)  (containers)  (spans)
//! ```
//!
//! ### 1. Lexer ([`lexer`] module)
//!
//! The lexer classifies every character of the input into small, context-free
//! items and always terminates the stream with an end-of-input sentinel.
//!
//! ```text
//! "- a\n" → [Hyphen, Space, Text("a"), Newline, Eof]
//! ```
//!
//! ### 2. Lines ([`line`] module)
//!
//! Items are grouped into [`Line`]s, each keeping its terminator. The block
//! parser reads them through a [`Lines`] cursor that supports stepping back
//! one line, which is how a list hands a line it cannot use back to its
//! caller.
//!
//! ### 3. Block pass ([`parser::block`], [`parser::list`])
//!
//! Recursive descent over lines. Containers strip their prefixes and parse
//! the remaining lines as nested blocks. The [`ParseContext`] carries the
//! indentation a line needs to stay inside the innermost container; each
//! descent scopes its requirement with [`ParseContext::enter`].
//!
//! ### 4. Inline pass ([`parser::inline`])
//!
//! The raw text of paragraphs, headings and table cells is replaced with
//! inline children.
//!
//! ## Module Structure
//!
//! ```text
//! mdtree-syntax/
//! ├── lib.rs        # This file - public API
//! ├── lexer.rs      # Logos-based item classification
//! ├── line.rs       # Line grouping and the Lines cursor
//! ├── node.rs       # NodeKind and per-kind payloads
//! ├── tree.rs       # Node arena addressed by NodeId
//! ├── context.rs    # ParseContext and the IndentScope guard
//! ├── options.rs    # ParseOptions extension toggles
//! ├── error.rs      # ParseError
//! └── parser/
//!     ├── mod.rs    # parse() entry points
//!     ├── block.rs  # Block-level grammar
//!     ├── list.rs   # List construction and the list-start predicate
//!     ├── inline.rs # Inline grammar
//!     ├── cursor.rs # Byte cursor for the inline pass
//!     └── emoji.rs  # Built-in emoji aliases
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use mdtree_syntax::{parse, NodeKind};
//!
//! let tree = parse("# Hello\n").unwrap();
//!
//! let heading = tree.first_child(tree.root()).unwrap();
//! assert_eq!(tree.kind(heading), NodeKind::Heading);
//!
//! let text = tree.first_child(heading).unwrap();
//! assert_eq!(tree.content(text), "Hello");
//! ```

pub mod context;
pub mod error;
pub mod lexer;
pub mod line;
pub mod node;
pub mod options;
pub mod parser;
pub mod tree;

pub use context::{IndentScope, ParseContext};
pub use error::ParseError;
pub use line::{Line, Lines};
pub use node::{ListData, ListItemData, ListType, LinkData, NodeData, NodeKind};
pub use options::ParseOptions;
pub use parser::{parse, parse_with_options};
pub use tree::{Node, NodeId, Tree};
