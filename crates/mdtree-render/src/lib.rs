//! # mdtree-render
//!
//! Turns a parsed [`mdtree_syntax::Tree`] into output through per-kind
//! handlers.
//!
//! - [`walk`]: the two-phase depth-first traversal and [`WalkStatus`]
//! - [`renderer`]: the dispatch table ([`BaseRenderer`]) and the default
//!   handler that silently skips unknown kinds
//! - [`json`]: a complete renderer producing a JSON tree for visualization
//!
//! ```
//! use mdtree_render::render_json;
//!
//! let tree = mdtree_syntax::parse("- a\n").unwrap();
//! let json = render_json(&tree).unwrap();
//! assert!(json.starts_with(r#"[{"name":"Document""#));
//! ```

pub mod error;
pub mod json;
pub mod renderer;
pub mod walk;

pub use error::RenderError;
pub use json::{JsonRenderer, render_json};
pub use renderer::{BaseRenderer, RenderContext, Renderer, RendererFn, render_default};
pub use walk::{WalkStatus, walk};
