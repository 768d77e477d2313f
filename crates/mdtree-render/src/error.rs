use mdtree_syntax::NodeKind;
use thiserror::Error;

/// Failure raised by a node handler. The first one aborts the walk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("heading level {level} is outside 1-6")]
    InvalidHeadingLevel { level: u8 },

    #[error("{kind:?} node is missing its payload")]
    MissingPayload { kind: NodeKind },

    #[error("handler for {kind:?} failed: {message}")]
    Handler { kind: NodeKind, message: String },
}
