//! Depth-first two-phase traversal.
//!
//! Every node is visited on the way in and, unless the entering visit
//! returned [`WalkStatus::Stop`], on the way out after all its children:
//!
//! ```text
//! List            enter List
//! ├─ ListItem     enter ListItem, exit ListItem
//! └─ ListItem     enter ListItem, exit ListItem
//!                 exit List
//! ```
//!
//! Frames live on a heap stack, so nesting depth is bounded by memory rather
//! than by the call stack.

use mdtree_syntax::{NodeId, Tree};

/// What the walker does after a visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkStatus {
    /// Entering: descend into the children. Exiting: move on.
    Continue,
    /// Entering: skip the children and the exit visit. Exiting: same as
    /// `Continue`.
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Enter,
    Exit,
}

/// Walk the subtree rooted at `root`, calling `visit(node, entering)`.
///
/// The first error returned by `visit` ends the walk and is returned as is.
pub fn walk<E>(
    tree: &Tree,
    root: NodeId,
    mut visit: impl FnMut(NodeId, bool) -> Result<WalkStatus, E>,
) -> Result<(), E> {
    let mut stack = vec![(root, Phase::Enter)];

    while let Some((id, phase)) = stack.pop() {
        match phase {
            Phase::Enter => {
                if visit(id, true)? == WalkStatus::Stop {
                    continue;
                }
                stack.push((id, Phase::Exit));
                let len = stack.len();
                stack.extend(tree.children(id).map(|child| (child, Phase::Enter)));
                stack[len..].reverse();
            }
            Phase::Exit => {
                visit(id, false)?;
            }
        }
    }
    Ok(())
}
