//! Generic DOM tree and traversal stack
//!
//! Parsed documents live in an id-addressed arena owned by [`DomTree`].
//! Consumers hold plain [`NodeId`]s, which keeps every reference into the
//! tree non-owning; the tree is the single owner of all nodes. The
//! [`DomStack`] walker drives a depth-tracked pre/post-order traversal
//! over the tree, dispatching to a [`DomHandler`] with one callback per
//! node kind and direction.

mod tree;
mod walk;

pub use tree::{DomTree, ElementData, NodeId, NodeKind};
pub use walk::{DomHandler, DomStack, WalkState};
