//! Node types for `StaticBPTree`.
//!
//! Nodes live in the tree's arena and refer to each other by [`NodeId`].
//! Leaves are allocated first, left to right, so the leaf chain is also the
//! arena prefix.
//!
//! # Routing Model
//!
//! ```text
//!         [K0 | K1 | K2]           <- Internal node (3 keys, 4 children)
//!        /    |    |    \
//!    C0     C1    C2     C3        <- Children
//!
//!    C0: keys < K0
//!    C1: keys >= K0 and < K1
//!    C2: keys >= K1 and < K2
//!    C3: keys >= K2
//! ```
//!
//! `Ki` is the `min_key` of child `i + 1`.

use crate::ksearch::{find_exact, lower_bound, upper_bound};

/// Index of a node in the tree arena.
pub type NodeId = usize;

// ============================================================================
//  InternalNode
// ============================================================================

/// Routing node: split keys and child handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalNode {
    /// Smallest key in this subtree.
    pub min_key: u64,
    /// `split_keys[i]` is the `min_key` of `children[i + 1]`.
    pub split_keys: Vec<u64>,
    /// Child handles, in key order.
    pub children: Vec<NodeId>,
}

impl InternalNode {
    /// Child to descend into for `key`.
    ///
    /// Picks the first split key strictly greater than `key`, clamped to the
    /// last child.
    #[must_use]
    #[inline(always)]
    pub fn route(&self, key: u64) -> NodeId {
        let idx = upper_bound(&self.split_keys, key).min(self.children.len() - 1);
        self.children[idx]
    }

    /// Child that holds the first entry `>= key`, or its left neighbour.
    #[must_use]
    #[inline]
    pub fn route_lower(&self, key: u64) -> NodeId {
        let idx = lower_bound(&self.split_keys, key).min(self.children.len() - 1);
        self.children[idx]
    }
}

// ============================================================================
//  LeafNode
// ============================================================================

/// Data node: keys with their positions in the original array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafNode {
    /// Smallest key in this leaf (its first key).
    pub min_key: u64,
    /// Keys, in array order.
    pub keys: Vec<u64>,
    /// `positions[i]` is the array index of `keys[i]`.
    pub positions: Vec<usize>,
    /// Next leaf to the right, if any.
    pub next: Option<NodeId>,
}

impl LeafNode {
    /// Builds a leaf over `keys`, whose first element sits at array index `start`.
    ///
    /// `keys` must be non-empty.
    #[must_use]
    pub fn from_run(keys: &[u64], start: usize) -> Self {
        Self {
            min_key: keys[0],
            keys: keys.to_vec(),
            positions: (start..start + keys.len()).collect(),
            next: None,
        }
    }

    /// Number of entries.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.keys.len()
    }

    /// True if the leaf holds no entries.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Array position of `key`, if present in this leaf.
    #[must_use]
    #[inline(always)]
    pub fn find(&self, key: u64) -> Option<usize> {
        find_exact(&self.keys, key).map(|i| self.positions[i])
    }
}

// ============================================================================
//  Node
// ============================================================================

/// A tree node: either routing or data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Routing node.
    Internal(InternalNode),
    /// Data node.
    Leaf(LeafNode),
}

impl Node {
    /// Smallest key in this node's subtree.
    #[must_use]
    #[inline]
    pub const fn min_key(&self) -> u64 {
        match self {
            Self::Internal(node) => node.min_key,
            Self::Leaf(leaf) => leaf.min_key,
        }
    }

    /// True for leaf nodes.
    #[must_use]
    #[inline]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// The leaf payload, if this is a leaf.
    #[must_use]
    #[inline]
    pub const fn as_leaf(&self) -> Option<&LeafNode> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Internal(_) => None,
        }
    }

    /// The internal payload, if this is an internal node.
    #[must_use]
    #[inline]
    pub const fn as_internal(&self) -> Option<&InternalNode> {
        match self {
            Self::Internal(node) => Some(node),
            Self::Leaf(_) => None,
        }
    }
}
