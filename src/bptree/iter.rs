//! Leaf-chain iteration for `StaticBPTree`.
//!
//! `LeafIter` walks the leaves left to right through their `next` links,
//! yielding `(key, position)` pairs in key order. It is the sequential-scan
//! path; point lookups never use it.

use super::StaticBPTree;
use super::node::{LeafNode, NodeId};

/// Iterator over `(key, position)` entries starting at some leaf slot.
#[derive(Debug, Clone)]
pub struct LeafIter<'a> {
    tree: &'a StaticBPTree,
    leaf: Option<&'a LeafNode>,
    idx: usize,
}

impl<'a> LeafIter<'a> {
    pub(super) fn new(tree: &'a StaticBPTree, leaf: Option<NodeId>, idx: usize) -> Self {
        Self {
            tree,
            leaf: leaf.and_then(|id| tree.node(id).as_leaf()),
            idx,
        }
    }
}

impl Iterator for LeafIter<'_> {
    type Item = (u64, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.leaf?;
            if self.idx < leaf.len() {
                let item = (leaf.keys[self.idx], leaf.positions[self.idx]);
                self.idx += 1;
                return Some(item);
            }

            // Exhausted: follow the link.
            self.leaf = leaf.next.and_then(|id| self.tree.node(id).as_leaf());
            self.idx = 0;
        }
    }
}

impl std::iter::FusedIterator for LeafIter<'_> {}

impl<'a> IntoIterator for &'a StaticBPTree {
    type Item = (u64, usize);
    type IntoIter = LeafIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
