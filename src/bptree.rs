//! `StaticBPTree` - a bulk-loaded, read-only B+tree over a sorted `u64` array.
//!
//! # Construction
//!
//! ```text
//! level 2:              [root]
//!                      /      \
//! level 1:     [int 0]          [int 1]
//!             /  |  \           /     \
//! level 0: [L0]-[L1]-[L2]-...-[Lk-1]-[Lk]      <- leaves, linked left to right
//! ```
//!
//! Leaves take consecutive runs of up to `order` keys together with their
//! array positions. Each higher level groups the level below into runs of
//! `order` nodes until a single root remains. A parent's split keys are the
//! `min_key`s of all children but the first.
//!
//! If a level would end in a run of one node, the run before it gives up a
//! node, so every internal node has between 2 and `order` children.
//!
//! # Storage
//!
//! All nodes live in one arena (`Vec<Node>`) and refer to each other by index.
//! Leaves occupy the arena prefix in key order. Dropping the tree drops the
//! arena; there is no per-node teardown.
//!
//! # Concurrency
//!
//! [`bulk_load`](StaticBPTree::bulk_load) takes `&mut self`; lookups take
//! `&self` and never write, so any number of threads may search a built tree.

mod iter;
mod node;

pub use iter::LeafIter;
pub use node::{InternalNode, LeafNode, Node, NodeId};

use crate::config::{DEFAULT_ORDER, check_order};
use crate::error::{Result, validate_sorted};
use crate::index::PointIndex;

/// Advisory per-node footprint used by [`StaticBPTree::memory_usage_bytes`].
pub const NODE_BYTES_ESTIMATE: usize = 512;

/// Bulk-loaded B+tree mapping keys to their positions in the source array.
#[derive(Debug, Clone)]
pub struct StaticBPTree {
    order: usize,
    nodes: Vec<Node>,
    root: Option<NodeId>,
    leaf_count: usize,
    /// Levels from root to leaves; 0 when empty, 1 when the root is a leaf.
    height: usize,
    len: usize,
}

impl Default for StaticBPTree {
    fn default() -> Self {
        Self::empty(DEFAULT_ORDER)
    }
}

impl StaticBPTree {
    /// Creates an empty tree with the given fan-out.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidConfig`](crate::IndexError::InvalidConfig)
    /// if `order < 3`.
    pub fn new(order: usize) -> Result<Self> {
        check_order(order)?;
        Ok(Self::empty(order))
    }

    const fn empty(order: usize) -> Self {
        Self {
            order,
            nodes: Vec::new(),
            root: None,
            leaf_count: 0,
            height: 0,
            len: 0,
        }
    }

    // =========================================================================
    // Bulk Load
    // =========================================================================

    /// Builds the tree from `keys`, discarding any previous tree.
    ///
    /// An empty `keys` yields an empty tree that reports every key absent.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "debug", skip_all, fields(n = keys.len(), order = self.order))
    )]
    pub fn bulk_load(&mut self, keys: &[u64]) {
        let order = self.order;
        *self = Self::empty(order);
        if keys.is_empty() {
            return;
        }

        let leaf_count = keys.len().div_ceil(order);
        let mut nodes: Vec<Node> = Vec::with_capacity(estimated_nodes(leaf_count, order));

        // 1) Leaf layer.
        for (run, chunk) in keys.chunks(order).enumerate() {
            let mut leaf = LeafNode::from_run(chunk, run * order);
            if run + 1 < leaf_count {
                leaf.next = Some(run + 1);
            }
            nodes.push(Node::Leaf(leaf));
        }

        // 2) Internal layers, bottom-up.
        let mut level: Vec<NodeId> = (0..leaf_count).collect();
        let mut height = 1;
        while level.len() > 1 {
            let mut parents = Vec::with_capacity(level.len().div_ceil(order));
            let mut start = 0;
            for len in group_sizes(level.len(), order) {
                let children = level[start..start + len].to_vec();
                start += len;

                let split_keys = children[1..]
                    .iter()
                    .map(|&child| nodes[child].min_key())
                    .collect();
                let min_key = nodes[children[0]].min_key();

                parents.push(nodes.len());
                nodes.push(Node::Internal(InternalNode {
                    min_key,
                    split_keys,
                    children,
                }));
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(height, nodes = parents.len(), "StaticBPTree: level built");

            level = parents;
            height += 1;
        }

        self.root = Some(level[0]);
        self.nodes = nodes;
        self.leaf_count = leaf_count;
        self.height = height;
        self.len = keys.len();

        #[cfg(feature = "tracing")]
        tracing::info!(
            n = self.len,
            order,
            leaves = self.leaf_count,
            nodes = self.nodes.len(),
            height = self.height,
            "StaticBPTree: bulk loaded"
        );
    }

    /// [`bulk_load`](Self::bulk_load) after checking that `keys` is sorted.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::UnsortedKeys`](crate::IndexError::UnsortedKeys);
    /// the existing tree is left unchanged.
    pub fn bulk_load_checked(&mut self, keys: &[u64]) -> Result<()> {
        validate_sorted(keys)?;
        self.bulk_load(keys);
        Ok(())
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Array position of `key`, or `None` if absent.
    #[must_use]
    #[inline]
    pub fn search(&self, key: u64) -> Option<usize> {
        let mut id = self.root?;
        loop {
            match &self.nodes[id] {
                Node::Internal(node) => id = node.route(key),
                Node::Leaf(leaf) => return leaf.find(key),
            }
        }
    }

    /// Iterates all `(key, position)` entries in key order.
    #[must_use]
    pub fn iter(&self) -> LeafIter<'_> {
        LeafIter::new(self, self.first_leaf(), 0)
    }

    /// Iterates `(key, position)` entries starting at the first key `>= key`.
    #[must_use]
    pub fn scan_from(&self, key: u64) -> LeafIter<'_> {
        let Some(mut id) = self.root else {
            return LeafIter::new(self, None, 0);
        };
        loop {
            match &self.nodes[id] {
                Node::Internal(node) => id = node.route_lower(key),
                Node::Leaf(leaf) => {
                    let idx = crate::ksearch::lower_bound(&leaf.keys, key);
                    return LeafIter::new(self, Some(id), idx);
                }
            }
        }
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Maximum fan-out.
    #[must_use]
    #[inline]
    pub const fn order(&self) -> usize {
        self.order
    }

    /// Number of indexed keys.
    #[must_use]
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True if no keys are indexed.
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Levels from root to leaves (0 for an empty tree).
    #[must_use]
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Total nodes, internal and leaf.
    #[must_use]
    #[inline]
    pub const fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    #[must_use]
    #[inline]
    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Root handle, if built from non-empty input.
    #[must_use]
    #[inline]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// Leftmost leaf, if any.
    #[must_use]
    #[inline]
    pub const fn first_leaf(&self) -> Option<NodeId> {
        if self.leaf_count == 0 { None } else { Some(0) }
    }

    /// `node_count × NODE_BYTES_ESTIMATE`.
    #[must_use]
    pub const fn memory_usage_bytes(&self) -> usize {
        self.nodes.len() * NODE_BYTES_ESTIMATE
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Verifies the packing invariant, cached minimum keys, uniform leaf depth,
    /// and the leaf chain.
    ///
    /// # Errors
    ///
    /// Returns a description of the first violation found.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        let Some(root) = self.root else {
            if self.nodes.is_empty() && self.len == 0 && self.height == 0 {
                return Ok(());
            }
            return Err("empty tree has leftover state".to_string());
        };

        let (min_key, depth) = self.check_subtree(root, true)?;
        if depth != self.height {
            return Err(format!("height {} but leaves at depth {depth}", self.height));
        }

        let mut count = 0usize;
        let mut prev: Option<u64> = None;
        for (key, _) in self.iter() {
            if prev.is_some_and(|p| p > key) {
                return Err(format!("leaf chain out of order at entry {count}"));
            }
            if count == 0 && key != min_key {
                return Err(format!("first entry {key} but root min_key {min_key}"));
            }
            prev = Some(key);
            count += 1;
        }
        if count != self.len {
            return Err(format!("leaf chain holds {count} entries, expected {}", self.len));
        }
        Ok(())
    }

    /// Returns the subtree's true minimum key and its depth.
    fn check_subtree(&self, id: NodeId, is_root: bool) -> std::result::Result<(u64, usize), String> {
        match &self.nodes[id] {
            Node::Leaf(leaf) => {
                if leaf.is_empty() || leaf.len() > self.order {
                    return Err(format!("leaf {id} holds {} entries", leaf.len()));
                }
                if leaf.keys.len() != leaf.positions.len() {
                    return Err(format!("leaf {id} keys/positions length mismatch"));
                }
                if leaf.keys.windows(2).any(|w| w[0] > w[1]) {
                    return Err(format!("leaf {id} keys out of order"));
                }
                if leaf.min_key != leaf.keys[0] {
                    return Err(format!("leaf {id} min_key {} != {}", leaf.min_key, leaf.keys[0]));
                }
                Ok((leaf.min_key, 1))
            }
            Node::Internal(node) => {
                let fanout = node.children.len();
                if fanout < 2 || fanout > self.order {
                    let kind = if is_root { "root" } else { "internal node" };
                    return Err(format!("{kind} {id} has {fanout} children"));
                }
                if node.split_keys.len() + 1 != fanout {
                    return Err(format!("internal node {id} has {} split keys", node.split_keys.len()));
                }

                let mut depth = None;
                let mut subtree_min = u64::MAX;
                for (i, &child) in node.children.iter().enumerate() {
                    let (child_min, child_depth) = self.check_subtree(child, false)?;
                    if i > 0 && node.split_keys[i - 1] != child_min {
                        return Err(format!("internal node {id} split key {i} mismatch"));
                    }
                    if *depth.get_or_insert(child_depth) != child_depth {
                        return Err(format!("internal node {id} has uneven children"));
                    }
                    subtree_min = subtree_min.min(child_min);
                }
                if node.min_key != subtree_min {
                    return Err(format!("internal node {id} min_key {} != {subtree_min}", node.min_key));
                }
                Ok((subtree_min, depth.unwrap_or(0) + 1))
            }
        }
    }
}

/// Run lengths for grouping `count > 1` nodes into parents of fan-out `order`.
///
/// All runs are `order` long except the tail; a tail of one borrows a node
/// from the run before it.
fn group_sizes(count: usize, order: usize) -> Vec<usize> {
    let mut sizes = vec![order; count / order];
    match count % order {
        0 => {}
        1 if !sizes.is_empty() => {
            let last = sizes.len() - 1;
            sizes[last] = order - 1;
            sizes.push(2);
        }
        tail => sizes.push(tail),
    }
    sizes
}

/// Upper bound on nodes for a tree with `leaf_count` leaves.
const fn estimated_nodes(leaf_count: usize, order: usize) -> usize {
    let mut total = leaf_count;
    let mut level = leaf_count;
    while level > 1 {
        level = level.div_ceil(order);
        total += level;
    }
    total
}

impl PointIndex for StaticBPTree {
    fn name(&self) -> &'static str {
        "BPTree"
    }

    #[inline]
    fn lookup(&self, _keys: &[u64], key: u64) -> Option<usize> {
        self.search(key)
    }

    fn memory_usage_bytes(&self) -> usize {
        Self::memory_usage_bytes(self)
    }
}
