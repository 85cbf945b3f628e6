// --- File: src/core/trie.rs
use crate::core::types::{SymbolId, SYMBOL_ERROR};
use serde::{Deserialize, Serialize};

/// Index of a node in the model's arena.
pub type NodeId = usize;

/// Arena slot of the forward-trie root.
pub const FORWARD_ROOT: NodeId = 0;
/// Arena slot of the backward-trie root.
pub const BACKWARD_ROOT: NodeId = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrieNode {
    /// The symbol taken to arrive at this node. 0 for the two roots.
    pub symbol: SymbolId,
    /// Times this node was the observed next symbol given its parent's
    /// context. Saturates at u16::MAX.
    pub count: u16,
    /// Sum of children's counts: observations passing through this node
    /// when choosing a child.
    pub usage: u32,
    /// Child node IDs kept sorted by child symbol.
    children: Vec<NodeId>,
}

impl TrieNode {
    fn new(symbol: SymbolId) -> Self {
        Self {
            symbol,
            count: 0,
            usage: 0,
            children: Vec::new(),
        }
    }

    pub fn branch(&self) -> usize {
        self.children.len()
    }
}

/// The dual n-gram trie. Both trees live in one arena addressed by
/// `NodeId`; the forward and backward roots sit at fixed slots. Nodes are
/// created on first observation and never removed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Model {
    order: usize,
    nodes: Vec<TrieNode>,
}

impl Model {
    pub fn new(order: usize) -> Self {
        Self {
            order,
            nodes: vec![TrieNode::new(SYMBOL_ERROR), TrieNode::new(SYMBOL_ERROR)],
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn node(&self, id: NodeId) -> &TrieNode {
        &self.nodes[id]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Child of `id` reached by `symbol`, if observed before. O(log b).
    pub fn child_of(&self, id: NodeId, symbol: SymbolId) -> Option<NodeId> {
        let children = &self.nodes[id].children;
        children
            .binary_search_by(|&c| self.nodes[c].symbol.cmp(&symbol))
            .ok()
            .map(|pos| children[pos])
    }

    /// Returns the existing child for `symbol` or creates a fresh one with
    /// zero count and usage.
    pub fn upsert_child(&mut self, id: NodeId, symbol: SymbolId) -> NodeId {
        let search = self.nodes[id]
            .children
            .binary_search_by(|&c| self.nodes[c].symbol.cmp(&symbol));
        match search {
            Ok(pos) => self.nodes[id].children[pos],
            Err(pos) => {
                let child = self.nodes.len();
                self.nodes.push(TrieNode::new(symbol));
                self.nodes[id].children.insert(pos, child);
                child
            }
        }
    }

    /// The learning primitive: record one observation of `symbol` after the
    /// context ending at `id`. A saturated child drops both its increment
    /// and the matching parent usage increment.
    pub fn observe(&mut self, id: NodeId, symbol: SymbolId) -> NodeId {
        let child = self.upsert_child(id, symbol);
        if self.nodes[child].count < u16::MAX {
            self.nodes[child].count += 1;
            self.nodes[id].usage += 1;
        }
        child
    }

    /// Inserts a node with preset stats under `parent`, keeping children
    /// sorted. Used when importing a brain file.
    pub(crate) fn insert_node(
        &mut self,
        parent: NodeId,
        symbol: SymbolId,
        count: u16,
        usage: u32,
    ) -> NodeId {
        let child = self.upsert_child(parent, symbol);
        self.nodes[child].count = count;
        self.nodes[child].usage = usage;
        child
    }

    pub(crate) fn set_root_stats(&mut self, root: NodeId, count: u16, usage: u32) {
        self.nodes[root].count = count;
        self.nodes[root].usage = usage;
    }
}
