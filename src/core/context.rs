// File: src/core/context.rs
use crate::core::trie::{Model, NodeId};
use crate::core::types::SymbolId;

/// The sliding window of trie positions used by learning, generation, and
/// scoring. Slot 0 is pinned to the active root; slot `d` holds the node
/// reached by the last `d` observed symbols, or None once the path runs
/// out. The window is transient per pass and holds `order + 2` slots.
pub struct Context {
    slots: Vec<Option<NodeId>>,
}

impl Context {
    pub fn new(order: usize) -> Self {
        Self {
            slots: vec![None; order + 2],
        }
    }

    /// Clears every slot and pins slot 0 to `root`.
    pub fn reset(&mut self, root: NodeId) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.slots[0] = Some(root);
    }

    /// Read-only advance by one symbol. Slot `d` is reassigned only while
    /// slot `d - 1` is live, deepest first.
    pub fn walk(&mut self, model: &Model, symbol: SymbolId) {
        for d in (1..self.slots.len()).rev() {
            if let Some(parent) = self.slots[d - 1] {
                self.slots[d] = model.child_of(parent, symbol);
            }
        }
    }

    /// Learning advance: same cascade as `walk`, but upserting and counting
    /// each step.
    pub fn observe(&mut self, model: &mut Model, symbol: SymbolId) {
        for d in (1..self.slots.len()).rev() {
            if let Some(parent) = self.slots[d - 1] {
                self.slots[d] = Some(model.observe(parent, symbol));
            }
        }
    }

    /// Deepest live node among slots 0..=order. The deepest slot of all is
    /// written by the cascades but never read here.
    pub fn deepest(&self) -> Option<NodeId> {
        self.slots[..self.slots.len() - 1]
            .iter()
            .rev()
            .find_map(|&slot| slot)
    }

    pub fn slot(&self, d: usize) -> Option<NodeId> {
        self.slots[d]
    }
}
