use std::collections::HashSet;

use crate::dom::NodeId;

/// Set of persistently highlighted (clicked) tag elements.
///
/// Owned by the engine and lent to handlers; there is exactly one writer at a
/// time. Entries are element handles, the document owns the elements.
#[derive(Debug, Clone, Default)]
pub struct ActivationState {
    active: HashSet<NodeId>,
}

impl ActivationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `node` was not active before.
    pub fn activate(&mut self, node: NodeId) -> bool {
        self.active.insert(node)
    }

    /// Returns `true` if `node` was active before.
    pub fn deactivate(&mut self, node: NodeId) -> bool {
        self.active.remove(&node)
    }

    pub fn is_active(&self, node: NodeId) -> bool {
        self.active.contains(&node)
    }

    /// Whether every node is active. Vacuously `true` for an empty input;
    /// callers deciding category state must check for emptiness themselves.
    pub fn all_active<I>(&self, nodes: I) -> bool
    where
        I: IntoIterator<Item = NodeId>,
    {
        nodes.into_iter().all(|n| self.is_active(n))
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
