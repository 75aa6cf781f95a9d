use std::collections::HashMap;

use super::node::NodeId;

/// Path-keyed lookup table mirroring the tree.
///
/// Holds one entry per live node, keyed by its canonical absolute path. The
/// namespace updates it in the same operation as every structural mutation.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathIndex {
    entries: HashMap<String, NodeId>,
}

impl PathIndex {
    pub(crate) fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub(crate) fn get(&self, path: &str) -> Option<NodeId> {
        self.entries.get(path).copied()
    }

    /// Registers a path, returning the handle it previously pointed to
    pub(crate) fn register(&mut self, path: String, id: NodeId) -> Option<NodeId> {
        self.entries.insert(path, id)
    }

    pub(crate) fn deregister(&mut self, path: &str) -> Option<NodeId> {
        self.entries.remove(path)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &NodeId)> {
        self.entries.iter()
    }
}
