//! Read-only walks over the namespace: listing, search, statistics and the
//! render description.
//!
//! All of them visit siblings in the canonical order (directories first, then
//! by name), so listing, search results and rendered trees agree with each
//! other. Insertion order is only available through an explicit
//! [`ListOrder::Insertion`] listing.

use std::cmp::Ordering;

use derive_more::{Add, AddAssign};

use super::node::{Descriptor, EntryKind, Node, NodeId};
use super::path::{self, ROOT_PATH};
use super::tree::Namespace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Add, AddAssign)]
pub struct Stats {
    pub file_count: usize,
    /// Includes the root
    pub dir_count: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    /// Directories first, then by name
    #[default]
    Canonical,
    /// Order in which entries were created
    Insertion,
}

/// One line of a rendered tree, in pre-order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEntry {
    pub name: String,
    pub kind: EntryKind,
    /// 0 for the root
    pub depth: usize,
    /// Whether this is the last sibling at its level, for connector drawing
    pub is_last: bool,
    pub is_cursor: bool,
    /// Only set for files
    pub size: Option<u64>,
}

fn canonical_order(a: &Node, b: &Node) -> Ordering {
    b.kind
        .is_directory()
        .cmp(&a.kind.is_directory())
        .then_with(|| a.name.cmp(&b.name))
}

impl Namespace {
    fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut children = self
            .node(id)
            .children
            .values()
            .copied()
            .collect::<Vec<_>>();
        children.sort_by(|a, b| canonical_order(self.node(*a), self.node(*b)));
        children
    }

    pub fn list_children(&self) -> Vec<Descriptor> {
        self.list_children_in(ListOrder::Canonical)
    }

    pub fn list_children_in(&self, order: ListOrder) -> Vec<Descriptor> {
        let children = match order {
            ListOrder::Canonical => self.sorted_children(self.cursor()),
            ListOrder::Insertion => self
                .node(self.cursor())
                .children
                .values()
                .copied()
                .collect(),
        };
        children
            .into_iter()
            .map(|id| self.node(id).descriptor())
            .collect()
    }

    /// Paths of every file, anywhere in the tree, whose name contains `term`
    pub fn search(&self, term: &str) -> Vec<String> {
        let mut results = Vec::new();
        self.search_from(self.root(), ROOT_PATH, term, &mut results);
        results
    }

    fn search_from(&self, id: NodeId, dir_path: &str, term: &str, results: &mut Vec<String>) {
        for child in self.sorted_children(id) {
            let node = self.node(child);
            let child_path = path::join(dir_path, &node.name);
            match node.kind {
                EntryKind::File => {
                    if node.name.contains(term) {
                        results.push(child_path);
                    }
                }
                EntryKind::Directory => self.search_from(child, &child_path, term, results),
            }
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats_from(self.root())
    }

    fn stats_from(&self, id: NodeId) -> Stats {
        let node = self.node(id);
        match node.kind {
            EntryKind::File => Stats {
                file_count: 1,
                dir_count: 0,
                total_bytes: node.size(),
            },
            EntryKind::Directory => node.children.values().fold(
                Stats {
                    dir_count: 1,
                    ..Stats::default()
                },
                |acc, &child| acc + self.stats_from(child),
            ),
        }
    }

    pub fn render(&self) -> Vec<RenderEntry> {
        let mut entries = Vec::new();
        self.render_from(self.root(), 0, true, &mut entries);
        entries
    }

    fn render_from(&self, id: NodeId, depth: usize, is_last: bool, entries: &mut Vec<RenderEntry>) {
        let node = self.node(id);
        entries.push(RenderEntry {
            name: node.name.clone(),
            kind: node.kind,
            depth,
            is_last,
            is_cursor: id == self.cursor(),
            size: node.kind.is_file().then(|| node.size()),
        });

        let children = self.sorted_children(id);
        let count = children.len();
        for (position, child) in children.into_iter().enumerate() {
            self.render_from(child, depth + 1, position + 1 == count, entries);
        }
    }
}
