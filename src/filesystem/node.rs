use std::time::SystemTime;

use derive_more::Display;
use hashlink::LinkedHashMap;

/// Handle of a node inside the namespace arena.
///
/// Handles are only meaningful for the `Namespace` that issued them. Slots of
/// deleted nodes are recycled, so a handle must not be kept across a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("#{_0}")]
pub struct NodeId(pub(crate) usize);

/// Represents the type of a namespace node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntryKind {
    #[display("Directory")]
    Directory,
    #[display("File")]
    File,
}

impl EntryKind {
    pub fn is_directory(self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    pub fn is_file(self) -> bool {
        matches!(self, EntryKind::File)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) name: String,
    pub(crate) kind: EntryKind,
    pub(crate) content: String,
    pub(crate) created_at: SystemTime,
    pub(crate) modified_at: SystemTime,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: LinkedHashMap<String, NodeId>,
}

impl Node {
    pub(crate) fn new(
        name: impl Into<String>,
        kind: EntryKind,
        content: String,
        parent: Option<NodeId>,
    ) -> Self {
        let now = SystemTime::now();
        Self {
            name: name.into(),
            kind,
            content: match kind {
                EntryKind::File => content,
                EntryKind::Directory => String::new(),
            },
            created_at: now,
            modified_at: now,
            parent,
            children: LinkedHashMap::new(),
        }
    }

    /// Byte length of the content for files, 0 for directories
    pub(crate) fn size(&self) -> u64 {
        match self.kind {
            EntryKind::File => self.content.len() as u64,
            EntryKind::Directory => 0,
        }
    }

    pub(crate) fn descriptor(&self) -> Descriptor {
        Descriptor {
            name: self.name.clone(),
            kind: self.kind,
            size: self.size(),
            created_at: self.created_at,
            modified_at: self.modified_at,
        }
    }
}

/// Read-only metadata snapshot of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
}
