//! In-memory namespace of directories and files.
//!
//! This module provides the tree itself with its cursor, the canonical path
//! rules, a path-keyed index kept in step with every mutation, and the
//! read-only traversals (listing, search, statistics, render description).
//! It never prints; every operation returns data or a [`NamespaceError`].

mod index;
mod node;
mod path;
mod traversal;
mod tree;

pub use node::{Descriptor, EntryKind};
pub use path::SEPARATOR;
pub use traversal::{ListOrder, RenderEntry, Stats};
pub use tree::{Namespace, NamespaceError};
