use std::time::SystemTime;

use snafu::{OptionExt, Snafu, ensure};
use tracing::debug;

use super::index::PathIndex;
use super::node::{Descriptor, EntryKind, Node, NodeId};
use super::path::{self, ROOT_PATH, SEPARATOR};

const PARENT_DIR: &str = "..";
const CURRENT_DIR: &str = ".";

/// In-memory tree of directories and files with a cursor for relative
/// operations.
///
/// Nodes live in an arena and refer to each other through [`NodeId`]
/// handles: a directory owns its children, a child only keeps a non-owning
/// handle to its parent. Every path is also registered in a [`PathIndex`],
/// which is updated together with the tree in each mutation.
///
/// All validation happens before the first mutation, so a failed operation
/// leaves both the tree and the index untouched.
#[derive(Debug, Clone)]
pub struct Namespace {
    nodes: Vec<Option<Node>>,
    free_slots: Vec<usize>,
    root: NodeId,
    cursor: NodeId,
    index: PathIndex,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut index = PathIndex::default();
        index.register(ROOT_PATH.to_string(), root);

        Self {
            nodes: vec![Some(Node::new(
                ROOT_PATH,
                EntryKind::Directory,
                String::new(),
                None,
            ))],
            free_slots: Vec::new(),
            root,
            cursor: root,
            index,
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn cursor(&self) -> NodeId {
        self.cursor
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        let Some(node) = self.nodes.get(id.0).and_then(Option::as_ref) else {
            unreachable!("handle {id} does not refer to a live node");
        };
        node
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        let Some(node) = self.nodes.get_mut(id.0).and_then(Option::as_mut) else {
            unreachable!("handle {id} does not refer to a live node");
        };
        node
    }

    /// Exact, case-sensitive lookup among the cursor's children
    pub(crate) fn resolve_child(&self, name: &str) -> Option<NodeId> {
        self.node(self.cursor).children.get(name).copied()
    }

    pub fn create_file(
        &mut self,
        name: &str,
        content: impl Into<String>,
    ) -> Result<(), NamespaceError> {
        self.create_entry(name, EntryKind::File, content.into())
            .map(|_| ())
    }

    pub fn create_directory(&mut self, name: &str) -> Result<(), NamespaceError> {
        self.create_entry(name, EntryKind::Directory, String::new())
            .map(|_| ())
    }

    fn create_entry(
        &mut self,
        name: &str,
        kind: EntryKind,
        content: String,
    ) -> Result<NodeId, NamespaceError> {
        validate_name(name)?;

        let entry_path = path::join(&self.current_path(), name);
        ensure!(!self.index.contains(&entry_path), AlreadyExistsSnafu { name });

        let parent = self.cursor;
        let id = self.allocate(Node::new(name, kind, content, Some(parent)));
        self.node_mut(parent).children.insert(name.to_string(), id);
        self.index.register(entry_path.clone(), id);

        debug!("Created {} '{}' as {}", kind, entry_path, id);
        Ok(id)
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        match self.free_slots.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(node);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId(self.nodes.len() - 1)
            }
        }
    }

    pub fn change_directory(&mut self, target: &str) -> Result<(), NamespaceError> {
        self.cursor = match target {
            PARENT_DIR => self
                .node(self.cursor)
                .parent
                .context(DirectoryNotFoundSnafu { name: target })?,
            ROOT_PATH => self.root,
            name => {
                let id = self
                    .resolve_child(name)
                    .context(DirectoryNotFoundSnafu { name })?;
                ensure!(
                    self.node(id).kind.is_directory(),
                    NotADirectorySnafu { name }
                );
                id
            }
        };
        Ok(())
    }

    pub fn write_file(
        &mut self,
        name: &str,
        content: impl Into<String>,
    ) -> Result<(), NamespaceError> {
        let id = self.resolve_file(name)?;
        let node = self.node_mut(id);
        node.content = content.into();
        node.modified_at = SystemTime::now();
        Ok(())
    }

    pub fn read_file(&self, name: &str) -> Result<&str, NamespaceError> {
        let id = self.resolve_file(name)?;
        Ok(&self.node(id).content)
    }

    fn resolve_file(&self, name: &str) -> Result<NodeId, NamespaceError> {
        let id = self
            .resolve_child(name)
            .context(FileNotFoundSnafu { name })?;
        ensure!(self.node(id).kind.is_file(), NotAFileSnafu { name });
        Ok(id)
    }

    pub fn info(&self, name: &str) -> Result<Descriptor, NamespaceError> {
        let id = self
            .resolve_child(name)
            .context(EntryNotFoundSnafu { name })?;
        Ok(self.node(id).descriptor())
    }

    /// Removes a file or an empty directory from the cursor.
    pub fn delete_entry(&mut self, name: &str) -> Result<(), NamespaceError> {
        let id = self
            .resolve_child(name)
            .context(EntryNotFoundSnafu { name })?;
        let node = self.node(id);
        ensure!(
            node.kind.is_file() || node.children.is_empty(),
            DirectoryNotEmptySnafu { name }
        );

        let entry_path = path::join(&self.current_path(), name);
        let released = self.release_subtree(id, entry_path.clone());
        let parent = self.cursor;
        self.node_mut(parent).children.remove(name);

        debug!("Deleted '{}' ({} node(s) released)", entry_path, released);
        Ok(())
    }

    /// Frees every node of the subtree rooted at `id`, descendants before
    /// their parents, deregistering each one from the index.
    fn release_subtree(&mut self, id: NodeId, subtree_path: String) -> usize {
        let mut pre_order = Vec::new();
        let mut pending = vec![(id, subtree_path)];
        while let Some((id, node_path)) = pending.pop() {
            for (name, &child) in self.node(id).children.iter() {
                pending.push((child, path::join(&node_path, name)));
            }
            pre_order.push((id, node_path));
        }

        let released = pre_order.len();
        for (id, node_path) in pre_order.into_iter().rev() {
            self.index.deregister(&node_path);
            self.nodes[id.0] = None;
            self.free_slots.push(id.0);
        }
        released
    }

    pub fn current_path(&self) -> String {
        self.path_of(self.cursor)
    }

    /// Canonical absolute path of a node, O(depth)
    pub(crate) fn path_of(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut current = self.node(id);
        while let Some(parent) = current.parent {
            names.push(current.name.as_str());
            current = self.node(parent);
        }
        path::from_reversed_names(names)
    }

    /// Looks up an absolute path through the index
    pub fn lookup(&self, absolute_path: &str) -> Option<Descriptor> {
        let canonical = match absolute_path.trim_end_matches(SEPARATOR) {
            "" => ROOT_PATH,
            trimmed => trimmed,
        };
        self.index
            .get(canonical)
            .map(|id| self.node(id).descriptor())
    }

    pub fn indexed_paths(&self) -> usize {
        self.index.len()
    }

    #[cfg(test)]
    pub(crate) fn index(&self) -> &PathIndex {
        &self.index
    }
}

fn validate_name(name: &str) -> Result<(), NamespaceError> {
    ensure!(
        !name.is_empty() && !name.contains(SEPARATOR) && name != CURRENT_DIR && name != PARENT_DIR,
        InvalidNameSnafu { name }
    );
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum NamespaceError {
    #[snafu(display(
        "Invalid name '{}': names must be non-empty, must not contain '/' and must not be '.' or '..'",
        name
    ))]
    InvalidName { name: String },
    #[snafu(display("'{}' already exists", name))]
    AlreadyExists { name: String },
    #[snafu(display("File '{}' not found", name))]
    FileNotFound { name: String },
    #[snafu(display("Directory '{}' not found", name))]
    DirectoryNotFound { name: String },
    #[snafu(display("'{}' not found", name))]
    EntryNotFound { name: String },
    #[snafu(display("'{}' is a directory, not a file", name))]
    NotAFile { name: String },
    #[snafu(display("'{}' is a file, not a directory", name))]
    NotADirectory { name: String },
    #[snafu(display("Directory '{}' is not empty", name))]
    DirectoryNotEmpty { name: String },
}

impl NamespaceError {
    /// True for every failure to resolve a name to an entry of the expected kind
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            NamespaceError::FileNotFound { .. }
                | NamespaceError::DirectoryNotFound { .. }
                | NamespaceError::EntryNotFound { .. }
                | NamespaceError::NotAFile { .. }
                | NamespaceError::NotADirectory { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use rstest::rstest;

    /// Walks the tree and checks that the index holds exactly its paths
    fn assert_index_consistent(namespace: &Namespace) {
        let mut expected = HashMap::new();
        let mut pending = vec![(namespace.root(), ROOT_PATH.to_string())];
        while let Some((id, node_path)) = pending.pop() {
            let node = namespace.node(id);
            for (name, &child) in node.children.iter() {
                assert_eq!(namespace.node(child).parent, Some(id));
                assert_eq!(&namespace.node(child).name, name);
                pending.push((child, path::join(&node_path, name)));
            }
            assert_eq!(namespace.path_of(id), node_path);
            expected.insert(node_path, id);
        }

        let actual = namespace
            .index()
            .iter()
            .map(|(path, id)| (path.clone(), *id))
            .collect::<HashMap<_, _>>();
        assert_eq!(actual, expected);
    }

    #[test]
    fn new_namespace_starts_at_root() {
        let namespace = Namespace::new();
        assert_eq!(namespace.current_path(), "/");
        assert_eq!(namespace.indexed_paths(), 1);
        assert_index_consistent(&namespace);
    }

    #[test]
    fn parent_of_root_fails_without_moving() {
        let mut namespace = Namespace::new();
        namespace.create_directory("docs").unwrap();

        let err = namespace.change_directory("..").unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, NamespaceError::DirectoryNotFound { .. }));
        assert_eq!(namespace.current_path(), "/");
        assert_eq!(namespace.list_children().len(), 1);
    }

    #[test]
    fn create_then_enter_appends_segment() {
        let mut namespace = Namespace::new();
        for name in ["level1", "level 2", "level_3.d"] {
            let before = namespace.current_path();
            namespace.create_directory(name).unwrap();
            namespace.change_directory(name).unwrap();
            assert_eq!(namespace.current_path(), path::join(&before, name));
        }
        assert_eq!(namespace.current_path(), "/level1/level 2/level_3.d");
        assert_index_consistent(&namespace);
    }

    #[test]
    fn duplicate_create_fails_and_keeps_original() {
        let mut namespace = Namespace::new();
        namespace.create_file("exists.txt", "original").unwrap();

        let err = namespace.create_file("exists.txt", "other").unwrap_err();
        assert_eq!(
            err,
            NamespaceError::AlreadyExists {
                name: "exists.txt".into()
            }
        );
        assert!(err.to_string().contains("exists.txt"));

        let err = namespace.create_directory("exists.txt").unwrap_err();
        assert!(matches!(err, NamespaceError::AlreadyExists { .. }));
        assert_eq!(namespace.read_file("exists.txt").unwrap(), "original");
        assert_index_consistent(&namespace);
    }

    #[test]
    fn same_name_allowed_in_different_directories() {
        let mut namespace = Namespace::new();
        namespace.create_file("notes.txt", "").unwrap();
        namespace.create_directory("docs").unwrap();
        namespace.change_directory("docs").unwrap();
        namespace.create_file("notes.txt", "").unwrap();
        assert_eq!(namespace.indexed_paths(), 4);
        assert_index_consistent(&namespace);
    }

    #[rstest]
    #[case("")]
    #[case("bad/name.txt")]
    #[case("/")]
    #[case(".")]
    #[case("..")]
    fn invalid_names_are_rejected(#[case] name: &str) {
        let mut namespace = Namespace::new();
        assert!(matches!(
            namespace.create_file(name, ""),
            Err(NamespaceError::InvalidName { .. })
        ));
        assert!(matches!(
            namespace.create_directory(name),
            Err(NamespaceError::InvalidName { .. })
        ));
        assert_eq!(namespace.indexed_paths(), 1);
    }

    #[rstest]
    #[case("my file.txt")]
    #[case("data_2024.log")]
    #[case("...")]
    #[case("тест")]
    fn unusual_but_valid_names_are_accepted(#[case] name: &str) {
        let mut namespace = Namespace::new();
        namespace.create_file(name, "").unwrap();
        assert_eq!(namespace.info(name).unwrap().name, name);
    }

    #[test]
    fn change_directory_variants() {
        let mut namespace = Namespace::new();
        namespace.create_directory("myFolder").unwrap();
        namespace.create_file("file.txt", "").unwrap();

        namespace.change_directory("myFolder").unwrap();
        assert_eq!(namespace.current_path(), "/myFolder");
        namespace.change_directory("..").unwrap();
        assert_eq!(namespace.current_path(), "/");

        let err = namespace.change_directory("nonexistent").unwrap_err();
        assert!(matches!(err, NamespaceError::DirectoryNotFound { .. }));

        let err = namespace.change_directory("file.txt").unwrap_err();
        assert!(matches!(err, NamespaceError::NotADirectory { .. }));
        assert!(err.is_not_found());
        assert_eq!(namespace.current_path(), "/");

        namespace.change_directory("myFolder").unwrap();
        namespace.change_directory("/").unwrap();
        assert_eq!(namespace.current_path(), "/");
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let mut namespace = Namespace::new();
        namespace.create_directory("Docs").unwrap();
        assert!(namespace.change_directory("docs").is_err());
        assert!(namespace.lookup("/docs").is_none());
        assert!(namespace.lookup("/Docs").is_some());
    }

    #[rstest]
    #[case("hello world")]
    #[case("")]
    #[case("special chars: äöü🚀")]
    #[case("multiline\ncontent\nwith\nnewlines\n")]
    fn write_then_read_round_trips(#[case] content: &str) {
        let mut namespace = Namespace::new();
        namespace.create_file("notes.txt", "previous").unwrap();
        namespace.write_file("notes.txt", content).unwrap();
        assert_eq!(namespace.read_file("notes.txt").unwrap(), content);
        assert_eq!(namespace.info("notes.txt").unwrap().size, content.len() as u64);
    }

    #[test]
    fn write_refreshes_modified_time_only() {
        let mut namespace = Namespace::new();
        namespace.create_file("notes.txt", "").unwrap();
        let before = namespace.info("notes.txt").unwrap();

        namespace.write_file("notes.txt", "changed").unwrap();
        let after = namespace.info("notes.txt").unwrap();
        assert_eq!(after.created_at, before.created_at);
        assert!(after.modified_at >= before.modified_at);
    }

    #[test]
    fn write_and_read_reject_missing_and_directories() {
        let mut namespace = Namespace::new();
        namespace.create_directory("myDir").unwrap();

        let err = namespace.write_file("missing.txt", "content").unwrap_err();
        assert!(matches!(err, NamespaceError::FileNotFound { .. }));
        assert!(err.to_string().contains("missing.txt"));

        let err = namespace.write_file("myDir", "content").unwrap_err();
        assert!(matches!(err, NamespaceError::NotAFile { .. }));
        assert!(err.is_not_found());

        assert!(matches!(
            namespace.read_file("missing.txt"),
            Err(NamespaceError::FileNotFound { .. })
        ));
        assert!(matches!(
            namespace.read_file("myDir"),
            Err(NamespaceError::NotAFile { .. })
        ));
    }

    #[test]
    fn info_describes_files_and_directories() {
        let mut namespace = Namespace::new();
        namespace.create_file("info.txt", "content").unwrap();
        namespace.create_directory("infoDir").unwrap();

        let file = namespace.info("info.txt").unwrap();
        assert_eq!(file.kind, EntryKind::File);
        assert_eq!(file.size, 7);

        let dir = namespace.info("infoDir").unwrap();
        assert_eq!(dir.kind, EntryKind::Directory);
        assert_eq!(dir.size, 0);

        assert!(matches!(
            namespace.info("missing"),
            Err(NamespaceError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn non_empty_directory_must_be_emptied_first() {
        let mut namespace = Namespace::new();
        namespace.create_directory("fullFolder").unwrap();
        namespace.change_directory("fullFolder").unwrap();
        namespace.create_file("inside.txt", "x").unwrap();
        namespace.change_directory("..").unwrap();

        let err = namespace.delete_entry("fullFolder").unwrap_err();
        assert!(matches!(err, NamespaceError::DirectoryNotEmpty { .. }));
        assert!(namespace.lookup("/fullFolder/inside.txt").is_some());
        assert_index_consistent(&namespace);

        namespace.change_directory("fullFolder").unwrap();
        namespace.delete_entry("inside.txt").unwrap();
        namespace.change_directory("..").unwrap();
        namespace.delete_entry("fullFolder").unwrap();

        assert!(namespace.lookup("/fullFolder").is_none());
        assert!(namespace.list_children().is_empty());
        assert_eq!(namespace.indexed_paths(), 1);
        assert_index_consistent(&namespace);
    }

    #[test]
    fn delete_missing_entry_fails() {
        let mut namespace = Namespace::new();
        let err = namespace.delete_entry("notHere").unwrap_err();
        assert!(matches!(err, NamespaceError::EntryNotFound { .. }));
    }

    #[test]
    fn release_deregisters_every_descendant() {
        let mut namespace = Namespace::new();
        namespace.create_directory("a").unwrap();
        namespace.change_directory("a").unwrap();
        namespace.create_directory("b").unwrap();
        namespace.change_directory("b").unwrap();
        namespace.create_file("deep.txt", "abc").unwrap();
        namespace.change_directory("/").unwrap();

        let a = namespace.resolve_child("a").unwrap();
        let released = namespace.release_subtree(a, "/a".to_string());
        let root = namespace.root();
        namespace.node_mut(root).children.remove("a");

        assert_eq!(released, 3);
        assert_eq!(namespace.indexed_paths(), 1);
        assert!(namespace.lookup("/a/b/deep.txt").is_none());
        assert_index_consistent(&namespace);
    }

    #[test]
    fn freed_slots_are_reused_without_stale_entries() {
        let mut namespace = Namespace::new();
        namespace.create_file("old.txt", "old").unwrap();
        namespace.delete_entry("old.txt").unwrap();
        namespace.create_directory("new").unwrap();

        assert_eq!(namespace.nodes.len(), 2);
        assert!(namespace.lookup("/old.txt").is_none());
        assert_eq!(
            namespace.lookup("/new").map(|d| d.kind),
            Some(EntryKind::Directory)
        );
        assert_index_consistent(&namespace);
    }

    #[test]
    fn recreating_deleted_name_succeeds() {
        let mut namespace = Namespace::new();
        namespace.create_file("toDelete.txt", "").unwrap();
        namespace.delete_entry("toDelete.txt").unwrap();
        namespace.create_file("toDelete.txt", "again").unwrap();
        assert_eq!(namespace.read_file("toDelete.txt").unwrap(), "again");
    }

    #[test]
    fn nested_round_trip_back_to_root() {
        let mut namespace = Namespace::new();
        for name in ["a", "b", "c"] {
            namespace.create_directory(name).unwrap();
            namespace.change_directory(name).unwrap();
        }
        assert_eq!(namespace.current_path(), "/a/b/c");
        namespace.create_file("deep.txt", "").unwrap();

        for _ in 0..3 {
            namespace.change_directory("..").unwrap();
        }
        assert_eq!(namespace.current_path(), "/");
        assert_eq!(namespace.info("a").unwrap().kind, EntryKind::Directory);
        assert!(namespace.lookup("/a/b/c/deep.txt").is_some());
        assert_index_consistent(&namespace);
    }

    #[rstest]
    #[case("/", Some(EntryKind::Directory))]
    #[case("/docs", Some(EntryKind::Directory))]
    #[case("/docs/", Some(EntryKind::Directory))]
    #[case("/docs/readme.md", Some(EntryKind::File))]
    #[case("/readme.md", None)]
    #[case("docs", None)]
    fn lookup_by_absolute_path(#[case] query: &str, #[case] expected: Option<EntryKind>) {
        let mut namespace = Namespace::new();
        namespace.create_directory("docs").unwrap();
        namespace.change_directory("docs").unwrap();
        namespace.create_file("readme.md", "# hi").unwrap();

        assert_eq!(namespace.lookup(query).map(|d| d.kind), expected);
    }
}
