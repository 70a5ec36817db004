//! Client-side mirror of the remote filesystem tree.
//!
//! The tree is partially materialized: a directory's children exist only
//! after its listing has been fetched. Nodes are addressed by canonical
//! `/`-separated paths; the synthetic root has no name and the empty path.

use crate::remote::protocol::{DirEntry, EntryKind};

/// Load state of a directory's children.
///
/// An explicit tri-state so that "never fetched" is distinguishable from
/// "fetched and empty", and so the disclosure indicator follows confirmed
/// state rather than the click that requested it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// One entry (file or directory) in the client-side tree.
///
/// The parent exclusively owns its children; a node removed from
/// `children` is discarded. Sibling names are assumed unique (the server
/// guarantees this); with duplicates, path lookup takes the first match.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub name: String,
    pub kind: EntryKind,
    /// Opaque timestamp string, display only.
    pub last_modified: String,
    pub children: Vec<TreeNode>,
    pub load_state: LoadState,
    path: String,
    generation: u64,
}

impl TreeNode {
    /// The synthetic root: no name, empty path, never destroyed.
    pub fn root() -> Self {
        Self {
            name: String::new(),
            kind: EntryKind::Directory,
            last_modified: String::new(),
            children: Vec::new(),
            load_state: LoadState::Unloaded,
            path: String::new(),
            generation: 0,
        }
    }

    /// A detached node for one listing entry. Its canonical path is
    /// assigned when it is attached via [`TreeNode::add_child`].
    pub fn from_entry(entry: DirEntry) -> Self {
        Self {
            name: entry.name,
            kind: entry.kind,
            last_modified: entry.last_modified_time,
            children: Vec::new(),
            load_state: LoadState::Unloaded,
            path: String::new(),
            generation: 0,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_directory()
    }

    /// Canonical absolute path: `parent.path + "/" + name`, the root
    /// contributing nothing.
    pub fn full_path(&self) -> &str {
        &self.path
    }

    /// Generation counter, bumped by [`TreeNode::clear`]. An in-flight
    /// fetch records it at start and discards its result on mismatch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Attach `child` under `self`, preserving call order.
    ///
    /// No sibling-uniqueness check; callers attach straight from a server
    /// listing, which never repeats names. Only directories are expanded,
    /// so files never acquire children.
    pub fn add_child(&mut self, mut child: TreeNode) {
        debug_assert!(self.is_dir(), "files cannot have children");
        child.path = format!("{}/{}", self.path, child.name);
        self.children.push(child);
    }

    /// Resolve a `/`-separated path relative to this node.
    ///
    /// The empty string resolves to `self`; a leading slash is stripped.
    /// Descent is one segment at a time, exact-name first match. `None`
    /// means a stale or never-loaded path and is treated by callers as a
    /// silent no-op.
    pub fn find(&self, path: &str) -> Option<&TreeNode> {
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.iter().find(|c| c.name == segment)?;
        }
        Some(node)
    }

    /// Mutable variant of [`TreeNode::find`].
    pub fn find_mut(&mut self, path: &str) -> Option<&mut TreeNode> {
        let mut node = self;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            node = node.children.iter_mut().find(|c| c.name == segment)?;
        }
        Some(node)
    }

    /// Style/category key for icon selection.
    ///
    /// Directories use their own name; files use the extension after the
    /// last `.`, lowercased, or the whole name when there is no dot.
    pub fn icon_type_name(&self) -> String {
        match self.kind {
            EntryKind::Directory => self.name.clone(),
            EntryKind::File => match self.name.rfind('.') {
                Some(i) => self.name[i + 1..].to_lowercase(),
                None => self.name.clone(),
            },
        }
    }

    /// Discard all children and return to the unpopulated state.
    ///
    /// Bumps the generation so any fetch still in flight for this node is
    /// discarded when it completes. Name and path are untouched.
    pub fn clear(&mut self) {
        self.children.clear();
        self.load_state = LoadState::Unloaded;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dir(name: &str) -> TreeNode {
        TreeNode::from_entry(DirEntry {
            name: name.into(),
            kind: EntryKind::Directory,
            last_modified_time: String::new(),
        })
    }

    fn file(name: &str) -> TreeNode {
        TreeNode::from_entry(DirEntry {
            name: name.into(),
            kind: EntryKind::File,
            last_modified_time: String::new(),
        })
    }

    /// root/
    ///   a/
    ///     b/
    ///       c.txt
    ///   d.rs
    fn sample_tree() -> TreeNode {
        let mut root = TreeNode::root();
        root.add_child(dir("a"));
        root.find_mut("/a").unwrap().add_child(dir("b"));
        root.find_mut("/a/b").unwrap().add_child(file("c.txt"));
        root.add_child(file("d.rs"));
        root
    }

    #[test]
    fn root_has_empty_path() {
        assert_eq!(TreeNode::root().full_path(), "");
    }

    #[test]
    fn full_path_joins_names_from_root() {
        let root = sample_tree();
        assert_eq!(root.find("/a").unwrap().full_path(), "/a");
        assert_eq!(root.find("/a/b").unwrap().full_path(), "/a/b");
        assert_eq!(root.find("/a/b/c.txt").unwrap().full_path(), "/a/b/c.txt");
        assert_eq!(root.find("/d.rs").unwrap().full_path(), "/d.rs");
    }

    #[test]
    fn find_round_trips_full_path() {
        let root = sample_tree();
        for path in ["/a", "/a/b", "/a/b/c.txt", "/d.rs"] {
            let node = root.find(path).unwrap();
            let back = root.find(node.full_path()).unwrap();
            assert_eq!(back.full_path(), path);
        }
    }

    #[test]
    fn find_empty_path_is_self() {
        let root = sample_tree();
        assert_eq!(root.find("").unwrap().full_path(), "");
        let a = root.find("/a").unwrap();
        assert_eq!(a.find("").unwrap().name, "a");
    }

    #[test]
    fn find_strips_leading_slash() {
        let root = sample_tree();
        assert_eq!(root.find("a/b").unwrap().full_path(), "/a/b");
    }

    #[test]
    fn find_missing_first_segment_is_none() {
        let root = sample_tree();
        assert!(root.find("/zzz").is_none());
        assert!(root.find("/zzz/a/b").is_none());
    }

    #[test]
    fn find_missing_middle_segment_is_none() {
        let root = sample_tree();
        assert!(root.find("/a/zzz/c.txt").is_none());
    }

    #[test]
    fn add_child_preserves_listing_order() {
        let mut root = TreeNode::root();
        root.add_child(dir("a"));
        root.add_child(file("b.txt"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].name, "a");
        assert_eq!(root.children[1].name, "b.txt");
        assert_eq!(root.children[1].full_path(), "/b.txt");
        assert_eq!(root.children[1].icon_type_name(), "txt");
    }

    #[test]
    fn icon_type_name_file_extension() {
        assert_eq!(file("archive.tar.gz").icon_type_name(), "gz");
        assert_eq!(file("photo.JPG").icon_type_name(), "jpg");
    }

    #[test]
    fn icon_type_name_file_without_dot_is_whole_name() {
        assert_eq!(file("README").icon_type_name(), "README");
    }

    #[test]
    fn icon_type_name_directory_is_its_name() {
        assert_eq!(dir("src").icon_type_name(), "src");
    }

    #[test]
    fn icon_type_name_leading_dot_file() {
        assert_eq!(file(".gitignore").icon_type_name(), "gitignore");
    }

    #[test]
    fn clear_discards_descendants() {
        let mut root = sample_tree();
        root.find_mut("/a").unwrap().clear();
        assert!(root.find("/a").unwrap().children.is_empty());
        assert!(root.find("/a/b").is_none());
        assert!(root.find("/a/b/c.txt").is_none());
    }

    #[test]
    fn clear_resets_load_state_and_bumps_generation() {
        let mut node = dir("a");
        node.load_state = LoadState::Loaded;
        let before = node.generation();
        node.clear();
        assert_eq!(node.load_state, LoadState::Unloaded);
        assert_eq!(node.generation(), before + 1);
    }

    #[test]
    fn clear_keeps_name_and_path() {
        let mut root = sample_tree();
        let a = root.find_mut("/a").unwrap();
        a.clear();
        assert_eq!(a.name, "a");
        assert_eq!(a.full_path(), "/a");
    }

    #[test]
    fn duplicate_sibling_names_first_match_wins() {
        let mut root = TreeNode::root();
        let mut first = dir("dup");
        first.last_modified = "first".into();
        let mut second = dir("dup");
        second.last_modified = "second".into();
        root.add_child(first);
        root.add_child(second);
        assert_eq!(root.find("/dup").unwrap().last_modified, "first");
    }
}
