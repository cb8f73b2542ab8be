//! Flat, index-addressed syntax tree arena.
//!
//! Entries are stored in a single `Vec` and reference each other by
//! [`NodeId`], avoiding owned child collections and back-pointers. IDs are
//! stable for the lifetime of the tree (entries are only ever appended).

use serde::{Deserialize, Serialize};

/// Opaque, copyable ID of an entry in a [`SyntaxTree`] arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates an ID from a raw `u32` index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// One entry in the syntax tree: an interior node or a terminal leaf.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SyntaxEntry {
    /// An interior node with a tag and ordered children.
    Node {
        /// The node's grammar tag (e.g. `kModuleDeclaration`).
        tag: String,
        /// Ordered child IDs (nodes or leaves).
        children: Vec<NodeId>,
    },
    /// A terminal leaf carrying source text and its byte range.
    Leaf {
        /// The token tag (e.g. `SymbolIdentifier` or a quoted keyword).
        tag: String,
        /// The token text as it appeared in the source.
        text: String,
        /// Byte offset of the token start in the source (inclusive).
        start: u32,
        /// Byte offset of the token end in the source (exclusive).
        end: u32,
    },
}

/// A concrete syntax tree stored as a flat arena.
///
/// Built by the decoder or directly through [`add_node`](Self::add_node) /
/// [`add_leaf`](Self::add_leaf) in tests. Leaves are never parents, so
/// only nodes appear on the decoder's stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyntaxTree {
    entries: Vec<SyntaxEntry>,
    root: Option<NodeId>,
}

impl SyntaxTree {
    /// Creates a new, empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root node, or `None` if the tree is empty.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the number of entries (nodes and leaves) in the tree.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID is out of bounds.
    pub fn get(&self, id: NodeId) -> &SyntaxEntry {
        &self.entries[id.as_raw() as usize]
    }

    /// Adds an interior node. With `parent = None` the node becomes the
    /// root (the first such node wins; the caller decides what to do with
    /// later parentless nodes).
    pub fn add_node(&mut self, parent: Option<NodeId>, tag: impl Into<String>) -> NodeId {
        let id = self.push(SyntaxEntry::Node {
            tag: tag.into(),
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.attach(p, id),
            None => {
                if self.root.is_none() {
                    self.root = Some(id);
                }
            }
        }
        id
    }

    /// Adds a leaf under the given parent node.
    pub fn add_leaf(
        &mut self,
        parent: NodeId,
        tag: impl Into<String>,
        text: impl Into<String>,
        start: u32,
        end: u32,
    ) -> NodeId {
        let id = self.push(SyntaxEntry::Leaf {
            tag: tag.into(),
            text: text.into(),
            start,
            end,
        });
        self.attach(parent, id);
        id
    }

    /// Returns the children of the given entry (empty for leaves).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            SyntaxEntry::Node { children, .. } => children,
            SyntaxEntry::Leaf { .. } => &[],
        }
    }

    /// Returns the tag of the given entry.
    pub fn tag(&self, id: NodeId) -> &str {
        match self.get(id) {
            SyntaxEntry::Node { tag, .. } => tag,
            SyntaxEntry::Leaf { tag, .. } => tag,
        }
    }

    /// Returns `true` if the entry is a leaf.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        matches!(self.get(id), SyntaxEntry::Leaf { .. })
    }

    /// Returns the leaf's text, or `None` for interior nodes.
    pub fn leaf_text(&self, id: NodeId) -> Option<&str> {
        match self.get(id) {
            SyntaxEntry::Leaf { text, .. } => Some(text),
            SyntaxEntry::Node { .. } => None,
        }
    }

    /// Returns the leaf's start byte offset, or `None` for interior nodes.
    pub fn leaf_start(&self, id: NodeId) -> Option<u32> {
        match self.get(id) {
            SyntaxEntry::Leaf { start, .. } => Some(*start),
            SyntaxEntry::Node { .. } => None,
        }
    }

    /// Iterates over the subtree rooted at `id` in pre-order (including
    /// `id` itself), using an explicit stack.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![id],
        }
    }

    /// Iterates over the leaf IDs of the subtree rooted at `id`, in
    /// source order.
    pub fn leaves(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.descendants(id).filter(|&n| self.is_leaf(n))
    }

    /// Finds all nodes in the subtree rooted at `id` whose tag equals `tag`.
    pub fn find_by_tag<'a>(&'a self, id: NodeId, tag: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(id)
            .filter(move |&n| !self.is_leaf(n) && self.tag(n) == tag)
    }

    fn push(&mut self, entry: SyntaxEntry) -> NodeId {
        let id = NodeId::from_raw(self.entries.len() as u32);
        self.entries.push(entry);
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        match &mut self.entries[parent.as_raw() as usize] {
            SyntaxEntry::Node { children, .. } => children.push(child),
            SyntaxEntry::Leaf { .. } => {
                // Leaves are never parents; the decoder never attaches
                // under a leaf, so this indicates misuse of the builder API.
                panic!("cannot attach a child to a leaf entry");
            }
        }
    }
}

/// Pre-order iterator over a subtree, driven by an explicit stack.
pub struct Descendants<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        // Push children in reverse so the leftmost child is visited first.
        let children = self.tree.children(id);
        for &child in children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SyntaxTree {
        let mut t = SyntaxTree::new();
        let root = t.add_node(None, "kModuleDeclaration");
        t.add_leaf(root, "\"module\"", "module", 0, 6);
        let header = t.add_node(Some(root), "kModuleHeader");
        t.add_leaf(header, "SymbolIdentifier", "dff", 7, 10);
        t
    }

    #[test]
    fn root_is_first_parentless_node() {
        let t = sample_tree();
        let root = t.root().unwrap();
        assert_eq!(t.tag(root), "kModuleDeclaration");
    }

    #[test]
    fn children_in_insertion_order() {
        let t = sample_tree();
        let root = t.root().unwrap();
        let kids = t.children(root);
        assert_eq!(kids.len(), 2);
        assert!(t.is_leaf(kids[0]));
        assert!(!t.is_leaf(kids[1]));
    }

    #[test]
    fn leaf_accessors() {
        let t = sample_tree();
        let root = t.root().unwrap();
        let kw = t.children(root)[0];
        assert_eq!(t.leaf_text(kw), Some("module"));
        assert_eq!(t.leaf_start(kw), Some(0));
        assert_eq!(t.leaf_text(root), None);
    }

    #[test]
    fn preorder_traversal() {
        let t = sample_tree();
        let tags: Vec<&str> = t
            .descendants(t.root().unwrap())
            .map(|id| t.tag(id))
            .collect();
        assert_eq!(
            tags,
            vec![
                "kModuleDeclaration",
                "\"module\"",
                "kModuleHeader",
                "SymbolIdentifier"
            ]
        );
    }

    #[test]
    fn leaves_in_source_order() {
        let t = sample_tree();
        let texts: Vec<&str> = t
            .leaves(t.root().unwrap())
            .map(|id| t.leaf_text(id).unwrap())
            .collect();
        assert_eq!(texts, vec!["module", "dff"]);
    }

    #[test]
    fn find_by_tag_skips_leaves() {
        let t = sample_tree();
        let found: Vec<NodeId> = t
            .find_by_tag(t.root().unwrap(), "kModuleHeader")
            .collect();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        // 10k levels would blow the call stack with recursive traversal.
        let mut t = SyntaxTree::new();
        let mut parent = t.add_node(None, "kLevel");
        for _ in 0..10_000 {
            parent = t.add_node(Some(parent), "kLevel");
        }
        assert_eq!(t.descendants(t.root().unwrap()).count(), 10_001);
    }

    #[test]
    fn serde_roundtrip() {
        let t = sample_tree();
        let json = serde_json::to_string(&t).unwrap();
        let back: SyntaxTree = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), t.len());
        assert_eq!(back.root(), t.root());
    }
}
