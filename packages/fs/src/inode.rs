//! Static inode numbering for the kernel bridge.
//!
//! The kernel addresses entries by inode number while [`HttpFs`] works on
//! paths. Because the tree never changes, every node gets its number once,
//! up front, and the table is read-only afterwards.
//!
//! [`HttpFs`]: crate::HttpFs

use std::collections::HashMap;

use httpfuse_tree::{Directory, FsPath, Node, NodeKind, ResourceTree};

/// Inode number of the mount root.
pub const ROOT_INODE: u64 = 1;

/// What the bridge knows about one inode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InodeEntry {
    pub path: FsPath,
    /// Parent inode; the root is its own parent.
    pub parent: u64,
    pub kind: NodeKind,
}

/// Bidirectional mapping between inode numbers and tree paths.
#[derive(Debug, Default)]
pub struct InodeTable {
    /// Indexed by `ino - 1`.
    entries: Vec<InodeEntry>,
    children: HashMap<(u64, String), u64>,
}

impl InodeTable {
    /// Number every node of `tree`, depth first in name order.
    pub fn build(tree: &ResourceTree) -> Self {
        let mut table = Self::default();
        table.entries.push(InodeEntry {
            path: FsPath::root(),
            parent: ROOT_INODE,
            kind: NodeKind::Directory,
        });

        if let Node::Directory(root) = tree.root() {
            table.add_children(ROOT_INODE, &FsPath::root(), root);
        }
        table
    }

    fn add_children(&mut self, parent: u64, parent_path: &FsPath, dir: &Directory) {
        for (name, node) in dir.entries() {
            // Names were validated when the directory was built.
            let Ok(path) = parent_path.join(name) else {
                continue;
            };

            self.entries.push(InodeEntry {
                path: path.clone(),
                parent,
                kind: node.kind(),
            });
            let ino = self.entries.len() as u64;
            self.children.insert((parent, name.to_string()), ino);

            if let Node::Directory(child) = node {
                self.add_children(ino, &path, child);
            }
        }
    }

    pub fn get(&self, ino: u64) -> Option<&InodeEntry> {
        let index = usize::try_from(ino.checked_sub(1)?).ok()?;
        self.entries.get(index)
    }

    /// Inode of `name` inside directory `parent`.
    pub fn lookup(&self, parent: u64, name: &str) -> Option<u64> {
        self.children.get(&(parent, name.to_string())).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
