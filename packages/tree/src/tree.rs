//! The resource tree and path resolution.

use crate::error::ResolveError;
use crate::node::{Directory, Node};
use crate::path::{self, FsPath};

/// An immutable hierarchy rooted at a directory.
///
/// Built once at startup and shared read-only by every filesystem call.
///
/// # Example
///
/// ```rust
/// use httpfuse_tree::{Directory, FileNode, ResourceTree};
///
/// let tree = ResourceTree::new(
///     Directory::new().with_dir(
///         "dir",
///         Directory::new().with_file(
///             "testfile",
///             FileNode::parse("http://example.com/testfile", 100).unwrap(),
///         ),
///     ),
/// );
///
/// let node = tree.resolve("/dir/testfile").unwrap();
/// assert_eq!(node.as_file().unwrap().size(), 100);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTree {
    root: Node,
}

impl ResourceTree {
    pub fn new(root: Directory) -> Self {
        Self {
            root: Node::Directory(root),
        }
    }

    /// The root node. Always a directory.
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Resolve an absolute, normalized path to the node it designates.
    ///
    /// Walks the tree one segment at a time and stops at the first segment
    /// that cannot be followed.
    ///
    /// # Panics
    ///
    /// Panics if `path` is relative, contains an empty segment (`//` or a
    /// trailing `/`), or contains `.`/`..` segments. Such paths can only come
    /// from a buggy caller; use [`FsPath::parse`] to check untrusted input.
    pub fn resolve(&self, path: &str) -> Result<&Node, ResolveError> {
        if let Err(e) = path::validate(path) {
            panic!("malformed filesystem path: {}", e);
        }
        self.walk(path::segments(path))
    }

    /// Resolve a path that was validated when it was constructed.
    pub fn resolve_path(&self, path: &FsPath) -> Result<&Node, ResolveError> {
        self.walk(path.components().iter().map(String::as_str))
    }

    fn walk<'a>(&self, segments: impl Iterator<Item = &'a str>) -> Result<&Node, ResolveError> {
        let mut node = &self.root;
        for name in segments {
            let dir = node.as_directory().ok_or(ResolveError::NotADirectory)?;
            node = dir.get(name).ok_or(ResolveError::NotFound)?;
        }
        Ok(node)
    }
}
