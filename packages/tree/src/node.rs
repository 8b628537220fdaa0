//! Directory and file nodes.

use std::collections::BTreeMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use url::Url;

use crate::error::TreeError;
use crate::path::validate_name;

/// Convert whole seconds relative to the Unix epoch into a `SystemTime`.
///
/// Negative values land before the epoch.
pub fn system_time_from_secs(secs: i64) -> SystemTime {
    let offset = Duration::from_secs(secs.unsigned_abs());
    if secs >= 0 {
        UNIX_EPOCH + offset
    } else {
        UNIX_EPOCH - offset
    }
}

/// The kind of a node, without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
}

/// A node in the resource tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Directory(Directory),
    File(FileNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Directory(_) => NodeKind::Directory,
            Node::File(_) => NodeKind::File,
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn as_directory(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Directory(_) => None,
        }
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}

impl From<FileNode> for Node {
    fn from(file: FileNode) -> Self {
        Node::File(file)
    }
}

/// A directory: a set of uniquely named children.
///
/// Children are kept in a `BTreeMap`, so iteration is always in
/// lexicographic name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Directory {
    children: BTreeMap<String, Node>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a child, rejecting invalid or duplicate names.
    pub fn insert(&mut self, name: impl Into<String>, node: impl Into<Node>) -> Result<(), TreeError> {
        let name = name.into();
        validate_name(&name)?;
        if self.children.contains_key(&name) {
            return Err(TreeError::DuplicateName { name });
        }
        self.children.insert(name, node.into());
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    ///
    /// # Panics
    ///
    /// Panics if the name is invalid or already present. Use `insert` for
    /// fallible construction.
    pub fn with_node(mut self, name: impl Into<String>, node: impl Into<Node>) -> Self {
        if let Err(e) = self.insert(name, node) {
            panic!("invalid directory entry: {}", e);
        }
        self
    }

    /// Add a subdirectory. Panics like [`with_node`](Self::with_node).
    pub fn with_dir(self, name: impl Into<String>, dir: Directory) -> Self {
        self.with_node(name, dir)
    }

    /// Add a file. Panics like [`with_node`](Self::with_node).
    pub fn with_file(self, name: impl Into<String>, file: FileNode) -> Self {
        self.with_node(name, file)
    }

    /// Look up a direct child by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    /// Child names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Children in lexicographic name order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// Stored metadata for a file.
///
/// Timestamps are optional; readers fall back to the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub atime: Option<SystemTime>,
    pub mtime: Option<SystemTime>,
    pub ctime: Option<SystemTime>,
}

impl FileStat {
    pub fn new(size: u64) -> Self {
        Self {
            size,
            atime: None,
            mtime: None,
            ctime: None,
        }
    }

    pub fn atime_or_epoch(&self) -> SystemTime {
        self.atime.unwrap_or(UNIX_EPOCH)
    }

    pub fn mtime_or_epoch(&self) -> SystemTime {
        self.mtime.unwrap_or(UNIX_EPOCH)
    }

    pub fn ctime_or_epoch(&self) -> SystemTime {
        self.ctime.unwrap_or(UNIX_EPOCH)
    }
}

/// A regular file backed by an HTTP URL.
#[derive(Debug, Clone, PartialEq)]
pub struct FileNode {
    url: Url,
    stat: FileStat,
}

impl FileNode {
    /// Create a file from an already parsed URL.
    pub fn new(url: Url, size: u64) -> Self {
        Self {
            url,
            stat: FileStat::new(size),
        }
    }

    /// Parse `url` and create a file.
    pub fn parse(url: &str, size: u64) -> Result<Self, TreeError> {
        let parsed = Url::parse(url).map_err(|source| TreeError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self::new(parsed, size))
    }

    /// Replace the whole stat record.
    pub fn with_stat(mut self, stat: FileStat) -> Self {
        self.stat = stat;
        self
    }

    pub fn with_atime(mut self, atime: SystemTime) -> Self {
        self.stat.atime = Some(atime);
        self
    }

    pub fn with_mtime(mut self, mtime: SystemTime) -> Self {
        self.stat.mtime = Some(mtime);
        self
    }

    pub fn with_ctime(mut self, ctime: SystemTime) -> Self {
        self.stat.ctime = Some(ctime);
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn stat(&self) -> &FileStat {
        &self.stat
    }

    pub fn size(&self) -> u64 {
        self.stat.size
    }
}
