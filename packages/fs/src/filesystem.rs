//! Path-based filesystem operations over a resource tree.

use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tracing::{debug, error};

use httpfuse_http::{ByteRange, RangeFetcher, RangeRequest, ReqwestFetcher};
use httpfuse_tree::{Directory, FileNode, Node, NodeKind, ResourceTree};

use crate::attr::{block_count, Attributes, BLOCK_SIZE};
use crate::error::FsError;
use crate::options::FsOptions;

/// Opaque file handle returned by [`HttpFs::open`].
pub type Handle = u64;

/// Read-only filesystem whose files are fetched by HTTP range requests.
///
/// Every operation takes an absolute, normalized path. Nothing is cached:
/// each [`read`](Self::read) issues exactly one range request.
///
/// # Example
///
/// ```ignore
/// use httpfuse_fs::{FsOptions, HttpFs};
/// use httpfuse_http::ReqwestFetcher;
/// use httpfuse_tree::ResourceTree;
///
/// let tree = ResourceTree::from_json_file("tree.json".as_ref())?;
/// let fs = HttpFs::new(tree, FsOptions::default(), ReqwestFetcher::with_default_timeout()?);
///
/// let fh = fs.open("/ncbi/sample.bam", libc::O_RDONLY)?;
/// let header = fs.read("/ncbi/sample.bam", 4, 0, fh)?;
/// fs.release("/ncbi/sample.bam", fh);
/// ```
pub struct HttpFs<F = ReqwestFetcher> {
    tree: ResourceTree,
    options: FsOptions,
    uid: u32,
    gid: u32,
    fetcher: F,
    next_handle: AtomicU64,
}

impl<F: RangeFetcher> HttpFs<F> {
    /// Create a filesystem over `tree`.
    ///
    /// Unset ownership options are resolved to the process's effective
    /// uid/gid here, once.
    pub fn new(tree: ResourceTree, options: FsOptions, fetcher: F) -> Self {
        let uid = options.resolved_uid();
        let gid = options.resolved_gid();
        Self {
            tree,
            options,
            uid,
            gid,
            fetcher,
            next_handle: AtomicU64::new(0),
        }
    }

    pub fn tree(&self) -> &ResourceTree {
        &self.tree
    }

    pub fn options(&self) -> &FsOptions {
        &self.options
    }

    /// Attributes of the node at `path`.
    ///
    /// # Panics
    ///
    /// Panics on a malformed path, see [`ResourceTree::resolve`].
    pub fn getattr(&self, path: &str) -> Result<Attributes, FsError> {
        debug!(path, "getattr");
        let node = self.tree.resolve(path)?;
        Ok(self.attributes(node))
    }

    /// Synthesize attributes for an already resolved node.
    pub fn attributes(&self, node: &Node) -> Attributes {
        match node {
            Node::Directory(_) => Attributes {
                kind: NodeKind::Directory,
                perm: self.options.dir_mode,
                size: 0,
                blksize: BLOCK_SIZE,
                blocks: 0,
                nlink: 1,
                uid: self.uid,
                gid: self.gid,
                atime: self.options.dir_time,
                mtime: self.options.dir_time,
                ctime: self.options.dir_time,
            },
            Node::File(file) => {
                let stat = file.stat();
                Attributes {
                    kind: NodeKind::File,
                    perm: self.options.mode,
                    size: stat.size,
                    blksize: BLOCK_SIZE,
                    blocks: block_count(stat.size),
                    nlink: 1,
                    uid: self.uid,
                    gid: self.gid,
                    atime: stat.atime_or_epoch(),
                    mtime: stat.mtime_or_epoch(),
                    ctime: stat.ctime_or_epoch(),
                }
            }
        }
    }

    /// Open a file. No connection is made; the handle is bookkeeping only.
    pub fn open(&self, path: &str, flags: i32) -> Result<Handle, FsError> {
        debug!(path, flags, "open");
        self.file_at(path)?;
        Ok(self.next_handle.fetch_add(1, Ordering::Relaxed))
    }

    /// Read `size` bytes at `offset` from the file at `path`.
    ///
    /// The range is sent as given, even past the declared file size; the
    /// origin decides what comes back. Any 2xx response succeeds with its
    /// body clamped to `size` bytes. Anything else is logged and reported
    /// as [`FsError::Io`].
    pub fn read(&self, path: &str, size: u32, offset: u64, handle: Handle) -> Result<Bytes, FsError> {
        debug!(path, size, offset, handle, "read");
        let file = self.file_at(path)?;

        if size == 0 {
            return Ok(Bytes::new());
        }
        let range = ByteRange::from_offset_len(offset, u64::from(size)).ok_or_else(|| {
            error!(path, size, offset, "read range overflows");
            FsError::Io
        })?;

        let request = RangeRequest::new(file.url().clone(), range);
        let response = self.fetcher.fetch(&request).map_err(|e| {
            error!(path, url = %file.url(), error = %e, "Failed to read");
            FsError::Io
        })?;

        if !response.is_success() {
            error!(
                path,
                status = response.status,
                body = %response.body_text(),
                "Failed to read"
            );
            return Err(FsError::Io);
        }

        Ok(response.into_truncated_body(size as usize))
    }

    /// Release a handle. There is nothing to free.
    pub fn release(&self, path: &str, handle: Handle) {
        debug!(path, handle, "release");
    }

    /// List a directory: `.`, `..`, then child names in lexicographic order.
    pub fn readdir(&self, path: &str, handle: Handle) -> Result<Vec<String>, FsError> {
        debug!(path, handle, "readdir");
        let dir = self.directory_at(path)?;

        let mut names = Vec::with_capacity(dir.len() + 2);
        names.push(".".to_string());
        names.push("..".to_string());
        names.extend(dir.names().map(str::to_string));
        Ok(names)
    }

    fn file_at(&self, path: &str) -> Result<&FileNode, FsError> {
        match self.tree.resolve(path)? {
            Node::File(file) => Ok(file),
            Node::Directory(_) => Err(FsError::IsADirectory),
        }
    }

    fn directory_at(&self, path: &str) -> Result<&Directory, FsError> {
        match self.tree.resolve(path)? {
            Node::Directory(dir) => Ok(dir),
            Node::File(_) => Err(FsError::NotADirectory),
        }
    }
}
