//! Kernel bridge: `fuser::Filesystem` over [`HttpFs`].
//!
//! Inode numbers are translated to paths through a static [`InodeTable`],
//! each call is delegated to the path-based operation, and [`FsError`]s are
//! answered with their errno.

use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use fuser::{
    FileAttr, FileType, Filesystem, MountOption, ReplyAttr, ReplyData, ReplyDirectory,
    ReplyEmpty, ReplyEntry, ReplyOpen, Request,
};
use tracing::info;

use httpfuse_http::RangeFetcher;
use httpfuse_tree::NodeKind;

use crate::attr::Attributes;
use crate::error::{FsError, MountError};
use crate::filesystem::HttpFs;
use crate::inode::{InodeEntry, InodeTable};

/// How the filesystem is registered with the kernel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSettings {
    /// Filesystem name shown in the mount table.
    pub fsname: String,
    /// Let users other than the mounting one access the mount.
    pub allow_other: bool,
    /// Unmount automatically when the process exits.
    pub auto_unmount: bool,
}

impl Default for MountSettings {
    fn default() -> Self {
        Self {
            fsname: "httpfuse".to_string(),
            allow_other: false,
            auto_unmount: false,
        }
    }
}

impl MountSettings {
    /// Options passed to fuser. The mount is always read-only.
    pub fn mount_options(&self) -> Vec<MountOption> {
        let mut options = vec![
            MountOption::RO,
            MountOption::FSName(self.fsname.clone()),
            MountOption::Subtype("httpfuse".to_string()),
        ];
        if self.allow_other {
            options.push(MountOption::AllowOther);
        }
        if self.auto_unmount {
            // fusermount refuses auto_unmount without allow_other/allow_root.
            if !self.allow_other {
                options.push(MountOption::AllowRoot);
            }
            options.push(MountOption::AutoUnmount);
        }
        options
    }
}

/// [`HttpFs`] adapted to the inode-based kernel interface.
pub struct HttpFuse<F: RangeFetcher> {
    fs: HttpFs<F>,
    inodes: InodeTable,
    ttl: Duration,
}

impl<F: RangeFetcher> HttpFuse<F> {
    pub fn new(fs: HttpFs<F>) -> Self {
        let inodes = InodeTable::build(fs.tree());
        let ttl = fs.options().attr_ttl;
        Self { fs, inodes, ttl }
    }

    pub fn fs(&self) -> &HttpFs<F> {
        &self.fs
    }

    pub fn inodes(&self) -> &InodeTable {
        &self.inodes
    }

    fn entry(&self, ino: u64) -> Result<&InodeEntry, i32> {
        self.inodes.get(ino).ok_or(libc::ENOENT)
    }

    /// Attributes for `ino`, as fuser wants them.
    fn file_attr(&self, ino: u64) -> Result<FileAttr, i32> {
        let entry = self.entry(ino)?;
        let attrs = self
            .fs
            .getattr(&entry.path.to_string())
            .map_err(FsError::errno)?;
        Ok(to_file_attr(ino, &attrs))
    }
}

fn file_type(kind: NodeKind) -> FileType {
    match kind {
        NodeKind::Directory => FileType::Directory,
        NodeKind::File => FileType::RegularFile,
    }
}

/// Convert synthesized attributes to a fuser attribute record.
pub fn to_file_attr(ino: u64, attrs: &Attributes) -> FileAttr {
    FileAttr {
        ino,
        size: attrs.size,
        blocks: attrs.blocks,
        atime: attrs.atime,
        mtime: attrs.mtime,
        ctime: attrs.ctime,
        crtime: attrs.ctime,
        kind: file_type(attrs.kind),
        perm: attrs.perm,
        nlink: attrs.nlink,
        uid: attrs.uid,
        gid: attrs.gid,
        rdev: 0,
        blksize: attrs.blksize,
        flags: 0,
    }
}

impl<F: RangeFetcher> Filesystem for HttpFuse<F> {
    fn lookup(&mut self, _req: &Request<'_>, parent: u64, name: &OsStr, reply: ReplyEntry) {
        let Some(name) = name.to_str() else {
            reply.error(libc::ENOENT);
            return;
        };

        let parent_entry = match self.entry(parent) {
            Ok(e) => e,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };
        if parent_entry.kind != NodeKind::Directory {
            reply.error(libc::ENOTDIR);
            return;
        }

        let Some(ino) = self.inodes.lookup(parent, name) else {
            reply.error(libc::ENOENT);
            return;
        };

        match self.file_attr(ino) {
            Ok(attr) => reply.entry(&self.ttl, &attr, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn getattr(&mut self, _req: &Request<'_>, ino: u64, _fh: Option<u64>, reply: ReplyAttr) {
        match self.file_attr(ino) {
            Ok(attr) => reply.attr(&self.ttl, &attr),
            Err(errno) => reply.error(errno),
        }
    }

    fn open(&mut self, _req: &Request<'_>, ino: u64, flags: i32, reply: ReplyOpen) {
        let result = self
            .entry(ino)
            .and_then(|e| self.fs.open(&e.path.to_string(), flags).map_err(FsError::errno));

        match result {
            Ok(fh) => reply.opened(fh, 0),
            Err(errno) => reply.error(errno),
        }
    }

    fn read(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        size: u32,
        _flags: i32,
        _lock: Option<u64>,
        reply: ReplyData,
    ) {
        let Ok(offset) = u64::try_from(offset) else {
            reply.error(libc::EINVAL);
            return;
        };

        let result = self.entry(ino).and_then(|e| {
            self.fs
                .read(&e.path.to_string(), size, offset, fh)
                .map_err(FsError::errno)
        });

        match result {
            Ok(data) => reply.data(&data),
            Err(errno) => reply.error(errno),
        }
    }

    fn release(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        fh: u64,
        _flags: i32,
        _lock_owner: Option<u64>,
        _flush: bool,
        reply: ReplyEmpty,
    ) {
        if let Ok(entry) = self.entry(ino) {
            self.fs.release(&entry.path.to_string(), fh);
        }
        reply.ok();
    }

    fn readdir(
        &mut self,
        _req: &Request<'_>,
        ino: u64,
        fh: u64,
        offset: i64,
        mut reply: ReplyDirectory,
    ) {
        let entry = match self.entry(ino) {
            Ok(e) => e,
            Err(errno) => {
                reply.error(errno);
                return;
            }
        };

        let names = match self.fs.readdir(&entry.path.to_string(), fh) {
            Ok(names) => names,
            Err(e) => {
                reply.error(e.errno());
                return;
            }
        };

        let skip = usize::try_from(offset).unwrap_or(0);
        for (i, name) in names.iter().enumerate().skip(skip) {
            let (child_ino, kind) = match name.as_str() {
                "." => (ino, FileType::Directory),
                ".." => (entry.parent, FileType::Directory),
                _ => match self.inodes.lookup(ino, name) {
                    Some(child) => {
                        let kind = self
                            .inodes
                            .get(child)
                            .map_or(FileType::RegularFile, |c| file_type(c.kind));
                        (child, kind)
                    }
                    None => continue,
                },
            };

            // reply.add returns true once the buffer is full
            if reply.add(child_ino, (i + 1) as i64, kind, name) {
                break;
            }
        }
        reply.ok();
    }
}

/// Mount and serve until the filesystem is unmounted.
///
/// Calls are dispatched one at a time from the session loop.
pub fn mount<F: RangeFetcher + 'static>(
    fs: HttpFuse<F>,
    mountpoint: &Path,
    settings: &MountSettings,
) -> Result<(), MountError> {
    info!(
        mountpoint = %mountpoint.display(),
        fsname = %settings.fsname,
        inodes = fs.inodes.len(),
        "mounting"
    );
    fuser::mount2(fs, mountpoint, &settings.mount_options()).map_err(|source| {
        MountError::Mount {
            mountpoint: mountpoint.to_path_buf(),
            source,
        }
    })
}

/// Mount in a background thread. Dropping the session unmounts.
pub fn spawn_mount<F: RangeFetcher + 'static>(
    fs: HttpFuse<F>,
    mountpoint: &Path,
    settings: &MountSettings,
) -> Result<fuser::BackgroundSession, MountError> {
    info!(
        mountpoint = %mountpoint.display(),
        fsname = %settings.fsname,
        "mounting in background"
    );
    fuser::spawn_mount2(fs, mountpoint, &settings.mount_options()).map_err(|source| {
        MountError::Mount {
            mountpoint: mountpoint.to_path_buf(),
            source,
        }
    })
}
