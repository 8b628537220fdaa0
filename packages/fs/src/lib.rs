//! # httpfuse-fs
//!
//! A read-only filesystem whose regular files live behind HTTP URLs.
//!
//! [`HttpFs`] implements the path-based operation set (`getattr`, `open`,
//! `read`, `release`, `readdir`) over a static [`ResourceTree`]. Each `read`
//! becomes exactly one HTTP range request; nothing is cached.
//!
//! ## Architecture
//!
//! ```text
//! Layer 3: Kernel bridge (fuser::Filesystem, inode <-> path)   [feature "fuse"]
//! Layer 2: HttpFs (path resolution, attributes, range reads)
//! Layer 1: ResourceTree + RangeFetcher
//! ```
//!
//! Errors surface as [`FsError`], which the bridge answers with `ENOENT`,
//! `ENOTDIR`, `EISDIR` or `EIO`.
//!
//! [`ResourceTree`]: httpfuse_tree::ResourceTree

pub mod attr;
pub mod error;
pub mod filesystem;
pub mod inode;
pub mod options;

#[cfg(feature = "fuse")]
pub mod fuse;

pub use attr::{Attributes, BLOCK_SIZE};
pub use error::{FsError, MountError};
pub use filesystem::{Handle, HttpFs};
pub use inode::{InodeEntry, InodeTable, ROOT_INODE};
pub use options::FsOptions;

#[cfg(feature = "fuse")]
pub use fuse::{mount, spawn_mount, HttpFuse, MountSettings};
