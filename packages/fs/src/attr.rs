//! Synthesized file attributes.

use std::time::SystemTime;

use httpfuse_tree::NodeKind;

/// Preferred I/O block size reported for every entry (128 KiB).
pub const BLOCK_SIZE: u32 = 128 * 1024;

/// Attribute record for one node, as reported by `getattr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    pub kind: NodeKind,
    /// Permission bits only; see [`Attributes::mode`] for the full mode.
    pub perm: u16,
    pub size: u64,
    pub blksize: u32,
    /// `ceil(size / blksize)`.
    pub blocks: u64,
    pub nlink: u32,
    pub uid: u32,
    pub gid: u32,
    pub atime: SystemTime,
    pub mtime: SystemTime,
    pub ctime: SystemTime,
}

impl Attributes {
    /// Permission bits combined with the file type bits (`st_mode`).
    pub fn mode(&self) -> u32 {
        let type_bits = match self.kind {
            NodeKind::Directory => libc::S_IFDIR,
            NodeKind::File => libc::S_IFREG,
        };
        type_bits as u32 | u32::from(self.perm)
    }
}

/// Number of `BLOCK_SIZE` blocks needed to hold `size` bytes.
pub fn block_count(size: u64) -> u64 {
    size.div_ceil(u64::from(BLOCK_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::UNIX_EPOCH;

    fn attrs(kind: NodeKind, perm: u16) -> Attributes {
        Attributes {
            kind,
            perm,
            size: 0,
            blksize: BLOCK_SIZE,
            blocks: 0,
            nlink: 1,
            uid: 0,
            gid: 0,
            atime: UNIX_EPOCH,
            mtime: UNIX_EPOCH,
            ctime: UNIX_EPOCH,
        }
    }

    #[test]
    fn block_counts_round_up() {
        assert_eq!(block_count(0), 0);
        assert_eq!(block_count(1), 1);
        assert_eq!(block_count(100), 1);
        assert_eq!(block_count(131_072), 1);
        assert_eq!(block_count(131_073), 2);
        assert_eq!(block_count(17_282_007_379), 131_852);
    }

    #[test]
    fn mode_carries_type_bits() {
        let d = attrs(NodeKind::Directory, 0o555);
        assert_eq!(d.mode(), libc::S_IFDIR as u32 | 0o555);

        let f = attrs(NodeKind::File, 0o444);
        assert_eq!(f.mode(), libc::S_IFREG as u32 | 0o444);
    }
}
