//! Filesystem error kinds.

use httpfuse_tree::ResolveError;

/// Failure of a filesystem operation.
///
/// The kernel bridge turns these into errno values with [`FsError::errno`].
/// Upstream HTTP details are logged where they happen and never carried here.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    #[error("no such entry")]
    NotFound,

    #[error("not a directory")]
    NotADirectory,

    #[error("is a directory")]
    IsADirectory,

    #[error("I/O error")]
    Io,
}

impl FsError {
    /// The POSIX error number for this failure.
    pub fn errno(self) -> i32 {
        match self {
            FsError::NotFound => libc::ENOENT,
            FsError::NotADirectory => libc::ENOTDIR,
            FsError::IsADirectory => libc::EISDIR,
            FsError::Io => libc::EIO,
        }
    }
}

impl From<ResolveError> for FsError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::NotFound => FsError::NotFound,
            ResolveError::NotADirectory => FsError::NotADirectory,
        }
    }
}

/// Failure to mount the filesystem.
#[derive(thiserror::Error, Debug)]
pub enum MountError {
    #[error("failed to mount at {mountpoint}: {source}")]
    Mount {
        mountpoint: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errno_mapping() {
        assert_eq!(FsError::NotFound.errno(), libc::ENOENT);
        assert_eq!(FsError::NotADirectory.errno(), libc::ENOTDIR);
        assert_eq!(FsError::IsADirectory.errno(), libc::EISDIR);
        assert_eq!(FsError::Io.errno(), libc::EIO);
    }

    #[test]
    fn resolve_errors_convert() {
        assert_eq!(FsError::from(ResolveError::NotFound), FsError::NotFound);
        assert_eq!(
            FsError::from(ResolveError::NotADirectory),
            FsError::NotADirectory
        );
    }
}
