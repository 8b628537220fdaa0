//! Absolute, normalized filesystem paths.
//!
//! Every path handed to the filesystem adapter must be absolute, contain no
//! empty segments (so no `//` and no trailing `/` except for the root itself)
//! and no `.` or `..` segments. Nothing here normalizes a path: a path that
//! breaks the rules is rejected, never corrected.

use std::fmt;

use crate::error::PathError;

/// Check that `path` is absolute and normalized.
///
/// # Examples
///
/// ```rust
/// use httpfuse_tree::path::validate;
///
/// assert!(validate("/").is_ok());
/// assert!(validate("/dir/testfile").is_ok());
/// assert!(validate("dir/testfile").is_err());
/// assert!(validate("//dir/testfile").is_err());
/// assert!(validate("/dir//testfile").is_err());
/// ```
pub fn validate(path: &str) -> Result<(), PathError> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PathError::NotAbsolute {
            path: path.to_string(),
        });
    };

    if rest.is_empty() {
        return Ok(());
    }

    for segment in rest.split('/') {
        match segment {
            "" => {
                return Err(PathError::EmptySegment {
                    path: path.to_string(),
                })
            }
            "." | ".." => {
                return Err(PathError::DotSegment {
                    path: path.to_string(),
                })
            }
            _ => {}
        }
    }

    Ok(())
}

/// Split an already validated path into its segments.
///
/// The root path yields no segments.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/')
        .unwrap_or(path)
        .split('/')
        .filter(|s| !s.is_empty())
}

/// Check that `name` can be used as a single directory entry.
pub fn validate_name(name: &str) -> Result<(), PathError> {
    let message = if name.is_empty() {
        "empty name"
    } else if name == "." || name == ".." {
        "reserved name"
    } else if name.contains('/') {
        "contains '/'"
    } else if name.contains('\0') {
        "contains a NUL byte"
    } else {
        return Ok(());
    };

    Err(PathError::InvalidName {
        name: name.to_string(),
        message: message.to_string(),
    })
}

/// An owned, validated absolute path.
///
/// Displays as the canonical string form (`/`, `/dir`, `/dir/file`).
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct FsPath {
    components: Vec<String>,
}

impl FsPath {
    /// The root path `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse and validate a path string.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        validate(s)?;
        Ok(Self {
            components: segments(s).map(str::to_string).collect(),
        })
    }

    /// Append a single entry name.
    pub fn join(&self, name: &str) -> Result<Self, PathError> {
        validate_name(name)?;
        let mut components = self.components.clone();
        components.push(name.to_string());
        Ok(Self { components })
    }

    /// The containing directory, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.components.split_last()?;
        Some(Self {
            components: init.to_vec(),
        })
    }

    /// The final component, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }
}

impl fmt::Display for FsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for FsPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
