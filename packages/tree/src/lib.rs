//! # httpfuse-tree
//!
//! The static namespace of an httpfuse mount.
//!
//! A [`ResourceTree`] is a hierarchy of [`Directory`] and [`FileNode`] values
//! rooted at a directory. Each file carries the URL that backs its contents
//! and a [`FileStat`] record. Trees are built once, either in code with the
//! builder methods or from a JSON [`NodeDefinition`], and never change.
//!
//! ```rust
//! use httpfuse_tree::{Directory, FileNode, ResourceTree};
//!
//! let tree = ResourceTree::new(
//!     Directory::new()
//!         .with_file("a", FileNode::parse("http://example.com/a", 1).unwrap())
//!         .with_dir("sub", Directory::new()),
//! );
//!
//! assert!(tree.resolve("/sub").unwrap().is_dir());
//! ```

pub mod definition;
pub mod error;
pub mod node;
pub mod path;
pub mod tree;

pub use definition::{NodeDefinition, StatDefinition};
pub use error::{PathError, ResolveError, TreeError};
pub use node::{system_time_from_secs, Directory, FileNode, FileStat, Node, NodeKind};
pub use path::FsPath;
pub use tree::ResourceTree;
