//! Serialized tree definitions.
//!
//! A definition is the on-disk form of a resource tree: nested JSON objects
//! tagged with `"type": "directory"` or `"type": "file"`.
//!
//! ```json
//! {
//!   "type": "directory",
//!   "contents": {
//!     "testfile": {
//!       "type": "file",
//!       "url": "http://example.com/testfile",
//!       "stat": { "st_size": 100, "st_mtime": 1262462733 }
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;
use crate::node::{system_time_from_secs, Directory, FileNode, FileStat, Node};
use crate::tree::ResourceTree;

/// One node of a serialized tree definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeDefinition {
    Directory {
        contents: BTreeMap<String, NodeDefinition>,
    },
    File {
        url: String,
        stat: StatDefinition,
    },
}

/// Serialized file metadata. Timestamps are whole seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatDefinition {
    pub st_size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st_atime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st_mtime: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub st_ctime: Option<i64>,
}

impl From<&StatDefinition> for FileStat {
    fn from(def: &StatDefinition) -> Self {
        FileStat {
            size: def.st_size,
            atime: def.st_atime.map(system_time_from_secs),
            mtime: def.st_mtime.map(system_time_from_secs),
            ctime: def.st_ctime.map(system_time_from_secs),
        }
    }
}

impl TryFrom<&NodeDefinition> for Node {
    type Error = TreeError;

    fn try_from(def: &NodeDefinition) -> Result<Self, Self::Error> {
        match def {
            NodeDefinition::Directory { contents } => {
                let mut dir = Directory::new();
                for (name, child) in contents {
                    dir.insert(name.clone(), Node::try_from(child)?)?;
                }
                Ok(Node::Directory(dir))
            }
            NodeDefinition::File { url, stat } => {
                let file = FileNode::parse(url, stat.st_size)?.with_stat(stat.into());
                Ok(Node::File(file))
            }
        }
    }
}

impl ResourceTree {
    /// Build a tree from a definition whose root must be a directory.
    pub fn from_definition(def: &NodeDefinition) -> Result<Self, TreeError> {
        match Node::try_from(def)? {
            Node::Directory(root) => Ok(ResourceTree::new(root)),
            Node::File(_) => Err(TreeError::RootNotDirectory),
        }
    }

    /// Parse a JSON tree definition.
    pub fn from_json_str(json: &str) -> Result<Self, TreeError> {
        let def: NodeDefinition = serde_json::from_str(json)?;
        Self::from_definition(&def)
    }

    /// Read and parse a JSON tree definition file.
    pub fn from_json_file(path: &Path) -> Result<Self, TreeError> {
        let json = std::fs::read_to_string(path).map_err(|source| TreeError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "type": "directory",
        "contents": {
            "ncbi": {
                "type": "directory",
                "contents": {
                    "sample.bam": {
                        "type": "file",
                        "url": "http://example.com/sample.bam",
                        "stat": {"st_size": 17282007379, "st_mtime": 1262462733}
                    },
                    "sample.bam.bai": {
                        "type": "file",
                        "url": "http://example.com/sample.bam.bai",
                        "stat": {"st_size": 8450680}
                    }
                }
            },
            "empty": {"type": "directory", "contents": {}}
        }
    }"#;

    #[test]
    fn loads_nested_definition() {
        let tree = ResourceTree::from_json_str(SAMPLE).unwrap();

        let bam = tree.resolve("/ncbi/sample.bam").unwrap().as_file().unwrap();
        assert_eq!(bam.size(), 17_282_007_379);
        assert_eq!(bam.url().as_str(), "http://example.com/sample.bam");
        assert_eq!(bam.stat().mtime, Some(system_time_from_secs(1_262_462_733)));
        assert_eq!(bam.stat().atime, None);

        let root = tree.root().as_directory().unwrap();
        let names: Vec<&str> = root.names().collect();
        assert_eq!(names, vec!["empty", "ncbi"]);
    }

    #[test]
    fn file_root_rejected() {
        let json = r#"{"type": "file", "url": "http://example.com/x", "stat": {"st_size": 1}}"#;
        let err = ResourceTree::from_json_str(json).unwrap_err();
        assert!(matches!(err, TreeError::RootNotDirectory));
    }

    #[test]
    fn directory_without_contents_rejected() {
        let err = ResourceTree::from_json_str(r#"{"type": "directory"}"#).unwrap_err();
        assert!(matches!(err, TreeError::Json(_)));
    }

    #[test]
    fn file_without_size_rejected() {
        let json = r#"{"type": "directory", "contents": {
            "f": {"type": "file", "url": "http://example.com/f", "stat": {}}
        }}"#;
        assert!(matches!(
            ResourceTree::from_json_str(json),
            Err(TreeError::Json(_))
        ));
    }

    #[test]
    fn bad_url_rejected() {
        let json = r#"{"type": "directory", "contents": {
            "f": {"type": "file", "url": "::nope::", "stat": {"st_size": 1}}
        }}"#;
        assert!(matches!(
            ResourceTree::from_json_str(json),
            Err(TreeError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn bad_name_rejected() {
        let json = r#"{"type": "directory", "contents": {
            "a/b": {"type": "directory", "contents": {}}
        }}"#;
        assert!(matches!(
            ResourceTree::from_json_str(json),
            Err(TreeError::Path(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let tree = ResourceTree::from_json_file(file.path()).unwrap();
        assert!(tree.resolve("/empty").unwrap().is_dir());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ResourceTree::from_json_file(Path::new("/nonexistent/tree.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tree.json"));
    }
}
