//! Mount configuration file.
//!
//! ```json
//! {
//!   "mountpoint": "/mnt/http",
//!   "fsname": "httpfuse",
//!   "allow_other": true,
//!   "timeout_secs": 30,
//!   "options": { "uid": 1000, "mode": "0444" },
//!   "root": { "type": "directory", "contents": {} }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use httpfuse_fs::{FsOptions, MountSettings};
use httpfuse_tree::{NodeDefinition, ResourceTree, TreeError};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tree definition: {0}")]
    Tree(#[from] TreeError),
}

fn default_fsname() -> String {
    MountSettings::default().fsname
}

fn default_timeout_secs() -> u64 {
    30
}

/// Everything needed to mount, as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MountConfig {
    /// Where to mount. The command line may override it.
    #[serde(default)]
    pub mountpoint: Option<PathBuf>,

    #[serde(default = "default_fsname")]
    pub fsname: String,

    #[serde(default)]
    pub allow_other: bool,

    #[serde(default)]
    pub auto_unmount: bool,

    /// Timeout for each range request, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub options: FsOptions,

    /// The tree to expose; its root must be a directory.
    pub root: NodeDefinition,
}

impl MountConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Build the resource tree from the root definition.
    pub fn tree(&self) -> Result<ResourceTree, ConfigError> {
        Ok(ResourceTree::from_definition(&self.root)?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn mount_settings(&self) -> MountSettings {
        MountSettings {
            fsname: self.fsname.clone(),
            allow_other: self.allow_other,
            auto_unmount: self.auto_unmount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"{"root": {"type": "directory", "contents": {}}}"#;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = MountConfig::from_json_str(MINIMAL).unwrap();
        assert_eq!(config.mountpoint, None);
        assert_eq!(config.fsname, "httpfuse");
        assert!(!config.allow_other);
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.options, FsOptions::default());
        assert!(config.tree().unwrap().resolve("/").unwrap().is_dir());
    }

    #[test]
    fn full_config() {
        let config = MountConfig::from_json_str(
            r#"{
                "mountpoint": "/mnt/http",
                "fsname": "fuse",
                "allow_other": true,
                "timeout_secs": 5,
                "options": {"uid": 1000, "gid": 100, "mode": "0440"},
                "root": {"type": "directory", "contents": {
                    "ncbi": {"type": "directory", "contents": {
                        "sample.bam": {
                            "type": "file",
                            "url": "http://example.com/sample.bam",
                            "stat": {"st_size": 8450680}
                        }
                    }}
                }}
            }"#,
        )
        .unwrap();

        assert_eq!(config.mountpoint, Some(PathBuf::from("/mnt/http")));
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.options.uid, Some(1000));
        assert_eq!(config.options.mode, 0o440);

        let settings = config.mount_settings();
        assert_eq!(settings.fsname, "fuse");
        assert!(settings.allow_other);

        let tree = config.tree().unwrap();
        let bam = tree.resolve("/ncbi/sample.bam").unwrap().as_file().unwrap();
        assert_eq!(bam.size(), 8_450_680);
    }

    #[test]
    fn missing_root_rejected() {
        assert!(matches!(
            MountConfig::from_json_str(r#"{"fsname": "x"}"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn unknown_keys_rejected() {
        let json = r#"{"root": {"type": "directory", "contents": {}}, "nothreads": true}"#;
        assert!(MountConfig::from_json_str(json).is_err());
    }

    #[test]
    fn file_root_rejected_when_building_tree() {
        let config = MountConfig::from_json_str(
            r#"{"root": {"type": "file", "url": "http://example.com/x", "stat": {"st_size": 1}}}"#,
        )
        .unwrap();
        assert!(matches!(
            config.tree(),
            Err(ConfigError::Tree(TreeError::RootNotDirectory))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = MountConfig::load(file.path()).unwrap();
        assert_eq!(config.fsname, "httpfuse");
    }

    #[test]
    fn load_missing_file() {
        let err = MountConfig::load(Path::new("/nonexistent/httpfuse.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/httpfuse.json"));
    }
}
