//! Presentation options for synthesized attributes.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer};

use httpfuse_tree::system_time_from_secs;

/// Default permission bits for regular files (read-only for all).
pub const DEFAULT_FILE_MODE: u16 = 0o444;

/// Default permission bits for directories.
pub const DEFAULT_DIR_MODE: u16 = 0o555;

/// Options controlling how nodes are presented to the kernel.
///
/// Ownership falls back to the process's effective uid/gid when unset.
///
/// # Example
///
/// ```rust
/// use httpfuse_fs::FsOptions;
///
/// let options = FsOptions::default().with_uid(1000).with_mode(0o440);
/// assert_eq!(options.mode, 0o440);
/// assert_eq!(options.dir_mode, 0o555);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsOptions {
    /// Owning user id for every entry.
    pub uid: Option<u32>,

    /// Owning group id for every entry.
    pub gid: Option<u32>,

    /// Permission bits for regular files.
    #[serde(deserialize_with = "deserialize_mode")]
    pub mode: u16,

    /// Permission bits for directories.
    #[serde(deserialize_with = "deserialize_mode")]
    pub dir_mode: u16,

    /// Access, modify and change time reported for every directory.
    /// Deserialized from whole seconds since the epoch.
    #[serde(deserialize_with = "deserialize_secs")]
    pub dir_time: SystemTime,

    /// How long the kernel may cache attributes and entries.
    /// Deserialized from whole seconds.
    #[serde(rename = "attr_ttl_secs", deserialize_with = "deserialize_ttl")]
    pub attr_ttl: Duration,
}

impl Default for FsOptions {
    fn default() -> Self {
        Self {
            uid: None,
            gid: None,
            mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            dir_time: UNIX_EPOCH,
            attr_ttl: Duration::from_secs(1),
        }
    }
}

impl FsOptions {
    pub fn with_uid(mut self, uid: u32) -> Self {
        self.uid = Some(uid);
        self
    }

    pub fn with_gid(mut self, gid: u32) -> Self {
        self.gid = Some(gid);
        self
    }

    pub fn with_mode(mut self, mode: u16) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_dir_mode(mut self, dir_mode: u16) -> Self {
        self.dir_mode = dir_mode;
        self
    }

    pub fn with_dir_time(mut self, dir_time: SystemTime) -> Self {
        self.dir_time = dir_time;
        self
    }

    pub fn with_attr_ttl(mut self, attr_ttl: Duration) -> Self {
        self.attr_ttl = attr_ttl;
        self
    }

    /// The configured uid, or the process's effective uid.
    pub fn resolved_uid(&self) -> u32 {
        // SAFETY: geteuid has no preconditions and cannot fail.
        self.uid.unwrap_or_else(|| unsafe { libc::geteuid() })
    }

    /// The configured gid, or the process's effective gid.
    pub fn resolved_gid(&self) -> u32 {
        // SAFETY: getegid has no preconditions and cannot fail.
        self.gid.unwrap_or_else(|| unsafe { libc::getegid() })
    }
}

/// Parse permission bits written as an integer or an octal string
/// (`"0444"`, `"0o444"`, `"444"`).
pub fn parse_mode(s: &str) -> Result<u16, String> {
    let digits = s.strip_prefix("0o").unwrap_or(s);
    let mode = u16::from_str_radix(digits, 8).map_err(|e| format!("invalid mode {:?}: {}", s, e))?;
    check_mode(mode)
}

fn check_mode(mode: u16) -> Result<u16, String> {
    if mode > 0o7777 {
        return Err(format!("mode {:#o} has bits outside 0o7777", mode));
    }
    Ok(mode)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModeRepr {
    Bits(u16),
    Octal(String),
}

fn deserialize_mode<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u16, D::Error> {
    let mode = match ModeRepr::deserialize(deserializer)? {
        ModeRepr::Bits(bits) => check_mode(bits),
        ModeRepr::Octal(s) => parse_mode(&s),
    };
    mode.map_err(serde::de::Error::custom)
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SystemTime, D::Error> {
    i64::deserialize(deserializer).map(system_time_from_secs)
}

fn deserialize_ttl<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
