//! # httpfuse-cli
//!
//! The `httpfuse` mount daemon.
//!
//! ```bash
//! # Mount the tree described in tree.json, recording our PID
//! httpfuse --conf tree.json --pidfile /run/httpfuse.pid /mnt/http
//!
//! # Verbose logging
//! RUST_LOG=httpfuse_fs=debug httpfuse --conf tree.json /mnt/http
//! ```
//!
//! The process stays in the foreground until the filesystem is unmounted.

pub mod config;
pub mod pidfile;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use httpfuse_fs::{HttpFs, HttpFuse};
use httpfuse_http::ReqwestFetcher;

pub use config::{ConfigError, MountConfig};
pub use pidfile::PidFile;

/// httpfuse - expose HTTP objects as a read-only filesystem
#[derive(Parser, Debug)]
#[command(name = "httpfuse")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Mount configuration file (JSON)
    #[arg(long = "conf", value_name = "CONFIG")]
    pub conf: PathBuf,

    /// Write the process id to this file while mounted
    #[arg(long, value_name = "FILE")]
    pub pidfile: Option<PathBuf>,

    /// Allow other users to access the mount
    #[arg(long)]
    pub allow_other: bool,

    /// Filesystem name shown in the mount table
    #[arg(long, value_name = "NAME")]
    pub fsname: Option<String>,

    /// Log filter, takes precedence over RUST_LOG (e.g. "debug")
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Mount point; overrides the one in the config file
    pub mountpoint: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut MountConfig) {
        if let Some(mountpoint) = &self.mountpoint {
            config.mountpoint = Some(mountpoint.clone());
        }
        if let Some(fsname) = &self.fsname {
            config.fsname = fsname.clone();
        }
        if self.allow_other {
            config.allow_other = true;
        }
    }
}

/// Load the configuration, mount, and serve until unmounted.
pub fn run(args: Args) -> anyhow::Result<()> {
    let mut config = MountConfig::load(&args.conf)?;
    args.apply_overrides(&mut config);

    let mountpoint = config
        .mountpoint
        .clone()
        .context("no mount point given on the command line or in the config file")?;

    let tree = config.tree()?;
    let fetcher = ReqwestFetcher::new(config.timeout())?;
    let fs = HttpFs::new(tree, config.options.clone(), fetcher);

    let _pidfile = args
        .pidfile
        .as_deref()
        .map(PidFile::create)
        .transpose()
        .context("failed to write pid file")?;

    info!(mountpoint = %mountpoint.display(), "httpfuse started");
    httpfuse_fs::mount(HttpFuse::new(fs), &mountpoint, &config.mount_settings())?;
    info!("httpfuse stopped");

    Ok(())
}
