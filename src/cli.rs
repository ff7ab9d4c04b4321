//! Command-line interface parsing for mcage
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! the `StartupConfig` the server is started with.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::cache::CacheManager;
use crate::data::MOJANG_MANIFEST_URL;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The host is not an IP address
    #[error("Invalid bind address: '{0}'. Expected an IP address such as 127.0.0.1 or ::1")]
    InvalidAddress(String),

    /// No cache directory was given and none could be derived from the home directory
    #[error("Could not determine a cache directory; pass --cache-dir")]
    NoCacheDir,
}

/// mcage - How old is that Minecraft version?
#[derive(Parser, Debug)]
#[command(name = "mcage")]
#[command(about = "Web service that tells you how old a Minecraft version is")]
#[command(version)]
pub struct Cli {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on (0 = auto-assign)
    #[arg(short, long, default_value = "5000")]
    pub port: u16,

    /// Directory holding the cached version manifest
    ///
    /// Defaults to the platform cache directory (`~/.cache/mcage` on Linux).
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Version manifest to fetch
    #[arg(long, value_name = "URL", default_value = MOJANG_MANIFEST_URL)]
    pub manifest_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Address the HTTP server binds to
    pub addr: SocketAddr,
    /// Where the manifest copy is stored
    pub cache_dir: PathBuf,
    /// Upstream manifest location
    pub manifest_url: String,
    /// Whether debug logging is enabled
    pub debug: bool,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the host is not an IP address or no cache directory is available
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let ip: IpAddr = cli
            .host
            .parse()
            .map_err(|_| CliError::InvalidAddress(cli.host.clone()))?;

        let cache_dir = match &cli.cache_dir {
            Some(dir) => dir.clone(),
            None => CacheManager::new()
                .ok_or(CliError::NoCacheDir)?
                .dir()
                .to_path_buf(),
        };

        Ok(StartupConfig {
            addr: SocketAddr::new(ip, cli.port),
            cache_dir,
            manifest_url: cli.manifest_url.clone(),
            debug: cli.debug,
        })
    }
}
