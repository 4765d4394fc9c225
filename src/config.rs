//! Configuration for Badgeboard
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{BoardError, Result};

/// Main configuration for a Badgeboard instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the CSV mirrors
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── members.csv
    ///     └── achievements.csv
    pub data_dir: PathBuf,

    /// File name of the members mirror (relative to `data_dir`)
    pub members_file: String,

    /// File name of the achievements mirror (relative to `data_dir`)
    pub achievements_file: String,

    // -------------------------------------------------------------------------
    // Upload Configuration
    // -------------------------------------------------------------------------
    /// Root directory for uploaded images
    ///   {uploads_dir}/
    ///     ├── avatars/
    ///     └── achievements/
    pub uploads_dir: PathBuf,

    /// Avatar reference used when a member is created without an upload
    pub default_avatar: String,

    /// Largest accepted upload (in bytes)
    pub max_upload_bytes: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of connection worker threads
    pub workers: usize,

    /// Connection read timeout (milliseconds, 0 disables)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 disables)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            members_file: "members.csv".to_string(),
            achievements_file: "achievements.csv".to_string(),
            uploads_dir: PathBuf::from("./uploads"),
            default_avatar: "assets/images/avatar.svg".to_string(),
            max_upload_bytes: 10 * 1024 * 1024, // 10 MB
            listen_addr: "127.0.0.1:5000".to_string(),
            workers: 8,
            read_timeout_ms: 30_000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the members mirror
    pub fn members_path(&self) -> PathBuf {
        self.data_dir.join(&self.members_file)
    }

    /// Full path of the achievements mirror
    pub fn achievements_path(&self) -> PathBuf {
        self.data_dir.join(&self.achievements_file)
    }

    /// Check the settings that cannot be defaulted away at runtime
    pub fn validate(&self) -> Result<()> {
        if self.members_file.trim().is_empty() || self.achievements_file.trim().is_empty() {
            return Err(BoardError::Config(
                "data file names must not be empty".to_string(),
            ));
        }
        if self.members_file == self.achievements_file {
            return Err(BoardError::Config(format!(
                "members and achievements cannot share the file {:?}",
                self.members_file
            )));
        }
        if Path::new(&self.members_file).components().count() != 1
            || Path::new(&self.achievements_file).components().count() != 1
        {
            return Err(BoardError::Config(
                "data file names must be plain file names".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(BoardError::Config("workers must be at least 1".to_string()));
        }
        if self.max_upload_bytes == 0 {
            return Err(BoardError::Config(
                "max_upload_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for the CSV mirrors)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the members file name
    pub fn members_file(mut self, name: impl Into<String>) -> Self {
        self.config.members_file = name.into();
        self
    }

    /// Set the achievements file name
    pub fn achievements_file(mut self, name: impl Into<String>) -> Self {
        self.config.achievements_file = name.into();
        self
    }

    /// Set the uploads root directory
    pub fn uploads_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.uploads_dir = path.into();
        self
    }

    /// Set the placeholder avatar reference
    pub fn default_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.config.default_avatar = avatar.into();
        self
    }

    /// Set the upload size limit (in bytes)
    pub fn max_upload_bytes(mut self, size: usize) -> Self {
        self.config.max_upload_bytes = size;
        self
    }

    /// Set the upload size limit in whole megabytes
    ///
    /// Fails with `Config` when the byte count does not fit in `usize`.
    pub fn max_upload_mb(self, mb: usize) -> Result<Self> {
        let bytes = mb.checked_mul(1024 * 1024).ok_or_else(|| {
            BoardError::Config(format!("upload limit of {} MB is too large", mb))
        })?;
        Ok(self.max_upload_bytes(bytes))
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of worker threads
    pub fn workers(mut self, count: usize) -> Self {
        self.config.workers = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
