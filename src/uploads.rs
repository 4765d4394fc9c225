//! Upload Namer
//!
//! Stores uploaded image bytes and hands back the path they were written to.
//! The record store keeps that path as an opaque string.
//!
//! ## Layout
//! ```text
//! {uploads_dir}/
//!   ├── avatars/          member avatars
//!   └── achievements/     badge images
//! ```
//! Files are named `{unix_nanos}{ext}`; the extension comes from the
//! filename hint and defaults to `.jpg`.

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::{BoardError, Result};

/// Extension used when the hint carries none
const DEFAULT_EXTENSION: &str = ".jpg";

/// Attempts at finding a free name before giving up
const MAX_NAME_ATTEMPTS: u32 = 64;

/// What an upload is for; decides the target directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Avatar,
    Achievement,
}

impl UploadKind {
    fn dir_name(self) -> &'static str {
        match self {
            UploadKind::Avatar => "avatars",
            UploadKind::Achievement => "achievements",
        }
    }
}

/// Writes uploads beneath a root directory
#[derive(Debug, Clone)]
pub struct UploadNamer {
    root: PathBuf,
    max_bytes: usize,
}

impl UploadNamer {
    /// Create the namer and its target directories
    pub fn open(config: &Config) -> Result<Self> {
        let namer = Self {
            root: config.uploads_dir.clone(),
            max_bytes: config.max_upload_bytes,
        };
        for kind in [UploadKind::Avatar, UploadKind::Achievement] {
            fs::create_dir_all(namer.dir(kind))?;
        }
        Ok(namer)
    }

    /// Directory uploads of `kind` are written to
    pub fn dir(&self, kind: UploadKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Store `bytes` and return the path written
    ///
    /// The returned path is `uploads_dir`-relative as configured, e.g.
    /// `uploads/avatars/1714557600123456789.png`.
    pub fn store(&self, kind: UploadKind, hint: &str, bytes: &[u8]) -> Result<String> {
        if bytes.len() > self.max_bytes {
            return Err(BoardError::InvalidInput(format!(
                "upload of {} bytes exceeds limit of {} bytes",
                bytes.len(),
                self.max_bytes
            )));
        }

        let ext = extension_of(hint);
        let dir = self.dir(kind);
        let mut stamp = unix_nanos();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(format!("{}{}", stamp, ext));
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(bytes)?;
                    file.sync_all()?;
                    tracing::debug!("Stored {} byte upload at {}", bytes.len(), path.display());
                    return Ok(path.to_string_lossy().into_owned());
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => stamp += 1,
                Err(e) => return Err(e.into()),
            }
        }

        Err(BoardError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free upload name in {}", dir.display()),
        )))
    }
}

/// Extension of `hint` including the leading dot, or the default
fn extension_of(hint: &str) -> String {
    match Path::new(hint).extension().and_then(|e| e.to_str()) {
        Some(ext) if !ext.is_empty() => format!(".{}", ext),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

fn unix_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0)
}
