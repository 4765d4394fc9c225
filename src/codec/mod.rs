//! Durable Codec Module
//!
//! Converts the in-memory collections to and from flat CSV files.
//!
//! ## Responsibilities
//! - Load a collection, treating a missing file as "no prior data"
//! - Degrade malformed fields to zero values instead of failing the load
//! - Skip rows that do not carry every column
//! - Rewrite a whole collection on save (truncate, write, fsync)
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Header row                                              │
//! │   id,name,role,avatar,sort_order,created_at             │
//! ├─────────────────────────────────────────────────────────┤
//! │ Data rows (one per record, collection order)            │
//! │   1,Ann,Lead,a.png,1,2024-05-01T10:00:00Z               │
//! │   ... repeated for each record ...                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//! Achievements use `id,member_id,image,category,created_at`.
//! Timestamps are RFC 3339.

mod csv;
mod rows;

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{BoardError, Result};

pub use csv::{escape_field, parse_rows, write_row};
pub use rows::{EntityKind, FieldReader, Record};

/// Outcome of loading one collection from disk
#[derive(Debug)]
pub struct LoadReport<R> {
    /// Records decoded from data rows, in file order
    pub records: Vec<R>,
    /// Rows dropped for missing columns
    pub rows_skipped: usize,
    /// Fields replaced by a zero value because they failed to parse
    pub fields_defaulted: usize,
}

/// Reads and rewrites the two backing files
///
/// Holds no state beyond the file locations.
#[derive(Debug, Clone)]
pub struct DurableCodec {
    members_path: PathBuf,
    achievements_path: PathBuf,
}

impl DurableCodec {
    /// Codec for the files named in `config`
    pub fn new(config: &Config) -> Self {
        Self::with_paths(config.members_path(), config.achievements_path())
    }

    /// Codec for explicit file locations
    pub fn with_paths(members: impl Into<PathBuf>, achievements: impl Into<PathBuf>) -> Self {
        Self {
            members_path: members.into(),
            achievements_path: achievements.into(),
        }
    }

    /// Backing file for an entity kind
    pub fn path(&self, kind: EntityKind) -> &Path {
        match kind {
            EntityKind::Members => &self.members_path,
            EntityKind::Achievements => &self.achievements_path,
        }
    }

    /// Load every record of kind `R`
    ///
    /// Returns `Ok(None)` when the file does not exist. Any other failure to
    /// open or read the file is an error.
    pub fn load<R: Record>(&self) -> Result<Option<LoadReport<R>>> {
        let path = self.path(R::KIND);
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BoardError::Codec(format!(
                    "failed to read {} file {}: {}",
                    R::KIND,
                    path.display(),
                    e
                )))
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let mut report = LoadReport {
            records: Vec::new(),
            rows_skipped: 0,
            fields_defaulted: 0,
        };

        // First row is the header
        for row in parse_rows(&text).into_iter().skip(1) {
            if row.len() < R::HEADER.len() {
                report.rows_skipped += 1;
                continue;
            }
            let mut fields = FieldReader::new(&row);
            let record = R::from_row(&mut fields);
            report.fields_defaulted += fields.defaulted();
            report.records.push(record);
        }

        Ok(Some(report))
    }

    /// Replace the backing file of kind `R` with `records`
    ///
    /// Rows are written in iterator order, after the header.
    pub fn save<'a, R, I>(&self, records: I) -> Result<()>
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let path = self.path(R::KIND);
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write_row(&mut writer, R::HEADER)?;
        for record in records {
            write_row(&mut writer, &record.to_row())?;
        }

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| {
            BoardError::Codec(format!("failed to flush {} file: {}", R::KIND, e))
        })?;
        file.sync_all()?;

        Ok(())
    }
}
