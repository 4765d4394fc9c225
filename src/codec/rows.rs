//! Row schemas
//!
//! Maps each entity kind onto its fixed column layout.

use std::fmt;

use time::OffsetDateTime;

use crate::model::{format_timestamp, parse_timestamp, Achievement, Member};

/// The two persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Members,
    Achievements,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Members => write!(f, "members"),
            EntityKind::Achievements => write!(f, "achievements"),
        }
    }
}

/// A record that can be written to and read from a CSV row
pub trait Record: Sized {
    /// Which collection this record belongs to
    const KIND: EntityKind;

    /// Column names, in file order
    const HEADER: &'static [&'static str];

    /// Store-assigned identifier
    fn id(&self) -> u64;

    /// Encode as one row, columns in `HEADER` order
    fn to_row(&self) -> Vec<String>;

    /// Decode from a row already checked to have `HEADER.len()` columns
    fn from_row(fields: &mut FieldReader<'_>) -> Self;
}

/// Typed access to the columns of one row
///
/// Malformed numbers and timestamps decode to their zero value and are
/// counted in `defaulted`.
pub struct FieldReader<'a> {
    row: &'a [String],
    defaulted: usize,
}

impl<'a> FieldReader<'a> {
    pub fn new(row: &'a [String]) -> Self {
        Self { row, defaulted: 0 }
    }

    /// Number of fields replaced by a default so far
    pub fn defaulted(&self) -> usize {
        self.defaulted
    }

    pub fn text(&self, col: usize) -> String {
        self.row.get(col).cloned().unwrap_or_default()
    }

    pub fn unsigned(&mut self, col: usize) -> u64 {
        match self.raw(col).trim().parse() {
            Ok(v) => v,
            Err(_) => {
                self.defaulted += 1;
                0
            }
        }
    }

    pub fn signed(&mut self, col: usize) -> i64 {
        match self.raw(col).trim().parse() {
            Ok(v) => v,
            Err(_) => {
                self.defaulted += 1;
                0
            }
        }
    }

    pub fn timestamp(&mut self, col: usize) -> OffsetDateTime {
        match parse_timestamp(self.raw(col)) {
            Some(ts) => ts,
            None => {
                self.defaulted += 1;
                OffsetDateTime::UNIX_EPOCH
            }
        }
    }

    fn raw(&self, col: usize) -> &str {
        self.row.get(col).map(String::as_str).unwrap_or("")
    }
}

// =============================================================================
// Members: id,name,role,avatar,sort_order,created_at
// =============================================================================

impl Record for Member {
    const KIND: EntityKind = EntityKind::Members;
    const HEADER: &'static [&'static str] =
        &["id", "name", "role", "avatar", "sort_order", "created_at"];

    fn id(&self) -> u64 {
        self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.role.clone(),
            self.avatar.clone(),
            self.sort_order.to_string(),
            format_timestamp(self.created_at),
        ]
    }

    fn from_row(fields: &mut FieldReader<'_>) -> Self {
        Member {
            id: fields.unsigned(0),
            name: fields.text(1),
            role: fields.text(2),
            avatar: fields.text(3),
            sort_order: fields.signed(4),
            achievements: Vec::new(),
            created_at: fields.timestamp(5),
        }
    }
}

// =============================================================================
// Achievements: id,member_id,image,category,created_at
// =============================================================================

impl Record for Achievement {
    const KIND: EntityKind = EntityKind::Achievements;
    const HEADER: &'static [&'static str] = &["id", "member_id", "image", "category", "created_at"];

    fn id(&self) -> u64 {
        self.id
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.member_id.to_string(),
            self.image.clone(),
            self.category.clone(),
            format_timestamp(self.created_at),
        ]
    }

    fn from_row(fields: &mut FieldReader<'_>) -> Self {
        Achievement {
            id: fields.unsigned(0),
            member_id: fields.unsigned(1),
            image: fields.text(2),
            category: fields.text(3),
            created_at: fields.timestamp(4),
        }
    }
}
