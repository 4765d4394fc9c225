//! Record Store Module
//!
//! The single authority over members and achievements.
//!
//! ## Responsibilities
//! - Allocate strictly increasing identifiers for both collections
//! - Reject achievements that reference an unknown member
//! - Keep each member's embedded achievement list in step
//! - Rewrite the affected CSV mirror before every mutation returns

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::codec::{DurableCodec, LoadReport, Record};
use crate::config::Config;
use crate::error::{BoardError, Result};
use crate::model::{now_utc, Achievement, Member};

/// Largest identifier accepted from disk
///
/// Keeps every id representable as a default `i64` sort key and leaves the
/// allocators room to grow.
const MAX_ID: u64 = i64::MAX as u64;

/// In-memory state guarded by the store lock
struct Collections {
    members: BTreeMap<u64, Member>,
    achievements: BTreeMap<u64, Achievement>,
    next_member_id: u64,
    next_achievement_id: u64,
}

/// Concurrency-safe store for members and their achievements
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// - **Writes** (add_member/add_achievement): exclusive `RwLock` guard
///   - Held across the in-memory insert AND the file rewrite, so on-disk
///     snapshots are totally ordered
/// - **Reads** (list_members, counters): shared guard, concurrent with each
///   other, never with a write
///
/// ## Durability
/// Every mutation re-serializes its whole collection. A failed write is
/// logged and the call still succeeds; memory stays authoritative until the
/// next successful rewrite.
pub struct RecordStore {
    /// Directory holding the CSV mirrors
    data_dir: PathBuf,

    /// File codec (stateless apart from paths)
    codec: DurableCodec,

    /// Both collections and their allocators under one lock
    inner: RwLock<Collections>,
}

impl RecordStore {
    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if needed
    /// 2. Load members (or write an empty members file)
    /// 3. Load achievements (or write an empty achievements file)
    /// 4. Rebuild every member's embedded achievement list
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        // Step 1: Data directory
        fs::create_dir_all(&config.data_dir)?;
        let codec = DurableCodec::new(config);

        // Step 2: Members
        let mut members = BTreeMap::new();
        match codec.load::<Member>()? {
            Some(report) => {
                log_load(&report, codec.path(Member::KIND));
                admit(report.records, &mut members);
            }
            None => {
                tracing::info!("No members file at {}, starting empty", codec.path(Member::KIND).display());
                persist_logged::<Member, _>(&codec, std::iter::empty());
            }
        }

        // Step 3: Achievements
        let mut achievements = BTreeMap::new();
        match codec.load::<Achievement>()? {
            Some(report) => {
                log_load(&report, codec.path(Achievement::KIND));
                admit(report.records, &mut achievements);
            }
            None => {
                tracing::info!(
                    "No achievements file at {}, starting empty",
                    codec.path(Achievement::KIND).display()
                );
                persist_logged::<Achievement, _>(&codec, std::iter::empty());
            }
        }

        // Step 4: Embedded lists are derived, never persisted
        let mut orphaned = 0usize;
        for achievement in achievements.values() {
            match members.get_mut(&achievement.member_id) {
                Some(member) => member.achievements.push(achievement.clone()),
                None => orphaned += 1,
            }
        }
        if orphaned > 0 {
            tracing::warn!("{} achievements reference unknown members", orphaned);
        }

        let next_member_id = next_id(members.keys());
        let next_achievement_id = next_id(achievements.keys());

        tracing::info!(
            "Record store ready: {} members, {} achievements (next ids {}/{})",
            members.len(),
            achievements.len(),
            next_member_id,
            next_achievement_id
        );

        Ok(Self {
            data_dir: config.data_dir.clone(),
            codec,
            inner: RwLock::new(Collections {
                members,
                achievements,
                next_member_id,
                next_achievement_id,
            }),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().data_dir(path).build();
        Self::open(&config)
    }

    /// Add a member
    ///
    /// Steps:
    /// 1. Acquire write lock
    /// 2. Allocate id (sort order = id)
    /// 3. Insert into memory
    /// 4. Rewrite members file
    pub fn add_member(&self, name: &str, role: &str, avatar: &str) -> Member {
        let mut inner = self.inner.write();

        let id = allocate(&mut inner.next_member_id);

        let member = Member {
            id,
            name: name.to_string(),
            role: role.to_string(),
            avatar: avatar.to_string(),
            sort_order: sort_key_for(id),
            achievements: Vec::new(),
            created_at: now_utc(),
        };
        inner.members.insert(id, member.clone());

        self.persist(inner.members.values());
        tracing::debug!("Added member {} ({})", id, member.name);

        member
    }

    /// Award an achievement to an existing member
    ///
    /// Fails with `MemberNotFound` before touching memory or disk when
    /// `member_id` is unknown.
    pub fn add_achievement(&self, member_id: u64, image: &str, category: &str) -> Result<Achievement> {
        let mut inner = self.inner.write();

        if !inner.members.contains_key(&member_id) {
            return Err(BoardError::MemberNotFound(member_id));
        }

        let id = allocate(&mut inner.next_achievement_id);

        let achievement = Achievement {
            id,
            member_id,
            image: image.to_string(),
            category: category.to_string(),
            created_at: now_utc(),
        };
        inner.achievements.insert(id, achievement.clone());
        if let Some(member) = inner.members.get_mut(&member_id) {
            member.achievements.push(achievement.clone());
        }

        self.persist(inner.achievements.values());
        tracing::debug!("Added achievement {} for member {}", id, member_id);

        Ok(achievement)
    }

    /// All members ordered by sort key, each with its achievements
    ///
    /// Returns owned copies. Members sharing a sort key keep collection
    /// order, which callers must not rely on.
    pub fn list_members(&self) -> Vec<Member> {
        let inner = self.inner.read();
        let mut members: Vec<Member> = inner.members.values().cloned().collect();
        members.sort_by_key(|m| m.sort_order);
        members
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn member_count(&self) -> usize {
        self.inner.read().members.len()
    }

    pub fn achievement_count(&self) -> usize {
        self.inner.read().achievements.len()
    }

    /// Identifier the next `add_member` will assign
    pub fn next_member_id(&self) -> u64 {
        self.inner.read().next_member_id
    }

    /// Identifier the next `add_achievement` will assign
    pub fn next_achievement_id(&self) -> u64 {
        self.inner.read().next_achievement_id
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Rewrite one collection's file (called with the write lock held)
    fn persist<'a, R, I>(&self, records: I)
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        persist_logged(&self.codec, records);
    }
}

/// Rewrite one collection's file, logging instead of failing
fn persist_logged<'a, R, I>(codec: &DurableCodec, records: I)
where
    R: Record + 'a,
    I: IntoIterator<Item = &'a R>,
{
    if let Err(e) = codec.save(records) {
        tracing::error!(
            "Failed to persist {} to {}: {} (in-memory state kept)",
            R::KIND,
            codec.path(R::KIND).display(),
            e
        );
    }
}

/// Insert loaded records by id, dropping ids above `MAX_ID`
fn admit<R: Record>(records: Vec<R>, into: &mut BTreeMap<u64, R>) {
    let mut rejected = 0usize;
    for record in records {
        let id = record.id();
        if id > MAX_ID {
            rejected += 1;
            continue;
        }
        into.insert(id, record);
    }
    if rejected > 0 {
        tracing::warn!(
            "Skipped {} {} rows with ids above {}",
            rejected,
            R::KIND,
            MAX_ID
        );
    }
}

/// One past the largest identifier, or 1 for an empty collection
fn next_id<'a>(ids: impl Iterator<Item = &'a u64>) -> u64 {
    ids.max()
        .and_then(|&id| id.checked_add(1))
        .unwrap_or(1)
}

/// Hand out the current id and advance the allocator without wrapping
fn allocate(next: &mut u64) -> u64 {
    let id = *next;
    *next = id.saturating_add(1);
    id
}

/// Default display position for a new member
fn sort_key_for(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

fn log_load<R: Record>(report: &LoadReport<R>, path: &Path) {
    tracing::info!("Loaded {} {} from {}", report.records.len(), R::KIND, path.display());
    if report.rows_skipped > 0 {
        tracing::warn!("Skipped {} short {} rows", report.rows_skipped, R::KIND);
    }
    if report.fields_defaulted > 0 {
        tracing::warn!(
            "Defaulted {} malformed {} fields",
            report.fields_defaulted,
            R::KIND
        );
    }
}
