//! Record types
//!
//! The two entity kinds kept by the record store.

use serde::{Serialize, Serializer};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

/// A team member
///
/// `achievements` is a denormalized copy kept in step by the store; it is
/// never written to the members file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub id: u64,
    pub name: String,
    pub role: String,
    /// Path or URL of the avatar image
    pub avatar: String,
    /// Display order; defaults to `id`
    pub sort_order: i64,
    pub achievements: Vec<Achievement>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: OffsetDateTime,
}

/// A badge awarded to a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub id: u64,
    pub member_id: u64,
    /// Stored image path (opaque to the store)
    pub image: String,
    /// Free-form label, e.g. "positive" or "negative"
    pub category: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub created_at: OffsetDateTime,
}

// =============================================================================
// Timestamps
// =============================================================================

/// Current UTC time truncated to whole seconds
///
/// RFC 3339 rows written without fractional seconds then read back compare
/// equal to the value held in memory.
pub fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now - Duration::nanoseconds(i64::from(now.nanosecond()))
}

/// Format a timestamp as RFC 3339
///
/// Out-of-range years cannot be represented; they fall back to the epoch.
pub fn format_timestamp(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Parse an RFC 3339 timestamp, yielding `None` when malformed
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(value.trim(), &Rfc3339).ok()
}

fn serialize_timestamp<S: Serializer>(ts: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(*ts))
}
