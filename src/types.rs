//! Core types for shifts, volunteers, and assembled board entries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw shift record fetched from the rota API.
///
/// Immutable once fetched; one instance per upstream record per poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    /// Upstream shift id.
    pub id: u64,
    /// Id of the rota (duty category) this shift belongs to.
    pub rota_id: u64,
    /// Human-readable rota name, e.g. "Duty Deputy".
    pub rota_name: String,
    /// Optional free-text title appended to the rota name on display.
    pub title: Option<String>,
    /// When the shift begins.
    pub start: NaiveDateTime,
    /// Shift length in seconds. Zero means an all-day duty.
    pub duration_seconds: u64,
    /// Ids of the volunteers signed up, in upstream order.
    pub occupant_ids: Vec<u64>,
}

/// A shift's relation to the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// The shift has already ended.
    Past,
    /// The shift is running now.
    Current,
    /// The shift has not started yet.
    Future,
}

/// A classified shift: the record plus its computed duty window.
///
/// Pure function of `(ShiftRecord, now)` — recomputed fresh every poll.
/// Invariant: `end >= start`; `start == end` marks an all-day duty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftWindow {
    /// The underlying shift record.
    pub shift: ShiftRecord,
    /// Window start (same instant as `shift.start`).
    pub start: NaiveDateTime,
    /// Window end: `start + duration`.
    pub end: NaiveDateTime,
    /// Where the window sits relative to the reference instant.
    pub relation: Relation,
}

impl ShiftWindow {
    /// Whether this window represents an all-day (zero-duration) duty.
    pub fn is_all_day(&self) -> bool {
        self.start == self.end
    }
}

/// A single contact detail, e.g. a telephone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Human-readable label from the upstream property, e.g. "Mobile".
    pub label: String,
    /// The contact value itself.
    pub value: String,
}

/// Normalized contact details for one volunteer.
///
/// Built from a volunteer's raw property list: properties whose code
/// begins with `telephone` become contacts; a property named
/// "Friendly Name" overrides the display name; everything else is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerDetail {
    /// Upstream volunteer id.
    pub id: u64,
    /// Name shown on the board.
    pub display_name: String,
    /// Telephone contacts in upstream property order.
    pub contacts: Vec<Contact>,
}

/// The display category of an assembled board entry.
///
/// Serialized lowercase (`"special"`, `"past"`, `"present"`, `"future"`)
/// to match the vocabulary board clients already understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A promoted rota, shown above everything else.
    Special,
    /// The most recently finished shift of a rota.
    Past,
    /// A shift running right now.
    #[serde(rename = "present")]
    Current,
    /// The next shift of a rota to start.
    Future,
}

impl Category {
    /// Returns the human-readable name of this category.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Special => "special",
            Self::Past => "past",
            Self::Current => "present",
            Self::Future => "future",
        }
    }

    /// Display rank: lower sorts earlier on the board.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Special => 0,
            Self::Past => 1,
            Self::Current => 2,
            Self::Future => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One assembled line on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardEntry {
    /// Id of the rota this entry describes.
    pub rota_id: u64,
    /// Display name: rota name, optional title, optional day prefix.
    pub name: String,
    /// Which section of the board this entry belongs in.
    pub category: Category,
    /// `"HH:MM-HH:MM"`, or `"All day"` for zero-duration duties.
    pub time_label: String,
    /// Enriched occupants, copied out of the cache at assembly time.
    pub volunteers: Vec<VolunteerDetail>,
}

/// The result of one aggregation cycle.
///
/// Produced fresh per request and not retained; clients compare `version`
/// against the last value they saw to decide whether to re-render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationResult {
    /// Process-wide monotonic change counter.
    pub version: u64,
    /// Board entries in display order.
    pub entries: Vec<BoardEntry>,
}
