//! Owned item domain model.
//!
//! # Responsibility
//! - Define the record for one belonging and its lifecycle status.
//! - Derive ownership and last-used durations for a caller-supplied "now".
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `received_date` is midnight UTC on the first day of a month for items
//!   created through `OwnedItem::new`.
//! - Category and status tags are stable strings, independent of variant names.

use crate::model::time_span::{start_of_month, TimeSpan};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

/// Stable identifier for an owned item.
pub type ItemId = Uuid;

/// Category of an owned item. Used for filtering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    #[serde(rename = "Clothing")]
    Clothing,
    #[serde(rename = "Technology")]
    Technology,
    #[serde(rename = "Household Item")]
    HouseholdItem,
    #[serde(rename = "Vehicle")]
    Vehicle,
    #[serde(rename = "Other")]
    Other,
}

impl ItemType {
    /// Filter bar order.
    pub const ALL: [ItemType; 5] = [
        ItemType::Clothing,
        ItemType::Technology,
        ItemType::HouseholdItem,
        ItemType::Vehicle,
        ItemType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clothing => "Clothing",
            Self::Technology => "Technology",
            Self::HouseholdItem => "Household Item",
            Self::Vehicle => "Vehicle",
            Self::Other => "Other",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of an owned item.
///
/// Moves are user-initiated during checkups: `Keep -> Give` (unused),
/// `Give -> Keep` (used again) and `Give -> Donate` (donated).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemStatus {
    /// Owned and in use.
    #[serde(rename = "Keep")]
    Keep,
    /// Marked unused during a Keep checkup; awaiting a Give decision.
    #[serde(rename = "Give")]
    Give,
    /// Donated during a Give checkup. Terminal.
    #[serde(rename = "Donate")]
    Donate,
}

impl ItemStatus {
    pub const ALL: [ItemStatus; 3] = [ItemStatus::Keep, ItemStatus::Give, ItemStatus::Donate];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "Keep",
            Self::Give => "Give",
            Self::Donate => "Donate",
        }
    }

    /// Whether `next` is a checkup workflow move from `self`.
    ///
    /// Staying in place is always allowed. The store does not enforce this;
    /// manual reclassification may still pick any status.
    pub fn can_transition_to(self, next: ItemStatus) -> bool {
        matches!(
            (self, next),
            (Self::Keep, Self::Keep)
                | (Self::Give, Self::Give)
                | (Self::Donate, Self::Donate)
                | (Self::Keep, Self::Give)
                | (Self::Give, Self::Keep)
                | (Self::Give, Self::Donate)
        )
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for item records and add-item requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    NilId,
    BlankName,
    BlankGlyph,
    InvalidReceivedMonth { year: i32, month: u32 },
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "item id must not be nil"),
            Self::BlankName => write!(f, "item name must not be blank"),
            Self::BlankGlyph => write!(f, "item glyph must not be blank"),
            Self::InvalidReceivedMonth { year, month } => {
                write!(f, "received month is invalid: {year}-{month:02}")
            }
        }
    }
}

impl Error for ItemValidationError {}

/// One belonging tracked by the store.
///
/// Serialized with camelCase keys: `id`, `name`, `pictureGlyph`,
/// `receivedDate`, `status`, `lastUsedDate`, `itemType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedItem {
    pub id: ItemId,
    pub name: String,
    /// Single grapheme (usually an emoji) shown as the item picture.
    pub picture_glyph: String,
    pub received_date: DateTime<Utc>,
    pub status: ItemStatus,
    pub last_used_date: DateTime<Utc>,
    pub item_type: ItemType,
}

impl OwnedItem {
    /// Creates a freshly added item with a generated id.
    ///
    /// Status starts as `Keep`, `last_used_date` as `now`, and `received` is
    /// truncated to the first day of its month.
    pub fn new(
        name: impl Into<String>,
        picture_glyph: impl Into<String>,
        received: DateTime<Utc>,
        item_type: ItemType,
        now: DateTime<Utc>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), name, picture_glyph, received, item_type, now)
    }

    /// Same as [`OwnedItem::new`] with a caller-provided id.
    pub fn with_id(
        id: ItemId,
        name: impl Into<String>,
        picture_glyph: impl Into<String>,
        received: DateTime<Utc>,
        item_type: ItemType,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            picture_glyph: picture_glyph.into(),
            received_date: start_of_month(received),
            status: ItemStatus::Keep,
            last_used_date: now,
            item_type,
        }
    }

    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.is_nil() {
            return Err(ItemValidationError::NilId);
        }
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::BlankName);
        }
        if self.picture_glyph.trim().is_empty() {
            return Err(ItemValidationError::BlankGlyph);
        }
        Ok(())
    }

    pub fn ownership_duration(&self, now: DateTime<Utc>) -> TimeSpan {
        TimeSpan::between(self.received_date, now)
    }

    pub fn last_used_duration(&self, now: DateTime<Utc>) -> TimeSpan {
        TimeSpan::between(self.last_used_date, now)
    }

    /// Duration an item card highlights: ownership for kept items, time since
    /// last use for items waiting to be given away, nothing once donated.
    pub fn featured_duration(&self, now: DateTime<Utc>) -> Option<TimeSpan> {
        match self.status {
            ItemStatus::Keep => Some(self.ownership_duration(now)),
            ItemStatus::Give => Some(self.last_used_duration(now)),
            ItemStatus::Donate => None,
        }
    }
}

/// Keeps only the first grapheme of a glyph input, trimmed.
///
/// Multi-codepoint emoji (flags, keycaps, variation selectors) stay intact.
pub fn clamp_glyph(input: &str) -> String {
    input
        .trim()
        .graphemes(true)
        .next()
        .unwrap_or_default()
        .to_string()
}
