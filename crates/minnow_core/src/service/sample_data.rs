//! Demo belongings for first launch and manual testing.

use crate::model::item::{ItemStatus, ItemType, OwnedItem};
use chrono::{DateTime, Duration, Months, Utc};

/// Six demo items spread across every status and category, dated relative
/// to `now`.
pub fn sample_items(now: DateTime<Utc>) -> Vec<OwnedItem> {
    let months_ago = |months: u32| now.checked_sub_months(Months::new(months)).unwrap_or(now);

    let sample = |name: &str,
                  glyph: &str,
                  received_months_ago: u32,
                  status: ItemStatus,
                  last_used: DateTime<Utc>,
                  item_type: ItemType| {
        let mut item = OwnedItem::new(name, glyph, months_ago(received_months_ago), item_type, now);
        item.status = status;
        item.last_used_date = last_used;
        item
    };

    vec![
        sample("iPhone 7", "📱", 86, ItemStatus::Keep, now, ItemType::Technology),
        sample(
            "Leather Winter Coat",
            "🧥",
            38,
            ItemStatus::Donate,
            months_ago(26),
            ItemType::Clothing,
        ),
        sample(
            "Chair from downstairs",
            "🪑",
            84,
            ItemStatus::Donate,
            months_ago(6),
            ItemType::HouseholdItem,
        ),
        sample(
            "Trek Mountain Bike",
            "🚲",
            25,
            ItemStatus::Keep,
            months_ago(6),
            ItemType::Vehicle,
        ),
        sample(
            "K2 Keyboard",
            "⌨️",
            26,
            ItemStatus::Give,
            months_ago(14),
            ItemType::Technology,
        ),
        sample(
            "Guitar",
            "🎸",
            12,
            ItemStatus::Keep,
            now - Duration::days(5),
            ItemType::Other,
        ),
    ]
}
