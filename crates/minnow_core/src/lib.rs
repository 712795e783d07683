//! Core domain logic for Min-Now, a personal belongings tracker.
//! This crate is the single source of truth for item lifecycle and checkup rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::checkup::Checkup;
pub use model::item::{clamp_glyph, ItemId, ItemStatus, ItemType, ItemValidationError, OwnedItem};
pub use model::time_span::TimeSpan;
pub use repo::blob_repo::{
    BlobRepository, MemoryBlobRepository, RepoError, RepoResult, SqliteBlobRepository,
};
pub use service::item_store::{
    CheckupKind, ItemStore, NewItemRequest, StoreChange, SubscriptionId,
};
pub use service::sample_data::sample_items;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
