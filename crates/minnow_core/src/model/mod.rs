//! Belongings tracker domain model.
//!
//! # Responsibility
//! - Define owned items, their lifecycle status and the two recurring checkups.
//! - Provide calendar-aware elapsed time used by item cards and due checks.
//!
//! # Invariants
//! - Every item is identified by a stable `ItemId`.
//! - Derived durations and due flags take "now" as an explicit argument.

pub mod checkup;
pub mod item;
pub mod time_span;
