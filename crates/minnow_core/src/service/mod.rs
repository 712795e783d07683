//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate model rules and blob persistence into store-level APIs.
//! - Keep presentation layers decoupled from storage details.

pub mod item_store;
pub mod sample_data;
