//! # State Store Module
//!
//! This module provides the durable server state for the podcast watcher:
//! which episode was last processed per feed, and the Telegram update cursor.
//!
//! The state lives in a single JSON document on disk. Loading is tolerant of
//! missing or malformed files and of the legacy flat `{feed_url: episode_id}`
//! layout; saving always produces the current document shape.

mod store;

pub use store::json::JsonStateStore;
pub use store::{ServerState, StateError, StateStore};
