//! Durable key-value storage contracts.

pub mod prefs;
