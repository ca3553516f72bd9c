//! Typed host-service contracts used by the panel runtime.
//!
//! This crate is the boundary between the layout core and whatever durable medium the host
//! provides. It exposes the synchronous key-value [`PrefsStore`] contract, an in-memory adapter,
//! typed JSON helpers, and the clock used to mint snapshot ids.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod storage;
pub mod time;

pub use error::StoreError;
pub use storage::prefs::{load_pref_with, save_pref_with, MemoryPrefsStore, PrefsStore};
pub use time::{next_snapshot_id, unix_time_ms_now};
