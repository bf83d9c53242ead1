//! Fetch a collection, transform it and upload it again.
//!
//! The transforms live in `collection-patch` (pointer edits) and
//! `collection-merge` (name-path upserts); this crate supplies the pieces
//! around them: where settings come from, where the collection lives, and
//! the `collection-sync` binary that ties them together.

pub mod config;
pub mod envelope;
pub mod error;
pub mod io;
pub mod store;
pub mod workflow;

pub use config::{EnvFile, Overrides, Settings};
pub use envelope::{upload_payload, Envelope};
pub use error::SyncError;
pub use store::{CollectionStore, FileStore, PostmanApi};
pub use workflow::{get, merge, parse_base, update, MergeOptions, OperationsFile, UpdateOptions};
