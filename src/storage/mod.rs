//! Snapshot storage module
//!
//! JSON document persistence for the mentors, admins and homework
//! collections with explicit cache invalidation.

pub mod documents;
pub mod store;

pub use documents::{AdminsDocument, HomeworksDocument, MentorsDocument, SnapshotDocument};
pub use store::SnapshotStore;
