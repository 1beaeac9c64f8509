//! In-memory request state
//!
//! Process-lifetime guards for user-facing operations.

pub mod busy;

pub use busy::{BusyGuard, BusyRegistry};
