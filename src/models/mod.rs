//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod admin;
pub mod mentor;
pub mod submission;

// Re-export commonly used models
pub use admin::{AdminRecord, NewAdmin};
pub use mentor::{Clan, Course, Mentor};
pub use submission::{HomeworkInfo, Lesson, Student, Submission, TaskType, STATUS_PENDING_REVIEW};
