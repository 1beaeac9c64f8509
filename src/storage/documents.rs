//! Snapshot document envelopes
//!
//! One JSON document per collection, wire-compatible with the platform
//! export format: a sync timestamp, a total count and a named record array.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::{AdminRecord, Mentor, Submission};

/// A persisted snapshot collection: the document envelope knows its file
/// name and how to wrap/unwrap its record array.
pub trait SnapshotDocument: Serialize + DeserializeOwned + Send + Sync {
    type Record: Clone + Send + Sync;

    const FILE_NAME: &'static str;

    fn into_records(self) -> Vec<Self::Record>;

    fn from_records(records: Vec<Self::Record>) -> Self;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentorsDocument {
    pub export_date: DateTime<Utc>,
    pub total_unique_mentors: usize,
    pub mentors: Vec<Mentor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminsDocument {
    pub export_date: DateTime<Utc>,
    pub total_unique_admins: usize,
    pub admins: Vec<AdminRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeworksDocument {
    pub exported_at: DateTime<Utc>,
    pub total_pending: usize,
    pub homeworks: Vec<Submission>,
}

impl SnapshotDocument for MentorsDocument {
    type Record = Mentor;

    const FILE_NAME: &'static str = "mentors.json";

    fn into_records(self) -> Vec<Mentor> {
        self.mentors
    }

    fn from_records(records: Vec<Mentor>) -> Self {
        Self {
            export_date: Utc::now(),
            total_unique_mentors: records.len(),
            mentors: records,
        }
    }
}

impl SnapshotDocument for AdminsDocument {
    type Record = AdminRecord;

    const FILE_NAME: &'static str = "admins.json";

    fn into_records(self) -> Vec<AdminRecord> {
        self.admins
    }

    fn from_records(records: Vec<AdminRecord>) -> Self {
        Self {
            export_date: Utc::now(),
            total_unique_admins: records.len(),
            admins: records,
        }
    }
}

impl SnapshotDocument for HomeworksDocument {
    type Record = Submission;

    const FILE_NAME: &'static str = "homeworks.json";

    fn into_records(self) -> Vec<Submission> {
        self.homeworks
    }

    fn from_records(records: Vec<Submission>) -> Self {
        Self {
            exported_at: Utc::now(),
            total_pending: records.len(),
            homeworks: records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentors_envelope_field_names() {
        let doc = MentorsDocument::from_records(vec![]);
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value.get("export_date").is_some());
        assert_eq!(value["total_unique_mentors"], 0);
        assert!(value["mentors"].as_array().is_some());
    }

    #[test]
    fn test_homeworks_envelope_field_names() {
        let doc = HomeworksDocument::from_records(vec![]);
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value.get("exported_at").is_some());
        assert_eq!(value["total_pending"], 0);
        assert!(value["homeworks"].as_array().is_some());
    }
}
