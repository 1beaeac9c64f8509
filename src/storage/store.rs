//! Snapshot store implementation
//!
//! Keeps each entity collection as an immutable-until-replaced `Arc<Vec<_>>`
//! loaded from its JSON document. Readers always observe a complete
//! snapshot: a replace builds the new document off to the side, renames it
//! over the old file and only then swaps the in-memory view.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, warn};

use super::documents::{AdminsDocument, HomeworksDocument, MentorsDocument, SnapshotDocument};
use crate::models::{AdminRecord, Mentor, Submission};
use crate::utils::errors::Result;

/// One cached snapshot collection backed by a JSON document on disk.
struct Collection<D: SnapshotDocument> {
    path: PathBuf,
    cache: RwLock<Option<Arc<Vec<D::Record>>>>,
}

impl<D: SnapshotDocument> Collection<D> {
    fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(D::FILE_NAME),
            cache: RwLock::new(None),
        }
    }

    /// Cached records; a missing document is treated as an empty collection.
    async fn load(&self) -> Result<Arc<Vec<D::Record>>> {
        if let Some(cached) = self.cache.read().unwrap().clone() {
            return Ok(cached);
        }

        let records = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice::<D>(&bytes)?.into_records(),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(file = D::FILE_NAME, "Snapshot file missing, collection is empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let records = Arc::new(records);
        *self.cache.write().unwrap() = Some(records.clone());
        debug!(file = D::FILE_NAME, count = records.len(), "Snapshot loaded");
        Ok(records)
    }

    /// Replace the whole collection: write a fresh document next to the old
    /// one, rename it into place, then swap the cached view.
    async fn replace(&self, records: Vec<D::Record>) -> Result<usize> {
        let count = records.len();
        let document = D::from_records(records);
        let json = serde_json::to_vec_pretty(&document)?;

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        *self.cache.write().unwrap() = Some(Arc::new(document.into_records()));
        debug!(file = D::FILE_NAME, count = count, "Snapshot replaced");
        Ok(count)
    }

    /// Drop the cached view; the next read goes back to disk.
    fn invalidate(&self) {
        *self.cache.write().unwrap() = None;
    }
}

/// Versioned store of the bot's entity collections.
pub struct SnapshotStore {
    mentors: Collection<MentorsDocument>,
    admins: Collection<AdminsDocument>,
    homeworks: Collection<HomeworksDocument>,
}

impl SnapshotStore {
    /// Open the store rooted at `data_dir`, creating the directory if needed.
    pub async fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        tokio::fs::create_dir_all(&data_dir).await?;

        Ok(Self {
            mentors: Collection::new(&data_dir),
            admins: Collection::new(&data_dir),
            homeworks: Collection::new(&data_dir),
        })
    }

    pub async fn mentors(&self) -> Result<Arc<Vec<Mentor>>> {
        self.mentors.load().await
    }

    pub async fn admins(&self) -> Result<Arc<Vec<AdminRecord>>> {
        self.admins.load().await
    }

    pub async fn homeworks(&self) -> Result<Arc<Vec<Submission>>> {
        self.homeworks.load().await
    }

    pub async fn replace_mentors(&self, records: Vec<Mentor>) -> Result<usize> {
        self.mentors.replace(records).await
    }

    pub async fn replace_admins(&self, records: Vec<AdminRecord>) -> Result<usize> {
        self.admins.replace(records).await
    }

    pub async fn replace_homeworks(&self, records: Vec<Submission>) -> Result<usize> {
        self.homeworks.replace(records).await
    }

    pub fn invalidate_mentors(&self) {
        self.mentors.invalidate();
    }

    pub fn invalidate_admins(&self) {
        self.admins.invalidate();
    }

    pub fn invalidate_homeworks(&self) {
        self.homeworks.invalidate();
    }

    /// Drop every cached collection.
    pub fn invalidate_all(&self) {
        self.invalidate_mentors();
        self.invalidate_admins();
        self.invalidate_homeworks();
    }
}

impl std::fmt::Debug for SnapshotStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotStore")
            .field("mentors", &self.mentors.path)
            .field("admins", &self.admins.path)
            .field("homeworks", &self.homeworks.path)
            .finish()
    }
}
