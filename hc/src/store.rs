//! Directory-backed challenge store
//!
//! ```text
//! challenges/
//! ├── {challenge_id}.json   # challenge document
//! └── {challenge_id}.lock   # held exclusively during load-modify-save
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, info, warn};

use crate::domain::{Challenge, ChallengeId};
use crate::error::StoreError;

/// The main challenge store
#[derive(Debug, Clone)]
pub struct ChallengeStore {
    /// Base path for storage
    base_path: PathBuf,
}

/// Exclusive lock on one challenge document, released on drop
struct DocumentLock {
    file: fs::File,
}

impl Drop for DocumentLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            warn!("Failed to release challenge lock: {}", e);
        }
    }
}

impl ChallengeStore {
    /// Open or create a challenge store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened challenge store");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// IDs become file names: alphanumerics, `-` and `_` only
    fn check_id(id: &ChallengeId) -> Result<(), StoreError> {
        let s = id.as_str();
        let valid = !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        if !valid {
            warn!(%id, "Rejected challenge id");
            return Err(StoreError::InvalidId { id: id.clone() });
        }
        Ok(())
    }

    fn document_path(&self, id: &ChallengeId) -> PathBuf {
        self.base_path.join(format!("{}.json", id))
    }

    fn lock_path(&self, id: &ChallengeId) -> PathBuf {
        self.base_path.join(format!("{}.lock", id))
    }

    fn lock(&self, id: &ChallengeId) -> Result<DocumentLock, StoreError> {
        let path = self.lock_path(id);
        let file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()?;
        Ok(DocumentLock { file })
    }

    fn read(&self, id: &ChallengeId) -> Result<Challenge, StoreError> {
        let path = self.document_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound { id: id.clone() });
        }
        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write(&self, challenge: &Challenge) -> Result<(), StoreError> {
        let path = self.document_path(challenge.id());
        let tmp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        serde_json::to_writer_pretty(&mut file, challenge)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Persist a new challenge
    pub fn create(&self, challenge: &Challenge) -> Result<(), StoreError> {
        Self::check_id(challenge.id())?;
        let _lock = self.lock(challenge.id())?;
        if self.document_path(challenge.id()).exists() {
            return Err(StoreError::AlreadyExists {
                id: challenge.id().clone(),
            });
        }
        self.write(challenge)?;
        info!(id = %challenge.id(), name = challenge.name(), "Challenge created");
        Ok(())
    }

    pub fn get(&self, id: &ChallengeId) -> Result<Challenge, StoreError> {
        Self::check_id(id)?;
        self.read(id)
    }

    /// Load, mutate and save one challenge while holding its lock
    ///
    /// Checks that depend on the current document belong inside `f`.
    /// Nothing is written if `f` fails.
    pub fn update<T, E, F>(&self, id: &ChallengeId, f: F) -> Result<T, StoreError>
    where
        E: Into<StoreError>,
        F: FnOnce(&mut Challenge) -> Result<T, E>,
    {
        Self::check_id(id)?;
        if !self.document_path(id).exists() {
            return Err(StoreError::NotFound { id: id.clone() });
        }
        let _lock = self.lock(id)?;
        let mut challenge = self.read(id)?;
        let result = f(&mut challenge).map_err(Into::<StoreError>::into)?;
        self.write(&challenge)?;
        debug!(%id, "Challenge updated");
        Ok(result)
    }

    /// All challenges, newest first
    pub fn list(&self) -> Result<Vec<Challenge>, StoreError> {
        let mut challenges = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<Challenge>(&content) {
                Ok(challenge) => challenges.push(challenge),
                Err(e) => warn!(path = %path.display(), "Skipping unreadable challenge document: {}", e),
            }
        }

        challenges.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(challenges)
    }

    /// Delete a challenge; returns whether it existed
    pub fn delete(&self, id: &ChallengeId) -> Result<bool, StoreError> {
        Self::check_id(id)?;
        let existed = {
            let _lock = self.lock(id)?;
            let path = self.document_path(id);
            let existed = path.exists();
            if existed {
                fs::remove_file(&path)?;
                info!(%id, "Deleted challenge");
            }
            existed
        };
        if let Err(e) = fs::remove_file(self.lock_path(id)) {
            debug!(%id, "No lock file to remove: {}", e);
        }
        Ok(existed)
    }
}
