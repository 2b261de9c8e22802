// SPDX-License-Identifier: AGPL-3.0-or-later

//! Artifact storage backend for PEM key and certificate material.
//!
//! Artifacts are addressed by opaque string refs (e.g. `acme/1700000000000/ca_key.pem`)
//! resolved under a single root directory. Callers never handle filesystem
//! paths directly, so the backend can be swapped (object store, secret
//! manager) without touching registry or issuance logic.
//!
//! Writes go to a temp file first and are renamed into place, so a reader
//! never observes a half-written artifact.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("invalid artifact ref: {0}")]
    InvalidRef(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Filesystem-backed artifact store.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a ref to a path under the root.
    ///
    /// Refs must be relative and must not contain `..` components; a ref
    /// stored in the registry must never escape the artifact root.
    fn resolve(&self, artifact_ref: &str) -> StorageResult<PathBuf> {
        let rel = Path::new(artifact_ref);
        let safe = rel.components().all(|c| matches!(c, Component::Normal(_)));
        if artifact_ref.is_empty() || !safe {
            return Err(StorageError::InvalidRef(artifact_ref.to_string()));
        }
        Ok(self.root.join(rel))
    }

    /// Check whether an artifact exists.
    pub fn exists(&self, artifact_ref: &str) -> bool {
        self.resolve(artifact_ref)
            .map(|p| File::open(p).is_ok())
            .unwrap_or(false)
    }

    /// Write an artifact (atomic via temp file + rename).
    pub fn write(&self, artifact_ref: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.resolve(artifact_ref)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(data)?;
            file.flush()?;
        }
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Read an artifact's raw bytes.
    pub fn read(&self, artifact_ref: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(artifact_ref)?;
        let mut file = File::open(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StorageError::NotFound(artifact_ref.to_string())
            } else {
                StorageError::Io(e)
            }
        })?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Delete an artifact. Deleting a missing artifact is not an error, so
    /// rollback paths can call this unconditionally.
    ///
    /// Parent directories emptied by the deletion are pruned up to the
    /// store root, so superseded version directories do not accumulate.
    pub fn delete(&self, artifact_ref: &str) -> StorageResult<()> {
        let path = self.resolve(artifact_ref)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(StorageError::Io(e)),
        }

        // remove_dir fails on non-empty directories, which ends the walk.
        let mut dir = path.parent();
        while let Some(d) = dir {
            if d == self.root || fs::remove_dir(d).is_err() {
                break;
            }
            dir = d.parent();
        }
        Ok(())
    }
}
