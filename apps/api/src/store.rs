//! Flat-file persistence: JSON metadata maps plus the uploaded documents.
//!
//! Each metadata file is re-read on every call and rewritten whole on save.
//! There is no locking; concurrent read-modify-write cycles can lose updates.

use std::io::Write;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::models::job::JobRecord;
use crate::models::resume::ResumeRecord;

pub const RESUMES_DIR: &str = "resumes";
pub const JOBS_DIR: &str = "job_descriptions";
pub const RESUME_META: &str = "resumes_meta.json";
pub const JOB_META: &str = "jds_meta.json";

/// `id → record`, kept in the order records were added.
pub type MetaMap<T> = IndexMap<String, T>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed metadata in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Background write task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A JSON file holding an `id → record` map.
#[derive(Debug, Clone)]
pub struct MetaFile<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> MetaFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the map, or an empty one when the file does not exist yet.
    pub async fn load(&self) -> Result<MetaMap<T>, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(MetaMap::new()),
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        serde_json::from_slice(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the file contents with `meta`, via a temp file and rename.
    pub async fn save(&self, meta: &MetaMap<T>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(meta).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes)).await??;
        debug!("Saved {} records to {}", meta.len(), self.path().display());
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(path, e))?;
    tmp.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    tmp.flush().map_err(|e| StoreError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

/// Data directory layout: document folders plus one metadata file per kind.
#[derive(Debug, Clone)]
pub struct DataStore {
    resumes_dir: PathBuf,
    jobs_dir: PathBuf,
    pub resumes: MetaFile<ResumeRecord>,
    pub jobs: MetaFile<JobRecord>,
}

impl DataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            resumes_dir: root.join(RESUMES_DIR),
            jobs_dir: root.join(JOBS_DIR),
            resumes: MetaFile::new(root.join(RESUME_META)),
            jobs: MetaFile::new(root.join(JOB_META)),
        }
    }

    /// Creates the document directories if they are missing.
    pub async fn ensure_layout(&self) -> Result<(), StoreError> {
        for dir in [&self.resumes_dir, &self.jobs_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| StoreError::io(dir, e))?;
        }
        info!(
            "Data layout ready: {} and {}",
            self.resumes_dir.display(),
            self.jobs_dir.display()
        );
        Ok(())
    }

    pub fn resume_path(&self, filename: &str) -> PathBuf {
        self.resumes_dir.join(filename)
    }

    pub fn job_path(&self, filename: &str) -> PathBuf {
        self.jobs_dir.join(filename)
    }

    pub async fn write_document(&self, path: &Path, contents: &[u8]) -> Result<(), StoreError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| StoreError::io(path, e))
    }

    pub async fn read_document(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }

    /// Removes a stored document. Returns `false` if it was already gone.
    pub async fn remove_document(&self, path: &Path) -> Result<bool, StoreError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::io(path, e)),
        }
    }
}
