//! Filesystem knowledge base store
//!
//! Layout under the documents root:
//!
//! ```text
//! <root>/<name>/index.json      manifest and vectors
//! <root>/<name>/docstore.json   chunks, in vector order
//! <root>/.staging/<uuid>/       in-progress commits
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::ingestion::Chunk;
use crate::domain::knowledge_base::{
    IndexManifest, KnowledgeBaseName, KnowledgeBaseStore, VectorIndex,
};
use crate::domain::DomainError;

pub const STAGING_DIR: &str = ".staging";
const INDEX_FILE: &str = "index.json";
const DOCSTORE_FILE: &str = "docstore.json";

#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    #[serde(flatten)]
    manifest: IndexManifest,
    vectors: Vec<Vec<f32>>,
}

/// Staging directory removed on drop unless it was committed
#[derive(Debug)]
struct StagingDir {
    path: PathBuf,
    armed: bool,
}

impl StagingDir {
    async fn create(staging_root: &Path) -> Result<Self, DomainError> {
        let path = staging_root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&path).await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to create staging directory '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self { path, armed: true })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match std::fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed staging directory"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => error!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove staging directory"
            ),
        }
    }
}

/// Knowledge base store keeping one directory per knowledge base
#[derive(Debug, Clone)]
pub struct FsKnowledgeBaseStore {
    root: PathBuf,
}

impl FsKnowledgeBaseStore {
    /// Open the store, creating the root if needed. Staging data is left alone, see
    /// `sweep_stale_staging`.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let root = root.into();

        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            DomainError::io(format!(
                "Failed to create documents root '{}': {}",
                root.display(),
                e
            ))
        })?;

        info!(root = %root.display(), "Knowledge base store opened");
        Ok(Self { root })
    }

    fn staging_root(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    fn entry_path(&self, name: &KnowledgeBaseName) -> PathBuf {
        self.root.join(name.as_str())
    }

    /// Remove staging directories untouched for at least `older_than`, i.e. commits
    /// left behind by a crashed process. Younger ones may belong to a commit in
    /// flight, possibly in another process sharing the root, and are kept.
    ///
    /// Returns the number of directories removed. Failures are logged, never raised.
    pub async fn sweep_stale_staging(&self, older_than: Duration) -> usize {
        let staging = self.staging_root();
        let mut entries = match tokio::fs::read_dir(&staging).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(path = %staging.display(), error = %e, "Cannot read staging directory");
                return 0;
            }
        };

        let now = SystemTime::now();
        let mut removed = 0;

        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(path = %staging.display(), error = %e, "Cannot read staging directory");
                    break;
                }
            };

            let path = entry.path();
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot read staging entry");
                    continue;
                }
            };

            let age = meta
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();
            if age < older_than {
                continue;
            }

            let result = if meta.is_dir() {
                tokio::fs::remove_dir_all(&path).await
            } else {
                tokio::fs::remove_file(&path).await
            };

            match result {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => error!(path = %path.display(), error = %e, "Failed to sweep staging"),
            }
        }

        if removed > 0 {
            info!(removed, "Swept stale staging directories");
        }

        removed
    }

    async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DomainError> {
        let persistence = |e: std::io::Error| {
            DomainError::persistence(format!("Failed to write '{}': {}", path.display(), e))
        };

        let json = serde_json::to_vec(value).map_err(|e| {
            DomainError::persistence(format!("Failed to serialize '{}': {}", path.display(), e))
        })?;

        let mut file = tokio::fs::File::create(path).await.map_err(persistence)?;
        file.write_all(&json).await.map_err(persistence)?;
        file.sync_all().await.map_err(persistence)?;

        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DomainError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                DomainError::corrupt_index(format!("Missing '{}'", path.display()))
            }
            _ => DomainError::io(format!("Failed to read '{}': {}", path.display(), e)),
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            DomainError::corrupt_index(format!("Failed to parse '{}': {}", path.display(), e))
        })
    }
}

#[async_trait]
impl KnowledgeBaseStore for FsKnowledgeBaseStore {
    async fn list(&self) -> Result<Vec<KnowledgeBaseName>, DomainError> {
        let io = |e: std::io::Error| {
            DomainError::io(format!(
                "Failed to read documents root '{}': {}",
                self.root.display(),
                e
            ))
        };

        let mut entries = tokio::fs::read_dir(&self.root).await.map_err(io)?;
        let mut names = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(io)? {
            if !entry.file_type().await.map_err(io)?.is_dir() {
                continue;
            }

            let Some(file_name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };

            if let Ok(name) = KnowledgeBaseName::new(file_name) {
                names.push(name);
            }
        }

        Ok(names)
    }

    /// A name is taken when it is listed or when anything else already sits at its
    /// path, since `commit` could not rename into it either
    async fn exists(&self, name: &KnowledgeBaseName) -> Result<bool, DomainError> {
        let target = self.entry_path(name);
        tokio::fs::try_exists(&target).await.map_err(|e| {
            DomainError::io(format!("Failed to check '{}': {}", target.display(), e))
        })
    }

    async fn commit(&self, name: &KnowledgeBaseName, index: &VectorIndex) -> Result<(), DomainError> {
        let staging = StagingDir::create(&self.staging_root()).await?;

        let index_file = IndexFile {
            manifest: index.manifest().clone(),
            vectors: index.vectors().to_vec(),
        };
        Self::write_json(&staging.path().join(INDEX_FILE), &index_file).await?;
        Self::write_json(&staging.path().join(DOCSTORE_FILE), index.chunks()).await?;

        let target = self.entry_path(name);
        let exists = tokio::fs::try_exists(&target).await.map_err(|e| {
            DomainError::persistence(format!("Failed to check '{}': {}", target.display(), e))
        })?;
        if exists {
            return Err(DomainError::validation(format!(
                "Knowledge base '{}' already exists",
                name
            )));
        }

        tokio::fs::rename(staging.path(), &target).await.map_err(|e| {
            DomainError::persistence(format!(
                "Failed to move index into '{}': {}",
                target.display(),
                e
            ))
        })?;
        staging.disarm();

        debug!(name = %name, path = %target.display(), "Index committed");
        Ok(())
    }

    async fn load(&self, name: &KnowledgeBaseName) -> Result<VectorIndex, DomainError> {
        let dir = self.entry_path(name);

        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return Err(DomainError::not_found(format!(
                    "Knowledge base '{}' not found",
                    name
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DomainError::not_found(format!(
                    "Knowledge base '{}' not found",
                    name
                )));
            }
            Err(e) => {
                return Err(DomainError::io(format!(
                    "Failed to access '{}': {}",
                    dir.display(),
                    e
                )));
            }
        }

        let index_file: IndexFile = Self::read_json(&dir.join(INDEX_FILE)).await?;
        let chunks: Vec<Chunk> = Self::read_json(&dir.join(DOCSTORE_FILE)).await?;

        VectorIndex::from_parts(index_file.manifest, chunks, index_file.vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ingestion::{ChunkMetadata, DocumentMetadata};
    use crate::domain::knowledge_base::SourceType;

    fn name(s: &str) -> KnowledgeBaseName {
        KnowledgeBaseName::new(s).unwrap()
    }

    fn index() -> VectorIndex {
        let chunks = vec![
            Chunk::new(
                "The deadline is Friday.",
                ChunkMetadata::new(
                    0,
                    0,
                    23,
                    DocumentMetadata::new().with_page_number(1).with_lines(1, 2),
                ),
            ),
            Chunk::new(
                "Budget review on Monday.",
                ChunkMetadata::new(1, 0, 24, DocumentMetadata::new().with_page_number(2)),
            ),
        ];
        VectorIndex::build(
            "all-minilm",
            SourceType::Pdf,
            chunks,
            vec![vec![1.0, 0.0, 0.5], vec![0.0, 1.0, 0.25]],
        )
        .unwrap()
    }

    async fn store() -> (tempfile::TempDir, FsKnowledgeBaseStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsKnowledgeBaseStore::open(dir.path()).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("kb");

        let store = FsKnowledgeBaseStore::open(&root).await.unwrap();

        assert!(root.is_dir());
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_commit_and_load_round_trip() {
        let (_dir, store) = store().await;
        let original = index();

        store.commit(&name("report.pdf"), &original).await.unwrap();
        let loaded = store.load(&name("report.pdf")).await.unwrap();

        assert_eq!(loaded, original);
        assert_eq!(
            loaded.search(&[1.0, 0.0, 0.5], 1).unwrap()[0].chunk.content,
            "The deadline is Friday."
        );
    }

    #[tokio::test]
    async fn test_list_only_returns_directories() {
        let (dir, store) = store().await;
        store.commit(&name("a.txt"), &index()).await.unwrap();
        store.commit(&name("b.pdf"), &index()).await.unwrap();
        std::fs::write(dir.path().join("stray-file.txt"), "x").unwrap();
        std::fs::create_dir(dir.path().join(".hidden")).unwrap();

        let mut names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        names.sort();

        assert_eq!(names, vec!["a.txt", "b.pdf"]);
        assert!(store.exists(&name("a.txt")).await.unwrap());
        assert!(!store.exists(&name("c.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_stray_file_occupies_name() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        assert!(store.list().await.unwrap().is_empty());
        assert!(store.exists(&name("notes.txt")).await.unwrap());
    }

    #[tokio::test]
    async fn test_commit_leaves_no_staging_data() {
        let (dir, store) = store().await;
        store.commit(&name("a.txt"), &index()).await.unwrap();

        let staging: Vec<_> = std::fs::read_dir(dir.path().join(STAGING_DIR))
            .unwrap()
            .collect();
        assert!(staging.is_empty());
        assert!(dir.path().join("a.txt").join(INDEX_FILE).is_file());
        assert!(dir.path().join("a.txt").join(DOCSTORE_FILE).is_file());
    }

    #[tokio::test]
    async fn test_commit_refuses_existing_entry() {
        let (dir, store) = store().await;
        store.commit(&name("a.txt"), &index()).await.unwrap();

        let err = store.commit(&name("a.txt"), &index()).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
        assert_eq!(store.list().await.unwrap().len(), 1);
        let staging: Vec<_> = std::fs::read_dir(dir.path().join(STAGING_DIR))
            .unwrap()
            .collect();
        assert!(staging.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_is_persistence_error() {
        let (dir, store) = store().await;
        std::fs::write(dir.path().join(STAGING_DIR), "blocks staging").unwrap();

        let err = store.commit(&name("a.txt"), &index()).await.unwrap_err();

        assert!(matches!(err, DomainError::Persistence { .. }));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_staging_dir_is_removed() {
        let (dir, _store) = store().await;
        let staging_root = dir.path().join(STAGING_DIR);

        let staging = StagingDir::create(&staging_root).await.unwrap();
        let path = staging.path().to_path_buf();
        std::fs::write(path.join(INDEX_FILE), "{}").unwrap();
        assert!(path.is_dir());

        drop(staging);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_sweep_removes_only_old_staging() {
        let (dir, store) = store().await;
        let crashed = dir.path().join(STAGING_DIR).join("crashed");
        std::fs::create_dir_all(&crashed).unwrap();

        assert_eq!(store.sweep_stale_staging(Duration::from_secs(3600)).await, 0);
        assert!(crashed.is_dir());

        assert_eq!(store.sweep_stale_staging(Duration::ZERO).await, 1);
        assert!(!crashed.exists());
        assert_eq!(store.sweep_stale_staging(Duration::ZERO).await, 0);
    }

    #[tokio::test]
    async fn test_second_store_on_same_root_keeps_commit_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let first = FsKnowledgeBaseStore::open(dir.path()).await.unwrap();

        let staging = StagingDir::create(&first.staging_root()).await.unwrap();
        std::fs::write(staging.path().join(INDEX_FILE), "{}").unwrap();

        let second = FsKnowledgeBaseStore::open(dir.path()).await.unwrap();
        second.sweep_stale_staging(Duration::from_secs(3600)).await;
        assert!(staging.path().join(INDEX_FILE).is_file());

        first.commit(&name("a.txt"), &index()).await.unwrap();
        assert_eq!(second.list().await.unwrap(), vec![name("a.txt")]);
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (_dir, store) = store().await;
        let err = store.load(&name("missing.txt")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_load_corrupt_index() {
        let (dir, store) = store().await;
        store.commit(&name("a.txt"), &index()).await.unwrap();
        store.commit(&name("b.txt"), &index()).await.unwrap();
        store.commit(&name("c.txt"), &index()).await.unwrap();

        std::fs::write(dir.path().join("a.txt").join(INDEX_FILE), "{not json").unwrap();
        std::fs::remove_file(dir.path().join("b.txt").join(DOCSTORE_FILE)).unwrap();

        let index_path = dir.path().join("c.txt").join(INDEX_FILE);
        let mut json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&index_path).unwrap()).unwrap();
        json["dimensions"] = serde_json::json!(8);
        std::fs::write(&index_path, serde_json::to_vec(&json).unwrap()).unwrap();

        for n in ["a.txt", "b.txt", "c.txt"] {
            let err = store.load(&name(n)).await.unwrap_err();
            assert!(
                matches!(err, DomainError::CorruptIndex { .. }),
                "{n}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_unreadable_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("kb");
        let store = FsKnowledgeBaseStore::open(&root).await.unwrap();

        std::fs::remove_dir_all(&root).unwrap();
        std::fs::write(&root, "not a directory").unwrap();

        let err = store.list().await.unwrap_err();
        assert!(matches!(err, DomainError::Io { .. }));
    }

    #[tokio::test]
    async fn test_complete_reads_catalog() {
        let (_dir, store) = store().await;
        store.commit(&name("notes.txt"), &index()).await.unwrap();
        store.commit(&name("report.pdf"), &index()).await.unwrap();

        assert_eq!(store.complete("/not").await.unwrap(), vec![name("notes.txt")]);
        assert!(store.complete("/zzz").await.unwrap().is_empty());
    }
}
