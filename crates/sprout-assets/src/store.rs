//! Persistence of emitted asset files.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use indexmap::IndexMap;

/// An asset file produced by the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    /// File name relative to the image directory
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Destination of emitted assets.
pub trait AssetStore {
    /// Persist one asset.
    fn persist(&self, asset: &EmittedAsset) -> io::Result<()>;

    /// Persist every asset, returning how many were written.
    fn persist_all(&self, assets: &[EmittedAsset]) -> io::Result<usize> {
        for asset in assets {
            self.persist(asset)?;
        }
        Ok(assets.len())
    }
}

/// In-memory store, keyed by file name.
#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    files: Mutex<IndexMap<String, Vec<u8>>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes stored under `file_name`.
    pub fn get(&self, file_name: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(file_name).cloned()
    }

    /// Stored file names, in write order.
    pub fn file_names(&self) -> Vec<String> {
        self.files
            .lock()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl AssetStore for MemoryAssetStore {
    fn persist(&self, asset: &EmittedAsset) -> io::Result<()> {
        let mut files = self
            .files
            .lock()
            .map_err(|_| io::Error::other("asset store poisoned"))?;
        files.insert(asset.file_name.clone(), asset.bytes.clone());
        Ok(())
    }
}

/// Store writing files under a directory.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    dir: PathBuf,
}

impl DirAssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetStore for DirAssetStore {
    fn persist(&self, asset: &EmittedAsset) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(&asset.file_name), &asset.bytes)?;
        tracing::debug!(file = %asset.file_name, bytes = asset.bytes.len(), "wrote asset");
        Ok(())
    }
}
