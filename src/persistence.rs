// File: src/persistence.rs
use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::NamedTempFile;

/// Key under which the word collection is saved.
pub const SAVED_WORDS_KEY: &str = "savedWords";

/// Key-value blob transport the word store persists through.
pub trait BlobStore {
    /// Returns `None` when nothing has been written under `key` yet.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn write(&mut self, key: &str, value: &[u8]) -> Result<()>;
}

/// Stores each key as a file inside `root`.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path_for(key);
        let parent_dir = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent_dir)?;

        // Write beside the target, then rename over it so readers never see a torn file.
        let mut temp_file = NamedTempFile::new_in(parent_dir)?;
        temp_file.write_all(value)?;
        temp_file.as_file().sync_all()?;
        temp_file.persist(&path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-process blob store. Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `key` with raw bytes, e.g. to simulate corrupt saved data.
    pub fn insert(&self, key: &str, value: impl Into<Vec<u8>>) {
        self.blobs.borrow_mut().insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.get(key))
    }

    fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.insert(key, value);
        Ok(())
    }
}
