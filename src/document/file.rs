//! FileDocumentStore - one pretty-printed JSON file per collection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::{debug, info};

use super::store::{encode, DocumentStore, LoadOrigin, RawDocument, Snapshot};
use crate::error::StoreError;

static TEMP_SEQ: AtomicU64 = AtomicU64::new(1);

/// Document store backed by a directory of `<collection>.json` files.
///
/// The directory is created on first access. Saves write a sibling temporary
/// file and rename it over the target, so readers see either the old or the
/// new document, never a torn one.
pub struct FileDocumentStore {
    root: PathBuf,
    prepared: AtomicBool,
}

impl FileDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            prepared: AtomicBool::new(false),
        }
    }

    /// Directory holding the collection files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `collection`.
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.root.join(format!("{}.json", collection))
    }

    fn prepare(&self, collection: &str) -> Result<(), StoreError> {
        if self.prepared.load(Ordering::Acquire) {
            return Ok(());
        }
        fs::create_dir_all(&self.root).map_err(|e| StoreError::storage(collection, e))?;
        if !self.prepared.swap(true, Ordering::AcqRel) {
            info!(root = %self.root.display(), "data directory ready");
        }
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn load(&self, collection: &str) -> Result<Snapshot, StoreError> {
        self.prepare(collection)?;
        let path = self.path_for(collection);
        match fs::read(&path) {
            Ok(bytes) => Ok(Snapshot::decode(collection, &bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(collection, "no collection file yet, starting empty");
                Ok(Snapshot::empty(LoadOrigin::Missing))
            }
            Err(err) => Err(StoreError::storage(collection, err)),
        }
    }

    fn save(&self, collection: &str, document: &RawDocument) -> Result<(), StoreError> {
        self.prepare(collection)?;
        let bytes = encode(document)?;
        let path = self.path_for(collection);
        let temp = self.root.join(format!(
            ".{}.json.{}.{}.tmp",
            collection,
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        if let Err(err) = fs::write(&temp, &bytes) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::storage(collection, err));
        }
        if let Err(err) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(StoreError::storage(collection, err));
        }

        debug!(collection, bytes = bytes.len(), "saved collection");
        Ok(())
    }
}
