use crate::library::logger::interface::Logger;
use crate::storage::interface::{Storage, StorageError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Stores each key as `<dir>/<key>.json`.
pub struct StorageFile {
    dir: PathBuf,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl StorageFile {
    pub fn new(dir: impl Into<PathBuf>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            dir: dir.into(),
            logger: logger.with_namespace("storage").with_namespace("file"),
        }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::Io(format!("invalid storage key {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for StorageFile {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!("{}: {}", path.display(), e))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| StorageError::Io(format!("{}: {}", self.dir.display(), e)))?;

        // Write a sibling file, then rename over the old value.
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value).map_err(|e| StorageError::Io(format!("{}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &path).map_err(|e| StorageError::Io(format!("{}: {}", path.display(), e)))?;

        let _ = self.logger.info(&format!("Saved {}", path.display()));
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!("{}: {}", path.display(), e))),
        }
    }
}
