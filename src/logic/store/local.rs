use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{validate_key, ObjectStore, StoreError};

/// Directory-backed store: `<root>/<namespace>/<key>`
pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, namespace: &str) -> Self {
        Self {
            base_dir: root.into().join(namespace),
        }
    }

    /// Get the default store root
    pub fn default_root() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("injury-risk")
            .join("store")
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.base_dir.join(key))
    }
}

fn write_synced(path: &Path, body: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(body)?;
    file.sync_all()
}

impl ObjectStore for LocalStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Write through a sibling temp file and rename
    fn put(&self, key: &str, body: &[u8], _content_type: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        let written = write_synced(&tmp, body).and_then(|()| fs::rename(&tmp, &path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Io(e));
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.path_for(key)?.is_file())
    }

    fn describe(&self) -> String {
        format!("local:{}", self.base_dir.display())
    }
}
