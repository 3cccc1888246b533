// # File Ownership Store
//
// One file per `(record type, domain)` key inside a dedicated directory
// (conventionally `<secrets dir>/zone_records`). The file's existence is
// the ownership claim; its JSON body carries the provider record id and
// the creation timestamp.
//
// Writes are atomic (temp file + rename) so a crash can never leave a
// half-written claim: either the old entry survives or the new one does.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::Error;
use crate::traits::dns_query::RecordType;
use crate::traits::ownership_store::{OwnershipRecord, OwnershipStore, ownership_key};

/// File-based ownership store
#[derive(Debug)]
pub struct FileOwnershipStore {
    dir: PathBuf,
}

impl FileOwnershipStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn new<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await.map_err(|e| {
            Error::ownership_store(format!(
                "failed to create ownership directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self { dir })
    }

    fn entry_path(&self, record_type: RecordType, domain: &str) -> PathBuf {
        self.dir.join(ownership_key(record_type, domain))
    }
}

#[async_trait]
impl OwnershipStore for FileOwnershipStore {
    async fn get(
        &self,
        record_type: RecordType,
        domain: &str,
    ) -> Result<Option<OwnershipRecord>, Error> {
        let path = self.entry_path(record_type, domain);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::ownership_store(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        let record: OwnershipRecord = serde_json::from_str(&content).map_err(|e| {
            Error::ownership_store(format!(
                "failed to parse {}: {e}. The entry may be corrupted; \
                inspect it before re-running.",
                path.display()
            ))
        })?;
        Ok(Some(record))
    }

    async fn put(
        &self,
        record_type: RecordType,
        domain: &str,
        record: &OwnershipRecord,
    ) -> Result<(), Error> {
        let path = self.entry_path(record_type, domain);
        let json = serde_json::to_string_pretty(record)?;

        // Write to a temp file first, then rename into place
        let mut temp_path = path.clone();
        temp_path.set_extension("tmp");
        fs::write(&temp_path, json.as_bytes()).await.map_err(|e| {
            Error::ownership_store(format!(
                "failed to write {}: {e}",
                temp_path.display()
            ))
        })?;
        fs::rename(&temp_path, &path).await.map_err(|e| {
            Error::ownership_store(format!(
                "failed to rename {} to {}: {e}",
                temp_path.display(),
                path.display()
            ))
        })?;

        tracing::debug!("Ownership entry written: {}", path.display());
        Ok(())
    }

    async fn remove(&self, record_type: RecordType, domain: &str) -> Result<(), Error> {
        let path = self.entry_path(record_type, domain);
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Ownership entry removed: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::ownership_store(format!(
                "failed to remove {}: {e}",
                path.display()
            ))),
        }
    }
}
