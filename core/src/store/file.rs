//! File-backed slot store.
//!
//! Each slot is one JSON file under the data directory. Writes go through a
//! temp file and rename so a crash mid-write cannot leave a half-written
//! slot behind.

use super::SlotStore;
use crate::{AtelierError, Result};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persistent `SlotStore` writing one file per slot
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| AtelierError::StorageError(format!("create {}: {e}", dir.display())))?;
        info!(target: "store", dir = %dir.display(), "File slot store initialized");
        Ok(Self { dir })
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

#[async_trait]
impl SlotStore for FileSlot {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        let path = self.slot_path(slot);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AtelierError::StorageError(format!(
                "read {}: {e}",
                path.display()
            ))),
        }
    }

    async fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        let path = self.slot_path(slot);
        let tmp = self.dir.join(format!("{slot}.json.tmp"));
        fs::write(&tmp, data)
            .map_err(|e| AtelierError::StorageError(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path)
            .map_err(|e| AtelierError::StorageError(format!("rename {}: {e}", path.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_slot_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path()).unwrap();
        assert!(slot.read("absent").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path()).unwrap();

        slot.write("portfolio_projects", b"[1,2,3]").await.unwrap();
        assert_eq!(
            slot.read("portfolio_projects").await.unwrap().unwrap(),
            b"[1,2,3]"
        );

        // No stray temp file left behind
        assert!(!dir.path().join("portfolio_projects.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_slots_are_independent_files() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::new(dir.path()).unwrap();

        slot.write("a", b"aa").await.unwrap();
        slot.write("b", b"bb").await.unwrap();
        assert_eq!(slot.read("a").await.unwrap().unwrap(), b"aa");
        assert_eq!(slot.read("b").await.unwrap().unwrap(), b"bb");
    }
}
