//! Project persistence.
//!
//! The system of record is a single named slot holding the JSON encoding of
//! the whole project collection. `SlotStore` is the storage seam: backends
//! only need to read and write opaque bytes for a slot name, so the
//! collection can live in memory, in a file, or behind a remote store
//! interchangeably. Every mutation is a full-collection replace; there are
//! no field-level writes.

mod file;
mod memory;

pub use file::FileSlot;
pub use memory::InMemorySlot;

use crate::project::{default_projects, Project};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Slot name the project collection is persisted under
pub const PROJECTS_SLOT: &str = "portfolio_projects";

/// Storage seam: one named slot of opaque bytes
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read the slot's current contents, `None` if it was never written
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite the slot's contents
    async fn write(&self, slot: &str, data: &[u8]) -> Result<()>;
}

/// Reads and writes the project collection through a `SlotStore`.
///
/// First `load()` against an empty slot seeds the built-in defaults and
/// persists them immediately, so every later load is deterministic.
pub struct ProjectStore {
    slot: Arc<dyn SlotStore>,
    slot_name: String,
}

impl ProjectStore {
    pub fn new(slot: Arc<dyn SlotStore>) -> Self {
        Self {
            slot,
            slot_name: PROJECTS_SLOT.to_string(),
        }
    }

    pub fn with_slot_name(slot: Arc<dyn SlotStore>, slot_name: impl Into<String>) -> Self {
        Self {
            slot,
            slot_name: slot_name.into(),
        }
    }

    /// Load the persisted collection.
    ///
    /// Corrupt slot data falls back to the default collection with a logged
    /// diagnostic; it never fails the caller. An absent slot is seeded with
    /// the defaults and the seed is persisted before returning.
    pub async fn load(&self) -> Result<Vec<Project>> {
        match self.slot.read(&self.slot_name).await? {
            Some(bytes) => match serde_json::from_slice::<Vec<Project>>(&bytes) {
                Ok(projects) => {
                    debug!(
                        target: "store",
                        slot = %self.slot_name,
                        count = projects.len(),
                        "Loaded project collection"
                    );
                    Ok(projects)
                }
                Err(e) => {
                    warn!(
                        target: "store",
                        slot = %self.slot_name,
                        error = %e,
                        "Persisted project data is corrupt; falling back to defaults"
                    );
                    Ok(default_projects())
                }
            },
            None => {
                let defaults = default_projects();
                if let Err(e) = self.save(&defaults).await {
                    // The in-memory defaults still serve this session
                    warn!(
                        target: "store",
                        slot = %self.slot_name,
                        error = %e,
                        "Failed to persist seed collection"
                    );
                }
                Ok(defaults)
            }
        }
    }

    /// Replace the persisted collection wholesale. Subsequent `load()` calls
    /// return exactly this collection until the next `save()`.
    pub async fn save(&self, projects: &[Project]) -> Result<()> {
        let bytes = serde_json::to_vec(projects)?;
        self.slot.write(&self.slot_name, &bytes).await?;
        debug!(
            target: "store",
            slot = %self.slot_name,
            count = projects.len(),
            "Saved project collection"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{upsert, ProjectDetails};

    fn sample(id: &str) -> Project {
        Project {
            id: id.to_string(),
            title: format!("Project {id}"),
            kind: "Web Design".to_string(),
            tools: vec!["Wix".to_string()],
            image: String::new(),
            description: "A sample project.".to_string(),
            details: ProjectDetails::default(),
        }
    }

    #[tokio::test]
    async fn test_first_load_seeds_and_persists_defaults() {
        let slot = InMemorySlot::new();
        let store = ProjectStore::new(slot.clone());

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, default_projects());

        // The seed must have been written, not just returned
        let raw = slot.read(PROJECTS_SLOT).await.unwrap().unwrap();
        let persisted: Vec<Project> = serde_json::from_slice(&raw).unwrap();
        assert_eq!(persisted, default_projects());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips_exactly() {
        let store = ProjectStore::new(InMemorySlot::new());
        let collection = vec![sample("a"), sample("b")];

        store.save(&collection).await.unwrap();
        assert_eq!(store.load().await.unwrap(), collection);
    }

    #[tokio::test]
    async fn test_upsert_through_store_is_idempotent_per_id() {
        let store = ProjectStore::new(InMemorySlot::new());
        let mut collection = store.load().await.unwrap();

        let p = sample("fresh");
        upsert(&mut collection, p.clone());
        store.save(&collection).await.unwrap();

        // Saving the same project again must not duplicate it
        let mut again = store.load().await.unwrap();
        upsert(&mut again, p.clone());
        store.save(&again).await.unwrap();

        let final_state = store.load().await.unwrap();
        let matches: Vec<_> = final_state.iter().filter(|x| x.id == "fresh").collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(*matches[0], p);
    }

    #[tokio::test]
    async fn test_corrupt_slot_falls_back_to_defaults() {
        let slot = InMemorySlot::new();
        slot.write(PROJECTS_SLOT, b"{not json at all").await.unwrap();

        let store = ProjectStore::new(slot.clone());
        assert_eq!(store.load().await.unwrap(), default_projects());

        // Fallback must not clobber whatever is in the slot
        let raw = slot.read(PROJECTS_SLOT).await.unwrap().unwrap();
        assert_eq!(raw, b"{not json at all");
    }

    #[tokio::test]
    async fn test_delete_of_absent_id_leaves_collection_unchanged() {
        let store = ProjectStore::new(InMemorySlot::new());
        let collection = store.load().await.unwrap();

        let mut edited = collection.clone();
        crate::project::remove_by_id(&mut edited, "no-such-id");
        store.save(&edited).await.unwrap();

        assert_eq!(store.load().await.unwrap(), collection);
    }
}
