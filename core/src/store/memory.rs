//! In-memory slot store.
//!
//! Uses DashMap for concurrent access. Suitable for development and testing;
//! production deployments use `FileSlot`.

use super::SlotStore;
use crate::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Volatile `SlotStore` backed by a concurrent map
#[derive(Default)]
pub struct InMemorySlot {
    slots: DashMap<String, Vec<u8>>,
}

impl InMemorySlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            slots: DashMap::new(),
        })
    }
}

#[async_trait]
impl SlotStore for InMemorySlot {
    async fn read(&self, slot: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.slots.get(slot).map(|entry| entry.value().clone()))
    }

    async fn write(&self, slot: &str, data: &[u8]) -> Result<()> {
        self.slots.insert(slot.to_string(), data.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_before_write_is_none() {
        let slot = InMemorySlot::new();
        assert!(slot.read("empty").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_overwrites() {
        let slot = InMemorySlot::new();
        slot.write("s", b"one").await.unwrap();
        slot.write("s", b"two").await.unwrap();
        assert_eq!(slot.read("s").await.unwrap().unwrap(), b"two");
    }
}
