use crate::traits::ChangeEvent;
use async_trait::async_trait;
use panelboard_core::{KeyValueStore, PanelboardResult};
use serde_json::{Map, Value};
use tokio::sync::{broadcast, RwLock};

/// In-process store, shared by every session holding a clone of its `Arc`.
///
/// Each `set`/`remove` is announced on a broadcast channel, the same way a
/// browser's storage area reports changes to every open page.
pub struct MemoryStore {
    data: RwLock<Map<String, Value>>,
    tx: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_data(Map::new())
    }

    pub fn with_data(data: Map<String, Value>) -> Self {
        let (tx, _) = broadcast::channel(32);
        Self {
            data: RwLock::new(data),
            tx,
        }
    }

    /// Copy of every key currently stored.
    pub async fn snapshot(&self) -> Map<String, Value> {
        self.data.read().await.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.tx.subscribe()
    }

    fn announce(&self, keys: Vec<String>) {
        // No subscribers is fine
        let _ = self.tx.send(ChangeEvent::for_keys(keys));
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, keys: &[String]) -> PanelboardResult<Map<String, Value>> {
        let data = self.data.read().await;
        Ok(keys
            .iter()
            .filter_map(|k| data.get(k).map(|v| (k.clone(), v.clone())))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> PanelboardResult<()> {
        let keys: Vec<String> = items.keys().cloned().collect();
        self.data.write().await.extend(items);
        self.announce(keys);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> PanelboardResult<()> {
        {
            let mut data = self.data.write().await;
            for key in keys {
                data.remove(key);
            }
        }
        self.announce(keys.to_vec());
        Ok(())
    }
}
