use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{PersistenceMetadata, FORMAT_VERSION};
use async_trait::async_trait;
use panelboard_core::{KeyValueStore, PanelboardError, PanelboardResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Key-value store kept as one JSON document on disk.
///
/// Writes are read-modify-write of the whole file, serialized within this
/// process. Separate processes are not coordinated: the last rename wins.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
    write_lock: Mutex<()>,
}

/// On-disk layout of the data file
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: Map<String, Value>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_instance_id(path, Uuid::new_v4())
    }

    pub fn with_instance_id(path: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id,
            write_lock: Mutex::new(()),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// Every stored key. A missing file is an empty store.
    pub async fn load_all(&self) -> PanelboardResult<Map<String, Value>> {
        let Some(bytes) = AtomicWriter::read_if_exists(&self.path).await? else {
            return Ok(Map::new());
        };
        let envelope: JsonEnvelope = serde_json::from_slice(&bytes).map_err(|e| {
            PanelboardError::Serialization(format!("{}: {}", self.path.display(), e))
        })?;
        if envelope.version != FORMAT_VERSION {
            return Err(PanelboardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }
        Ok(envelope.data)
    }

    async fn write_all(&self, data: Map<String, Value>) -> PanelboardResult<()> {
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(self.instance_id),
            data,
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| PanelboardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;
        tracing::info!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, keys: &[String]) -> PanelboardResult<Map<String, Value>> {
        let mut data = self.load_all().await?;
        Ok(keys
            .iter()
            .filter_map(|k| data.remove(k).map(|v| (k.clone(), v)))
            .collect())
    }

    async fn set(&self, items: Map<String, Value>) -> PanelboardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load_all().await?;
        data.extend(items);
        self.write_all(data).await
    }

    async fn remove(&self, keys: &[String]) -> PanelboardResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load_all().await?;
        let before = data.len();
        for key in keys {
            data.remove(key);
        }
        if data.len() == before {
            return Ok(());
        }
        self.write_all(data).await
    }
}
