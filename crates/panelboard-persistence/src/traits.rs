use async_trait::async_trait;
use chrono::{DateTime, Utc};
use panelboard_core::PanelboardResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// Metadata written alongside the data of a file-backed store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    pub format_version: u32,
    /// ID of the process that performed the save
    pub instance_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(instance_id: Uuid) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Something in a store changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    /// Keys written or removed; empty when only the file is known to have changed.
    pub keys: Vec<String>,
    /// Backing file, for file-based stores
    pub path: Option<PathBuf>,
    pub detected_at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn for_keys(keys: Vec<String>) -> Self {
        Self {
            keys,
            path: None,
            detected_at: Utc::now(),
        }
    }

    pub fn for_path(path: PathBuf) -> Self {
        Self {
            keys: Vec::new(),
            path: Some(path),
            detected_at: Utc::now(),
        }
    }

    pub fn touches(&self, key: &str) -> bool {
        self.keys.is_empty() || self.keys.iter().any(|k| k == key)
    }
}

/// Watches a backing file so other processes' writes can be picked up
#[async_trait]
pub trait ChangeDetector: Send + Sync {
    async fn start_watching(&self, path: PathBuf) -> PanelboardResult<()>;

    async fn stop_watching(&self) -> PanelboardResult<()>;

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChangeEvent>;

    fn is_watching(&self) -> bool;
}
