//! Capability contracts for the collaborators the organizer talks to.
//!
//! None of these promise transactions or ordering across callers; every
//! implementation is free to interleave with other processes.

use crate::PanelboardResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// String-keyed JSON store shared by every open view.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Values for the requested keys. Absent keys are missing from the map.
    async fn get(&self, keys: &[String]) -> PanelboardResult<Map<String, Value>>;

    /// Write every entry in one call. Not all-or-nothing across keys.
    async fn set(&self, items: Map<String, Value>) -> PanelboardResult<()>;

    async fn remove(&self, keys: &[String]) -> PanelboardResult<()>;

    async fn get_one(&self, key: &str) -> PanelboardResult<Option<Value>> {
        let mut values = self.get(&[key.to_string()]).await?;
        Ok(values.remove(key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFolder {
    pub id: String,
    pub title: String,
}

/// A bookmark or a folder; folders have no url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    pub id: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.url.is_none()
    }
}

#[async_trait]
pub trait BookmarkProvider: Send + Sync {
    /// Every folder in the tree, depth-first from the root.
    async fn list_folders(&self) -> PanelboardResult<Vec<BookmarkFolder>>;

    /// Direct children of a folder, in order.
    async fn list_children(&self, folder_id: &str) -> PanelboardResult<Vec<BookmarkNode>>;

    async fn get(&self, id: &str) -> PanelboardResult<Option<BookmarkNode>>;

    async fn create(
        &self,
        parent_id: &str,
        title: String,
        url: Option<String>,
    ) -> PanelboardResult<BookmarkNode>;

    async fn update(
        &self,
        id: &str,
        title: Option<String>,
        url: Option<String>,
    ) -> PanelboardResult<BookmarkNode>;

    async fn remove(&self, id: &str) -> PanelboardResult<()>;

    async fn move_node(&self, id: &str, parent_id: &str, index: usize) -> PanelboardResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TabHandle(pub u64);

impl std::fmt::Display for TabHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tab#{}", self.0)
    }
}

/// What a tab is told to do by whoever controls it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabSignal {
    /// Re-read storage and redraw.
    Reload,
    Focus,
}

#[async_trait]
pub trait TabController: Send + Sync {
    async fn find_tabs(&self, url: &str) -> PanelboardResult<Vec<TabHandle>>;
    async fn reload(&self, tab: TabHandle) -> PanelboardResult<()>;
    async fn focus(&self, tab: TabHandle) -> PanelboardResult<()>;
    async fn create_tab(&self, url: &str) -> PanelboardResult<TabHandle>;
}
