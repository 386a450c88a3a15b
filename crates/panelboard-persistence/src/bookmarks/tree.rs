//! A bookmark tree held in memory and saved as nested JSON, shaped like
//! the tree a browser hands to extensions.

use crate::store::AtomicWriter;
use async_trait::async_trait;
use panelboard_core::{
    BookmarkFolder, BookmarkNode, BookmarkProvider, PanelboardError, PanelboardResult,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const ROOT_ID: &str = "0";

/// Nested on-disk form. Folders have no url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn folder(id: &str, title: &str, children: Vec<TreeNode>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            url: None,
            children,
        }
    }
}

#[derive(Debug, Clone)]
struct NodeRecord {
    parent_id: Option<String>,
    title: String,
    url: Option<String>,
    children: Vec<String>,
}

#[derive(Debug)]
struct TreeState {
    nodes: HashMap<String, NodeRecord>,
    next_id: u64,
}

impl TreeState {
    fn node(&self, id: &str) -> PanelboardResult<&NodeRecord> {
        self.nodes
            .get(id)
            .ok_or_else(|| PanelboardError::NotFound(format!("bookmark {}", id)))
    }

    fn folder(&self, id: &str) -> PanelboardResult<&NodeRecord> {
        let node = self.node(id)?;
        if node.url.is_some() {
            return Err(PanelboardError::Bookmark(format!(
                "{} is a bookmark, not a folder",
                id
            )));
        }
        Ok(node)
    }

    fn to_public(&self, id: &str) -> PanelboardResult<BookmarkNode> {
        let node = self.node(id)?;
        Ok(BookmarkNode {
            id: id.to_string(),
            parent_id: node.parent_id.clone(),
            title: node.title.clone(),
            url: node.url.clone(),
        })
    }

    fn is_within(&self, id: &str, ancestor: &str) -> bool {
        let mut current = Some(id.to_string());
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(|n| n.parent_id.clone());
        }
        false
    }

    fn detach(&mut self, id: &str) {
        let parent = self.nodes.get(id).and_then(|n| n.parent_id.clone());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| c != id);
        }
    }

    fn insert(&mut self, parent_id: Option<&str>, node: &TreeNode) {
        self.nodes.insert(
            node.id.clone(),
            NodeRecord {
                parent_id: parent_id.map(str::to_string),
                title: node.title.clone(),
                url: node.url.clone(),
                children: node.children.iter().map(|c| c.id.clone()).collect(),
            },
        );
        if let Ok(numeric) = node.id.parse::<u64>() {
            self.next_id = self.next_id.max(numeric + 1);
        }
        for child in &node.children {
            self.insert(Some(&node.id), child);
        }
    }

    fn build(&self, id: &str) -> Option<TreeNode> {
        let node = self.nodes.get(id)?;
        Some(TreeNode {
            id: id.to_string(),
            title: node.title.clone(),
            url: node.url.clone(),
            children: node.children.iter().filter_map(|c| self.build(c)).collect(),
        })
    }
}

pub struct BookmarkTree {
    state: RwLock<TreeState>,
}

impl BookmarkTree {
    /// Root `0` holding the bookmarks bar (`1`) and other bookmarks (`2`).
    pub fn with_default_roots() -> Self {
        Self::from_tree(&TreeNode::folder(
            ROOT_ID,
            "",
            vec![
                TreeNode::folder("1", "Bookmarks Bar", Vec::new()),
                TreeNode::folder("2", "Other Bookmarks", Vec::new()),
            ],
        ))
    }

    pub fn from_tree(root: &TreeNode) -> Self {
        let mut state = TreeState {
            nodes: HashMap::new(),
            next_id: 1,
        };
        state.insert(None, root);
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn from_json_str(data: &str) -> PanelboardResult<Self> {
        let root: TreeNode = serde_json::from_str(data)
            .map_err(|e| PanelboardError::Bookmark(format!("Invalid bookmark tree: {}", e)))?;
        if root.url.is_some() {
            return Err(PanelboardError::Bookmark(
                "The tree root must be a folder".to_string(),
            ));
        }
        Ok(Self::from_tree(&root))
    }

    /// Load from `path`; a missing file gives the default roots.
    pub async fn load(path: &Path) -> PanelboardResult<Self> {
        match AtomicWriter::read_if_exists(path).await? {
            Some(bytes) => Self::from_json_str(&String::from_utf8_lossy(&bytes)),
            None => Ok(Self::with_default_roots()),
        }
    }

    pub async fn save(&self, path: &Path) -> PanelboardResult<()> {
        let bytes = serde_json::to_vec_pretty(&self.to_tree())
            .map_err(|e| PanelboardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(path, &bytes).await
    }

    pub fn to_tree(&self) -> TreeNode {
        self.state
            .read()
            .build(ROOT_ID)
            .unwrap_or_else(|| TreeNode::folder(ROOT_ID, "", Vec::new()))
    }
}

#[async_trait]
impl BookmarkProvider for BookmarkTree {
    async fn list_folders(&self) -> PanelboardResult<Vec<BookmarkFolder>> {
        let state = self.state.read();
        let mut folders = Vec::new();
        let mut pending = vec![ROOT_ID.to_string()];
        while let Some(id) = pending.pop() {
            let Some(node) = state.nodes.get(&id) else {
                continue;
            };
            if node.url.is_some() {
                continue;
            }
            folders.push(BookmarkFolder {
                id: id.clone(),
                title: node.title.clone(),
            });
            pending.extend(node.children.iter().rev().cloned());
        }
        Ok(folders)
    }

    async fn list_children(&self, folder_id: &str) -> PanelboardResult<Vec<BookmarkNode>> {
        let state = self.state.read();
        state
            .folder(folder_id)?
            .children
            .iter()
            .map(|c| state.to_public(c))
            .collect()
    }

    async fn get(&self, id: &str) -> PanelboardResult<Option<BookmarkNode>> {
        let state = self.state.read();
        Ok(state.to_public(id).ok())
    }

    async fn create(
        &self,
        parent_id: &str,
        title: String,
        url: Option<String>,
    ) -> PanelboardResult<BookmarkNode> {
        let mut state = self.state.write();
        state.folder(parent_id)?;

        let id = state.next_id.to_string();
        state.next_id += 1;
        state.nodes.insert(
            id.clone(),
            NodeRecord {
                parent_id: Some(parent_id.to_string()),
                title,
                url,
                children: Vec::new(),
            },
        );
        if let Some(parent) = state.nodes.get_mut(parent_id) {
            parent.children.push(id.clone());
        }
        state.to_public(&id)
    }

    async fn update(
        &self,
        id: &str,
        title: Option<String>,
        url: Option<String>,
    ) -> PanelboardResult<BookmarkNode> {
        let mut state = self.state.write();
        let is_folder = state.node(id)?.url.is_none();
        if is_folder && url.is_some() {
            return Err(PanelboardError::Bookmark(format!(
                "cannot set a url on folder {}",
                id
            )));
        }
        if let Some(node) = state.nodes.get_mut(id) {
            if let Some(title) = title {
                node.title = title;
            }
            if url.is_some() {
                node.url = url;
            }
        }
        state.to_public(id)
    }

    async fn remove(&self, id: &str) -> PanelboardResult<()> {
        let mut state = self.state.write();
        let node = state.node(id)?;
        if node.parent_id.is_none() {
            return Err(PanelboardError::Bookmark(
                "cannot remove the root folder".to_string(),
            ));
        }
        state.detach(id);
        let mut pending = vec![id.to_string()];
        while let Some(current) = pending.pop() {
            if let Some(record) = state.nodes.remove(&current) {
                pending.extend(record.children);
            }
        }
        Ok(())
    }

    /// Detach the node, then insert it at `index` (clamped) in `parent_id`.
    async fn move_node(&self, id: &str, parent_id: &str, index: usize) -> PanelboardResult<()> {
        let mut state = self.state.write();
        if state.node(id)?.parent_id.is_none() {
            return Err(PanelboardError::Bookmark(
                "cannot move the root folder".to_string(),
            ));
        }
        state.folder(parent_id)?;
        if state.is_within(parent_id, id) {
            return Err(PanelboardError::Bookmark(format!(
                "cannot move {} into itself",
                id
            )));
        }

        state.detach(id);
        if let Some(parent) = state.nodes.get_mut(parent_id) {
            let index = index.min(parent.children.len());
            parent.children.insert(index, id.to_string());
        }
        if let Some(node) = state.nodes.get_mut(id) {
            node.parent_id = Some(parent_id.to_string());
        }
        Ok(())
    }
}
