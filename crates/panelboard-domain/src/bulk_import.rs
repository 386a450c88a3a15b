//! "Import all bookmark folders as panels".

use crate::bucket::{encode_panels, read_bucket};
use crate::panel::{Panel, PanelId, PanelKind};
use crate::view::ViewId;
use chrono::Utc;
use panelboard_core::{AppConfig, BookmarkFolder, BookmarkProvider, KeyValueStore, PanelboardResult};
use serde::Serialize;
use serde_json::Map;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderImportSummary {
    pub view: ViewId,
    pub added: Vec<PanelId>,
}

impl FolderImportSummary {
    pub fn added_count(&self) -> usize {
        self.added.len()
    }

    pub fn message(&self) -> String {
        if self.added.is_empty() {
            "No new bookmark folders to import.".to_string()
        } else {
            format!(
                "{} new bookmark panels have been added to View {}.",
                self.added.len(),
                self.view
            )
        }
    }
}

/// Folders that directly contain at least one bookmark, minus reserved roots.
pub async fn folders_with_bookmarks(
    bookmarks: &dyn BookmarkProvider,
    config: &AppConfig,
) -> PanelboardResult<Vec<BookmarkFolder>> {
    let mut eligible = Vec::new();
    for folder in bookmarks.list_folders().await? {
        if config.is_reserved_folder(&folder.id) {
            continue;
        }
        let children = bookmarks.list_children(&folder.id).await?;
        if children.iter().any(|child| child.url.is_some()) {
            eligible.push(folder);
        }
    }
    Ok(eligible)
}

/// Append a bookmarks panel for every eligible folder not already shown in
/// `view`. Writes once, and not at all when there is nothing to add.
pub async fn import_bookmark_folders(
    store: &dyn KeyValueStore,
    bookmarks: &dyn BookmarkProvider,
    view: ViewId,
    config: &AppConfig,
) -> PanelboardResult<FolderImportSummary> {
    let folders = folders_with_bookmarks(bookmarks, config).await?;
    let mut panels = read_bucket(store, view).await?;
    let mut known: HashSet<String> = panels.iter().filter_map(|p| p.folder_id.clone()).collect();

    let stamp = Utc::now().timestamp_millis();
    let mut added = Vec::new();
    for folder in folders {
        if !known.insert(folder.id.clone()) {
            continue;
        }
        let panel = Panel {
            id: format!("panel-{}-{}", stamp, folder.id),
            title: folder.title,
            kind: PanelKind::Bookmarks,
            folder_id: Some(folder.id),
            cards: Vec::new(),
        };
        added.push(panel.id.clone());
        panels.push(panel);
    }

    if !added.is_empty() {
        let mut items = Map::new();
        items.insert(view.storage_key().to_string(), encode_panels(&panels)?);
        store.set(items).await?;
        tracing::info!("Imported {} bookmark folders into view {}", added.len(), view);
    }

    Ok(FolderImportSummary { view, added })
}

#[cfg(test)]
mod tests {
    use super::*;
    use panelboard_persistence::{BookmarkTree, MemoryStore};

    async fn tree() -> BookmarkTree {
        let tree = BookmarkTree::with_default_roots();
        let bar = "1";
        let news = tree.create(bar, "News".to_string(), None).await.unwrap();
        tree.create(&news.id, "Paper".to_string(), Some("https://paper.example".to_string()))
            .await
            .unwrap();
        let empty = tree.create(bar, "Empty".to_string(), None).await.unwrap();
        tree.create(&empty.id, "Nested".to_string(), None).await.unwrap();
        tree.create(bar, "Top link".to_string(), Some("https://top.example".to_string()))
            .await
            .unwrap();
        tree
    }

    #[tokio::test]
    async fn test_only_folders_with_direct_bookmarks() {
        let tree = tree().await;
        let folders = folders_with_bookmarks(&tree, &AppConfig::default()).await.unwrap();
        let titles: Vec<_> = folders.iter().map(|f| f.title.as_str()).collect();
        // The bookmarks bar holds a link directly but is a reserved root.
        assert_eq!(titles, vec!["News"]);
    }

    #[tokio::test]
    async fn test_second_run_adds_nothing() {
        let tree = tree().await;
        let store = MemoryStore::new();
        let config = AppConfig::default();

        let first = import_bookmark_folders(&store, &tree, ViewId::B, &config)
            .await
            .unwrap();
        assert_eq!(first.added_count(), 1);

        let panels = read_bucket(&store, ViewId::B).await.unwrap();
        assert_eq!(panels[0].title, "News");
        assert_eq!(panels[0].kind, PanelKind::Bookmarks);

        let second = import_bookmark_folders(&store, &tree, ViewId::B, &config)
            .await
            .unwrap();
        assert_eq!(second.added_count(), 0);
        assert_eq!(second.message(), "No new bookmark folders to import.");
        assert_eq!(read_bucket(&store, ViewId::B).await.unwrap().len(), 1);
    }
}
