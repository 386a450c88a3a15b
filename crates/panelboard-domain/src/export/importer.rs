use super::models::ViewExport;
use crate::bucket::{encode_panels, split_images};
use crate::panel::{Panel, PanelKind};
use crate::view::SETTINGS_KEY;
use panelboard_core::{BookmarkProvider, KeyValueStore, PanelboardError, PanelboardResult};
use serde::Serialize;
use serde_json::Map;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub panels: usize,
    pub images: usize,
    /// Bookmark panels whose folder id was re-linked by title.
    pub relinked: usize,
}

pub struct ViewImporter;

impl ViewImporter {
    /// Point bookmark panels at a live folder.
    ///
    /// A folder id that no longer resolves to a folder is replaced by the
    /// first folder with the panel's title; without a match it is left alone.
    pub async fn relink_folders(
        bookmarks: &dyn BookmarkProvider,
        panels: &mut [Panel],
    ) -> PanelboardResult<usize> {
        let mut folders = None;
        let mut relinked = 0;

        for panel in panels.iter_mut().filter(|p| p.kind == PanelKind::Bookmarks) {
            let Some(folder_id) = panel.folder_id.clone() else {
                continue;
            };
            let resolves = matches!(bookmarks.get(&folder_id).await, Ok(Some(node)) if node.is_folder());
            if resolves {
                continue;
            }

            if folders.is_none() {
                folders = Some(bookmarks.list_folders().await?);
            }
            let found = folders
                .as_ref()
                .and_then(|all| all.iter().find(|f| f.title == panel.title));
            if let Some(folder) = found {
                tracing::info!(
                    "Re-linked panel '{}' from folder {} to {}",
                    panel.title,
                    folder_id,
                    folder.id
                );
                panel.folder_id = Some(folder.id.clone());
                relinked += 1;
            }
        }
        Ok(relinked)
    }

    /// Overwrite the view's panels and the shared settings with a backup,
    /// images included, in a single store write.
    pub async fn import_view(
        store: &dyn KeyValueStore,
        bookmarks: Option<&dyn BookmarkProvider>,
        mut export: ViewExport,
    ) -> PanelboardResult<ImportSummary> {
        let relinked = match bookmarks {
            Some(provider) => Self::relink_folders(provider, &mut export.panels).await?,
            None => 0,
        };

        let (panels, inline_images) = split_images(&export.panels);
        let mut items: Map<String, serde_json::Value> = export.images;
        items.extend(inline_images);
        let images = items.len();
        items.insert(
            export.view.storage_key().to_string(),
            encode_panels(&panels)?,
        );
        items.insert(
            SETTINGS_KEY.to_string(),
            serde_json::to_value(&export.settings)
                .map_err(|e| PanelboardError::Serialization(e.to_string()))?,
        );
        store.set(items).await?;

        tracing::info!(
            "Imported {} panels into view {}",
            panels.len(),
            export.view
        );
        Ok(ImportSummary {
            panels: panels.len(),
            images,
            relinked,
        })
    }
}
