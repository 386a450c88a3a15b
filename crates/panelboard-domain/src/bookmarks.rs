use crate::registry::PanelRegistry;
use crate::settings::{BookmarkSortOrder, Settings};
use panelboard_core::{BookmarkNode, BookmarkProvider, PanelboardResult};
use std::cmp::Ordering;

/// The bookmarks bar is always id "1".
pub const BOOKMARK_BAR_ID: &str = "1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortOptions {
    pub recursive: bool,
    pub order: BookmarkSortOrder,
}

impl From<&Settings> for SortOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            recursive: settings.sort_recursively,
            order: settings.sort_order,
        }
    }
}

fn compare(a: &BookmarkNode, b: &BookmarkNode, order: BookmarkSortOrder) -> Ordering {
    if order == BookmarkSortOrder::FoldersFirst {
        match (a.is_folder(), b.is_folder()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => {}
        }
    }
    a.title
        .to_lowercase()
        .cmp(&b.title.to_lowercase())
        .then_with(|| a.title.cmp(&b.title))
}

/// Sort the children of `folder_id` by title, moving nodes one at a time.
///
/// Returns the number of folders sorted.
pub async fn sort_bookmarks(
    bookmarks: &dyn BookmarkProvider,
    folder_id: &str,
    options: SortOptions,
) -> PanelboardResult<usize> {
    let mut pending = vec![folder_id.to_string()];
    let mut sorted_folders = 0;

    while let Some(current) = pending.pop() {
        let mut children = bookmarks.list_children(&current).await?;
        children.sort_by(|a, b| compare(a, b, options.order));

        for (index, node) in children.iter().enumerate() {
            bookmarks.move_node(&node.id, &current, index).await?;
        }
        sorted_folders += 1;

        if options.recursive {
            pending.extend(
                children
                    .iter()
                    .rev()
                    .filter(|c| c.is_folder())
                    .map(|c| c.id.clone()),
            );
        }
    }

    tracing::info!("Sorted {} bookmark folders under {}", sorted_folders, folder_id);
    Ok(sorted_folders)
}

/// A folder was renamed in the bookmark tree: follow it in any panel showing it.
///
/// Returns true when a panel title changed. This is not an undoable edit.
pub fn sync_folder_title(registry: &mut PanelRegistry, folder_id: &str, title: &str) -> bool {
    let Some(panel_id) = registry
        .panels()
        .iter()
        .find(|p| p.folder_id.as_deref() == Some(folder_id))
        .map(|p| p.id.clone())
    else {
        return false;
    };
    registry.set_panel_title(&panel_id, title)
}
