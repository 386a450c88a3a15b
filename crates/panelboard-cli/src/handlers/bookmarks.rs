use crate::cli::BookmarksAction;
use crate::context::CliContext;
use crate::output;
use panelboard_core::{BookmarkProvider, Loggable};
use panelboard_domain::ViewId;
use serde_json::json;

pub async fn handle(
    ctx: &CliContext,
    view: ViewId,
    action: BookmarksAction,
) -> anyhow::Result<()> {
    let tree = ctx.load_bookmarks().await?;
    match action {
        BookmarksAction::Sort => {
            let mut session = ctx.open(view).await?;
            let sorted = session.sort_bookmarks(&tree).await?;
            ctx.save_bookmarks(&tree).await?;
            output::output_with_notices(
                json!({"sorted_folders": sorted}),
                session.get_logs(),
            );
        }
        BookmarksAction::Rename { id, title } => {
            let folder = tree.update(&id, Some(title.clone()), None).await?;
            if !folder.is_folder() {
                anyhow::bail!("{} is a bookmark, not a folder", id);
            }
            ctx.save_bookmarks(&tree).await?;

            // Every view follows the rename, not only the selected one
            let mut updated = Vec::new();
            for other in ViewId::ALL {
                let mut session = ctx.open(other).await?;
                if session.folder_renamed(&id, &title).await? {
                    updated.push(other);
                }
            }
            output::output_success(json!({"folder": folder, "updated_views": updated}));
        }
    }
    Ok(())
}
