use crate::cli::PanelAction;
use crate::context::CliContext;
use crate::output;
use panelboard_core::Loggable;
use panelboard_domain::{FieldRef, Panel, ViewId};
use serde_json::json;

pub async fn handle(ctx: &CliContext, view: ViewId, action: PanelAction) -> anyhow::Result<()> {
    let mut session = ctx.open(view).await?;
    match action {
        PanelAction::Add {
            title,
            folder_id,
            position,
        } => {
            let panel = match folder_id {
                Some(folder_id) => Panel::bookmarks(title, folder_id),
                None => Panel::notes(title),
            };
            let id = session.add_panel(panel, position).await?;
            let panel = session
                .registry()
                .panel(&id)
                .ok_or_else(|| anyhow::anyhow!("Panel creation succeeded but panel not found"))?;
            output::output_success(panel);
        }
        PanelAction::List => {
            output::output_list(session.panels().to_vec());
        }
        PanelAction::Delete { id } => {
            session.delete_panel(&id).await?;
            output::output_success(json!({"deleted": id}));
        }
        PanelAction::Rename { id, title } => {
            session.focus(FieldRef::PanelTitle(id.clone())).await?;
            session.type_text(&title)?;
            session.commit_field().await?;
            output::output_success(session.registry().panel(&id));
        }
        PanelAction::Reorder { id, index } => {
            session.begin_panel_drag(&id)?;
            let moved = session.drop_panel(index).await?.is_some();
            output::output_success(json!({
                "id": id,
                "index": session.registry().panel_index(&id),
                "moved": moved,
            }));
        }
        PanelAction::Move { id, to, position } => {
            let position = position.unwrap_or(ctx.config.default_new_panel_position);
            let outcome = session.move_panel_to(&id, to, position).await?;
            output::output_with_notices(outcome, session.get_logs());
        }
    }
    Ok(())
}
