use crate::cli::CardAction;
use crate::context::CliContext;
use crate::output;
use panelboard_domain::{Card, FieldRef, ViewId};
use serde::Serialize;
use serde_json::json;

#[derive(Serialize)]
struct CardRow<'a> {
    panel_id: &'a str,
    #[serde(flatten)]
    card: &'a Card,
}

pub async fn handle(ctx: &CliContext, view: ViewId, action: CardAction) -> anyhow::Result<()> {
    let mut session = ctx.open(view).await?;
    match action {
        CardAction::Add {
            panel_id,
            text,
            image,
        } => {
            let id = match image {
                Some(uri) => session.paste_image(&panel_id, &uri).await?,
                None => {
                    session
                        .add_card(&panel_id, text.as_deref().unwrap_or_default())
                        .await?
                }
            };
            let card = session
                .registry()
                .find_card(&id)
                .ok_or_else(|| anyhow::anyhow!("Card creation succeeded but card not found"))?;
            output::output_success(CardRow {
                panel_id: &panel_id,
                card,
            });
        }
        CardAction::List { panel_id } => {
            let rows: Vec<CardRow> = session
                .panels()
                .iter()
                .filter(|p| panel_id.as_deref().map_or(true, |id| p.id == id))
                .flat_map(|p| {
                    p.cards.iter().map(|card| CardRow {
                        panel_id: &p.id,
                        card,
                    })
                })
                .collect();
            output::output_list(rows);
        }
        CardAction::Delete { id } => {
            session.delete_card(&id).await?;
            output::output_success(json!({"deleted": id}));
        }
        CardAction::Edit { id, text } => {
            session.focus(FieldRef::CardText(id.clone())).await?;
            session.type_text(&text)?;
            let changed = session.commit_field().await?.is_some();
            let card = session
                .registry()
                .find_card(&id)
                .ok_or_else(|| anyhow::anyhow!("Card not found: {}", id))?;
            output::output_success(json!({"card": card, "changed": changed}));
        }
        CardAction::Move {
            id,
            panel_id,
            index,
        } => {
            session.begin_card_drag(&id)?;
            let moved = session.drop_card(&panel_id, index).await?.is_some();
            output::output_success(json!({
                "id": id,
                "location": session.registry().locate_card(&id),
                "moved": moved,
            }));
        }
    }
    Ok(())
}
