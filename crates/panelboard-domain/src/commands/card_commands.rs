use super::{CommandContext, Reversible};
use crate::capture::FieldRef;
use crate::card::{Card, CardId};
use crate::panel::PanelId;
use serde::{Deserialize, Serialize};

/// A card was deleted; carries the card as it looked at deletion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCard {
    pub card: Card,
    pub parent_panel_id: PanelId,
    pub next_sibling_id: Option<CardId>,
}

impl Reversible for DeleteCard {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        if context.registry.find_card(&self.card.id).is_some() {
            tracing::warn!("Card {} already present, skipping restore", self.card.id);
            return false;
        }
        let restored = context.registry.insert_card_before(
            &self.parent_panel_id,
            self.card.clone(),
            self.next_sibling_id.as_deref(),
        );
        if !restored {
            tracing::warn!(
                "Panel {} no longer exists, card {} not restored",
                self.parent_panel_id,
                self.card.id
            );
        }
        restored
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        context.registry.remove_card(&self.card.id).is_some()
    }

    fn description(&self) -> String {
        format!("Delete card {}", self.card.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditCardText {
    pub card_id: CardId,
    pub old_text: String,
    pub new_text: String,
}

impl EditCardText {
    fn set(&self, context: &mut CommandContext, text: &str) -> bool {
        if !context.registry.set_card_text(&self.card_id, text) {
            return false;
        }
        context
            .baselines
            .sync_if_focused(&FieldRef::CardText(self.card_id.clone()), text);
        true
    }
}

impl Reversible for EditCardText {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        self.set(context, &self.old_text)
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        self.set(context, &self.new_text)
    }

    fn description(&self) -> String {
        format!("Edit card {}", self.card_id)
    }
}

/// A card was dragged, possibly into another panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveCard {
    pub card_id: CardId,
    pub source_panel_id: PanelId,
    pub source_index: usize,
    pub dest_panel_id: PanelId,
    pub dest_index: usize,
}

impl Reversible for MoveCard {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        context
            .registry
            .move_card_to(&self.card_id, &self.source_panel_id, self.source_index)
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        context
            .registry
            .move_card_to(&self.card_id, &self.dest_panel_id, self.dest_index)
    }

    fn description(&self) -> String {
        format!(
            "Move card {} to panel {} at {}",
            self.card_id, self.dest_panel_id, self.dest_index
        )
    }
}

/// A card was added or pasted.
///
/// Only the ids are recorded, so a redo rebuilds the card from the
/// placeholder template and any pasted text or image is not brought back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCard {
    pub card_id: CardId,
    pub parent_panel_id: PanelId,
}

impl Reversible for CreateCard {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        context.registry.remove_card(&self.card_id).is_some()
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        if context.registry.find_card(&self.card_id).is_some() {
            return false;
        }
        context.registry.insert_card_before(
            &self.parent_panel_id,
            Card::placeholder(self.card_id.clone()),
            None,
        )
    }

    fn description(&self) -> String {
        format!("Create card {}", self.card_id)
    }
}
