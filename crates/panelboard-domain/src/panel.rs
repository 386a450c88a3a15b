use crate::card::Card;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type PanelId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelKind {
    Notes,
    Bookmarks,
}

/// A titled container of note cards, or a view onto one bookmark folder.
///
/// Its order among siblings is its position in the owning view's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: PanelId,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: PanelKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Panel {
    pub fn notes(title: impl Into<String>) -> Self {
        Self {
            id: format!("panel-{}", Uuid::new_v4()),
            title: title.into(),
            kind: PanelKind::Notes,
            folder_id: None,
            cards: Vec::new(),
        }
    }

    pub fn bookmarks(title: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            id: format!("panel-{}", Uuid::new_v4()),
            title: title.into(),
            kind: PanelKind::Bookmarks,
            folder_id: Some(folder_id.into()),
            cards: Vec::new(),
        }
    }

    pub fn is_notes(&self) -> bool {
        self.kind == PanelKind::Notes
    }

    pub fn card(&self, card_id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == card_id)
    }

    pub fn card_index(&self, card_id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == card_id)
    }
}
