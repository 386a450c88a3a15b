//! In-memory entity store for one view.
//!
//! The registry is the system of record while a view is open: every
//! mutation goes through it, and persistence serializes it wholesale.
//! Misses return `None`/`false` rather than erroring so that commands
//! referring to entities removed elsewhere degrade to no-ops.

use crate::card::{Card, CardId};
use crate::panel::{Panel, PanelId};
use panelboard_core::PanelPosition;
use serde::Serialize;

/// Where a card currently lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLocation {
    pub panel_id: PanelId,
    pub index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelRegistry {
    panels: Vec<Panel>,
}

impl PanelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_panels(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn into_panels(self) -> Vec<Panel> {
        self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn panel(&self, panel_id: &str) -> Option<&Panel> {
        self.panels.iter().find(|p| p.id == panel_id)
    }

    pub fn panel_mut(&mut self, panel_id: &str) -> Option<&mut Panel> {
        self.panels.iter_mut().find(|p| p.id == panel_id)
    }

    pub fn panel_index(&self, panel_id: &str) -> Option<usize> {
        self.panels.iter().position(|p| p.id == panel_id)
    }

    pub fn panel_ids(&self) -> Vec<PanelId> {
        self.panels.iter().map(|p| p.id.clone()).collect()
    }

    pub fn add_panel(&mut self, panel: Panel, position: PanelPosition) {
        match position {
            PanelPosition::Top => self.panels.insert(0, panel),
            PanelPosition::Bottom => self.panels.push(panel),
        }
    }

    /// Remove a panel, returning it with the id of the panel that followed it.
    pub fn remove_panel(&mut self, panel_id: &str) -> Option<(Panel, Option<PanelId>)> {
        let index = self.panel_index(panel_id)?;
        let next_sibling = self.panels.get(index + 1).map(|p| p.id.clone());
        Some((self.panels.remove(index), next_sibling))
    }

    /// Insert before `anchor` when it is still present, else append.
    pub fn insert_panel_before(&mut self, panel: Panel, anchor: Option<&str>) {
        match anchor.and_then(|id| self.panel_index(id)) {
            Some(index) => self.panels.insert(index, panel),
            None => self.panels.push(panel),
        }
    }

    /// Move a panel to `index`; an index past the end appends.
    pub fn move_panel_to(&mut self, panel_id: &str, index: usize) -> bool {
        let Some(current) = self.panel_index(panel_id) else {
            return false;
        };
        let panel = self.panels.remove(current);
        if index >= self.panels.len() {
            self.panels.push(panel);
        } else {
            self.panels.insert(index, panel);
        }
        true
    }

    pub fn set_panel_title(&mut self, panel_id: &str, title: &str) -> bool {
        match self.panel_mut(panel_id) {
            Some(panel) => {
                panel.title = title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn find_card(&self, card_id: &str) -> Option<&Card> {
        self.panels.iter().find_map(|p| p.card(card_id))
    }

    pub fn find_card_mut(&mut self, card_id: &str) -> Option<&mut Card> {
        self.panels
            .iter_mut()
            .find_map(|p| p.cards.iter_mut().find(|c| c.id == card_id))
    }

    pub fn locate_card(&self, card_id: &str) -> Option<CardLocation> {
        self.panels.iter().find_map(|panel| {
            panel.card_index(card_id).map(|index| CardLocation {
                panel_id: panel.id.clone(),
                index,
            })
        })
    }

    pub fn add_card(&mut self, panel_id: &str, card: Card) -> bool {
        match self.panel_mut(panel_id) {
            Some(panel) => {
                panel.cards.push(card);
                true
            }
            None => false,
        }
    }

    /// Remove a card from whichever panel holds it.
    ///
    /// Returns the card, its panel id, and the id of the card that followed it.
    pub fn remove_card(&mut self, card_id: &str) -> Option<(Card, PanelId, Option<CardId>)> {
        let location = self.locate_card(card_id)?;
        let panel = self.panel_mut(&location.panel_id)?;
        let next_sibling = panel.cards.get(location.index + 1).map(|c| c.id.clone());
        let card = panel.cards.remove(location.index);
        Some((card, location.panel_id, next_sibling))
    }

    /// Insert into `panel_id` before `anchor` when it is still there, else append.
    /// Returns false when the panel itself is gone.
    pub fn insert_card_before(&mut self, panel_id: &str, card: Card, anchor: Option<&str>) -> bool {
        let Some(panel) = self.panel_mut(panel_id) else {
            return false;
        };
        match anchor.and_then(|id| panel.card_index(id)) {
            Some(index) => panel.cards.insert(index, card),
            None => panel.cards.push(card),
        }
        true
    }

    /// Detach a card and reinsert it into `panel_id` at `index`.
    ///
    /// An index past the end appends. When the destination panel is gone
    /// or holds bookmarks the card stays where it was.
    pub fn move_card_to(&mut self, card_id: &str, panel_id: &str, index: usize) -> bool {
        if !self.panel(panel_id).is_some_and(Panel::is_notes) {
            return false;
        }
        let Some((card, _, _)) = self.remove_card(card_id) else {
            return false;
        };
        let Some(panel) = self.panel_mut(panel_id) else {
            return false;
        };
        if index >= panel.cards.len() {
            panel.cards.push(card);
        } else {
            panel.cards.insert(index, card);
        }
        true
    }

    pub fn set_card_text(&mut self, card_id: &str, text: &str) -> bool {
        match self.find_card_mut(card_id) {
            Some(card) => {
                card.text = text.to_string();
                true
            }
            None => false,
        }
    }

    /// Folder ids referenced by bookmark panels.
    pub fn folder_ids(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().filter_map(|p| p.folder_id.as_deref())
    }
}
