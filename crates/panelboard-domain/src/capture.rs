//! Command capture at the mutation sites.
//!
//! Every user edit goes through [`EditCapture`], which snapshots the
//! pre-mutation values into a [`Command`], records it, and only then
//! mutates the registry. Text fields are tracked against a per-field
//! baseline so that successive edit/undo cycles diff against the last
//! committed value rather than the value the field was created with.

use crate::card::{Card, CardId};
use crate::commands::{
    Command, CreateCard, DeleteCard, DeletePanel, EditCardText, EditPanelTitle, MoveCard,
    MovePanel,
};
use crate::history::HistoryManager;
use crate::panel::{Panel, PanelId};
use crate::registry::PanelRegistry;
use panelboard_core::{PanelboardError, PanelboardResult};
use std::collections::HashMap;

/// An editable text field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldRef {
    CardText(CardId),
    PanelTitle(PanelId),
}

impl FieldRef {
    fn current_value(&self, registry: &PanelRegistry) -> Option<String> {
        match self {
            FieldRef::CardText(id) => registry.find_card(id).map(|c| c.text.clone()),
            FieldRef::PanelTitle(id) => registry.panel(id).map(|p| p.title.clone()),
        }
    }

    fn into_command(self, old_value: String, new_value: String) -> Command {
        match self {
            FieldRef::CardText(card_id) => Command::TextEdit(EditCardText {
                card_id,
                old_text: old_value,
                new_text: new_value,
            }),
            FieldRef::PanelTitle(panel_id) => Command::PanelTitleEdit(EditPanelTitle {
                panel_id,
                old_title: old_value,
                new_title: new_value,
            }),
        }
    }

    fn belongs_to_panel(&self, panel: &Panel) -> bool {
        match self {
            FieldRef::PanelTitle(id) => *id == panel.id,
            FieldRef::CardText(id) => panel.card(id).is_some(),
        }
    }
}

#[derive(Debug, Clone)]
struct FocusedField {
    field: FieldRef,
    draft: String,
}

/// Pristine values of text fields plus the live draft of the focused one.
#[derive(Debug, Clone, Default)]
pub struct FieldBaselines {
    baselines: HashMap<FieldRef, String>,
    focus: Option<FocusedField>,
}

impl FieldBaselines {
    pub fn focus(&mut self, field: FieldRef, current: &str) {
        self.baselines.insert(field.clone(), current.to_string());
        self.focus = Some(FocusedField {
            field,
            draft: current.to_string(),
        });
    }

    pub fn focused(&self) -> Option<&FieldRef> {
        self.focus.as_ref().map(|f| &f.field)
    }

    pub fn draft(&self) -> Option<&str> {
        self.focus.as_ref().map(|f| f.draft.as_str())
    }

    pub fn baseline(&self, field: &FieldRef) -> Option<&str> {
        self.baselines.get(field).map(String::as_str)
    }

    pub fn set_draft(&mut self, text: &str) -> bool {
        match self.focus.as_mut() {
            Some(focused) => {
                focused.draft = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn has_uncommitted_edit(&self) -> bool {
        self.focus.as_ref().is_some_and(|f| {
            self.baselines
                .get(&f.field)
                .is_some_and(|baseline| *baseline != f.draft)
        })
    }

    /// Reflect a programmatic change into the focused field so it is not
    /// mistaken for a new user edit on the next commit.
    pub fn sync_if_focused(&mut self, field: &FieldRef, value: &str) {
        if let Some(focused) = self.focus.as_mut() {
            if focused.field == *field {
                focused.draft = value.to_string();
                self.baselines.insert(field.clone(), value.to_string());
            }
        }
    }

    /// Drop focus. Returns `(field, baseline, draft)` when the draft changed,
    /// and moves the baseline forward to the draft.
    fn commit(&mut self) -> Option<(FieldRef, String, String)> {
        let focused = self.focus.take()?;
        let baseline = self
            .baselines
            .insert(focused.field.clone(), focused.draft.clone())
            .unwrap_or_default();
        (baseline != focused.draft).then_some((focused.field, baseline, focused.draft))
    }

    /// Reset the focused draft to its baseline. Returns `(field, baseline, discarded draft)`.
    fn revert(&mut self) -> Option<(FieldRef, String, String)> {
        if !self.has_uncommitted_edit() {
            return None;
        }
        let focused = self.focus.as_mut()?;
        let baseline = self.baselines.get(&focused.field)?.clone();
        let discarded = std::mem::replace(&mut focused.draft, baseline.clone());
        Some((focused.field.clone(), baseline, discarded))
    }

    fn forget(&mut self, field: &FieldRef) {
        self.baselines.remove(field);
        if self.focused() == Some(field) {
            self.focus = None;
        }
    }

    fn forget_panel(&mut self, panel: &Panel) {
        self.baselines.retain(|field, _| !field.belongs_to_panel(panel));
        if self.focus.as_ref().is_some_and(|f| f.field.belongs_to_panel(panel)) {
            self.focus = None;
        }
    }

    /// Overlay the focused draft onto a snapshot about to be recorded.
    fn overlay_draft(&self, panel: &mut Panel) {
        let Some(focused) = self.focus.as_ref() else {
            return;
        };
        match &focused.field {
            FieldRef::PanelTitle(id) if *id == panel.id => panel.title = focused.draft.clone(),
            FieldRef::CardText(id) => {
                if let Some(card) = panel.cards.iter_mut().find(|c| c.id == *id) {
                    card.text = focused.draft.clone();
                }
            }
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        self.baselines.clear();
        self.focus = None;
    }
}

/// What a drag started from. Only one drag can be in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragContext {
    Card {
        card_id: CardId,
        source_panel_id: PanelId,
        source_index: usize,
    },
    Panel {
        panel_id: PanelId,
        source_index: usize,
    },
}

#[derive(Debug, Default)]
pub struct EditCapture {
    pub baselines: FieldBaselines,
    drag: Option<DragContext>,
}

impl EditCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_in_flight(&self) -> Option<&DragContext> {
        self.drag.as_ref()
    }

    pub fn delete_panel(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
        panel_id: &str,
    ) -> PanelboardResult<Command> {
        let index = registry
            .panel_index(panel_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("panel {}", panel_id)))?;
        let mut snapshot = registry.panels()[index].clone();
        self.baselines.overlay_draft(&mut snapshot);
        let next_sibling_id = registry.panels().get(index + 1).map(|p| p.id.clone());

        let command = Command::PanelDelete(DeletePanel {
            panel: snapshot,
            next_sibling_id,
        });
        history.record_command(command.clone());

        if let Some((removed, _)) = registry.remove_panel(panel_id) {
            self.baselines.forget_panel(&removed);
        }
        Ok(command)
    }

    pub fn delete_card(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
        card_id: &str,
    ) -> PanelboardResult<Command> {
        let location = registry
            .locate_card(card_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("card {}", card_id)))?;
        let panel = registry
            .panel(&location.panel_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("panel {}", location.panel_id)))?;
        let mut card = panel.cards[location.index].clone();
        let field = FieldRef::CardText(card.id.clone());
        if self.baselines.focused() == Some(&field) {
            if let Some(draft) = self.baselines.draft() {
                card.text = draft.to_string();
            }
        }
        let next_sibling_id = panel.cards.get(location.index + 1).map(|c| c.id.clone());

        let command = Command::CardDelete(DeleteCard {
            card,
            parent_panel_id: location.panel_id,
            next_sibling_id,
        });
        history.record_command(command.clone());

        registry.remove_card(card_id);
        self.baselines.forget(&field);
        Ok(command)
    }

    /// Add a card (typed or pasted) to the end of a notes panel.
    pub fn create_card(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
        panel_id: &str,
        card: Card,
    ) -> PanelboardResult<Command> {
        let panel = registry
            .panel(panel_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("panel {}", panel_id)))?;
        if !panel.is_notes() {
            return Err(PanelboardError::Validation(format!(
                "panel '{}' holds bookmarks, not cards",
                panel.title
            )));
        }

        let command = Command::CreateCard(CreateCard {
            card_id: card.id.clone(),
            parent_panel_id: panel_id.to_string(),
        });
        history.record_command(command.clone());

        registry.add_card(panel_id, card);
        Ok(command)
    }

    /// Move focus to `field`. The previously focused field is blurred
    /// first, so its pending typing is committed and recorded.
    pub fn focus_field(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
        field: FieldRef,
    ) -> PanelboardResult<Option<Command>> {
        if field.current_value(registry).is_none() {
            return Err(PanelboardError::NotFound(format!("{:?}", field)));
        }
        let committed = self.commit_field(registry, history);
        let current = field
            .current_value(registry)
            .ok_or_else(|| PanelboardError::NotFound(format!("{:?}", field)))?;
        self.baselines.focus(field, &current);
        Ok(committed)
    }

    /// Live typing into the focused field. Nothing is recorded until commit.
    pub fn type_text(&mut self, text: &str) -> PanelboardResult<()> {
        if self.baselines.set_draft(text) {
            Ok(())
        } else {
            Err(PanelboardError::Validation("no field has focus".to_string()))
        }
    }

    /// Blur (or Enter/Escape) on the focused field.
    ///
    /// Records an edit only when the draft differs from the baseline.
    pub fn commit_field(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
    ) -> Option<Command> {
        let (field, old_value, new_value) = self.baselines.commit()?;
        let applied = match &field {
            FieldRef::CardText(id) => registry.set_card_text(id, &new_value),
            FieldRef::PanelTitle(id) => registry.set_panel_title(id, &new_value),
        };
        if !applied {
            tracing::warn!("Field {:?} vanished before commit, edit dropped", field);
            return None;
        }
        let command = field.into_command(old_value, new_value);
        history.record_command(command.clone());
        Some(command)
    }

    /// Undo pressed while a field holds uncommitted typing: revert the
    /// draft and make the discarded text redoable. The undo stack is untouched.
    pub fn revert_focused_edit(&mut self, history: &mut HistoryManager) -> Option<Command> {
        let (field, baseline, discarded) = self.baselines.revert()?;
        let command = field.into_command(baseline, discarded);
        history.push_redo(command.clone());
        Some(command)
    }

    pub fn begin_card_drag(
        &mut self,
        registry: &PanelRegistry,
        card_id: &str,
    ) -> PanelboardResult<()> {
        let location = registry
            .locate_card(card_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("card {}", card_id)))?;
        self.drag = Some(DragContext::Card {
            card_id: card_id.to_string(),
            source_panel_id: location.panel_id,
            source_index: location.index,
        });
        Ok(())
    }

    pub fn begin_panel_drag(
        &mut self,
        registry: &PanelRegistry,
        panel_id: &str,
    ) -> PanelboardResult<()> {
        let source_index = registry
            .panel_index(panel_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("panel {}", panel_id)))?;
        self.drag = Some(DragContext::Panel {
            panel_id: panel_id.to_string(),
            source_index,
        });
        Ok(())
    }

    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Drop the dragged card into `dest_panel_id` at `dest_index`.
    ///
    /// Indices are read back from the registry after the move, so a drop
    /// that lands where it started records nothing.
    pub fn drop_card(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
        dest_panel_id: &str,
        dest_index: usize,
    ) -> PanelboardResult<Option<Command>> {
        let Some(DragContext::Card {
            card_id,
            source_panel_id,
            source_index,
        }) = self.drag.take()
        else {
            return Err(PanelboardError::Validation(
                "no card drag in progress".to_string(),
            ));
        };

        let destination = registry
            .panel(dest_panel_id)
            .ok_or_else(|| PanelboardError::NotFound(format!("panel {}", dest_panel_id)))?;
        if !destination.is_notes() {
            return Err(PanelboardError::Validation(format!(
                "panel '{}' holds bookmarks, not cards",
                destination.title
            )));
        }

        if !registry.move_card_to(&card_id, dest_panel_id, dest_index) {
            return Err(PanelboardError::NotFound(format!(
                "card {} or panel {}",
                card_id, dest_panel_id
            )));
        }
        let landed = registry
            .locate_card(&card_id)
            .ok_or_else(|| PanelboardError::Internal(format!("card {} lost in move", card_id)))?;

        if landed.panel_id == source_panel_id && landed.index == source_index {
            return Ok(None);
        }

        let command = Command::MoveCard(MoveCard {
            card_id,
            source_panel_id,
            source_index,
            dest_panel_id: landed.panel_id,
            dest_index: landed.index,
        });
        history.record_command(command.clone());
        Ok(Some(command))
    }

    pub fn drop_panel(
        &mut self,
        registry: &mut PanelRegistry,
        history: &mut HistoryManager,
        dest_index: usize,
    ) -> PanelboardResult<Option<Command>> {
        let Some(DragContext::Panel {
            panel_id,
            source_index,
        }) = self.drag.take()
        else {
            return Err(PanelboardError::Validation(
                "no panel drag in progress".to_string(),
            ));
        };

        if !registry.move_panel_to(&panel_id, dest_index) {
            return Err(PanelboardError::NotFound(format!("panel {}", panel_id)));
        }
        let new_index = registry
            .panel_index(&panel_id)
            .ok_or_else(|| PanelboardError::Internal(format!("panel {} lost in move", panel_id)))?;

        if new_index == source_index {
            return Ok(None);
        }

        let command = Command::MovePanel(MovePanel {
            panel_id,
            old_index: source_index,
            new_index,
        });
        history.record_command(command.clone());
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (PanelRegistry, HistoryManager, EditCapture) {
        let mut notes = Panel::notes("Notes");
        notes.id = "p".to_string();
        for id in ["a", "b", "c"] {
            let mut card = Card::new(id.to_uppercase());
            card.id = id.to_string();
            notes.cards.push(card);
        }
        let mut other = Panel::notes("Other");
        other.id = "q".to_string();
        let links = Panel::bookmarks("Links", "10");
        (
            PanelRegistry::from_panels(vec![notes, other, links]),
            HistoryManager::new(),
            EditCapture::new(),
        )
    }

    #[test]
    fn test_delete_card_captures_uncommitted_draft() {
        let (mut registry, mut history, mut capture) = setup();
        capture
            .focus_field(&mut registry, &mut history, FieldRef::CardText("b".to_string()))
            .unwrap();
        capture.type_text("B edited").unwrap();

        let command = capture.delete_card(&mut registry, &mut history, "b").unwrap();
        match command {
            Command::CardDelete(cmd) => {
                assert_eq!(cmd.card.text, "B edited");
                assert_eq!(cmd.next_sibling_id.as_deref(), Some("c"));
                assert_eq!(cmd.parent_panel_id, "p");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(capture.baselines.focused().is_none());
        assert_eq!(history.undo_depth(), 1);
    }

    #[test]
    fn test_delete_missing_records_nothing() {
        let (mut registry, mut history, mut capture) = setup();
        let err = capture
            .delete_panel(&mut registry, &mut history, "zzz")
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_commit_records_only_changes() {
        let (mut registry, mut history, mut capture) = setup();
        let field = FieldRef::PanelTitle("p".to_string());

        capture.focus_field(&mut registry, &mut history, field.clone()).unwrap();
        assert!(capture.commit_field(&mut registry, &mut history).is_none());

        capture.focus_field(&mut registry, &mut history, field.clone()).unwrap();
        capture.type_text("Shopping").unwrap();
        let command = capture.commit_field(&mut registry, &mut history).unwrap();
        assert_eq!(
            command,
            Command::PanelTitleEdit(EditPanelTitle {
                panel_id: "p".to_string(),
                old_title: "Notes".to_string(),
                new_title: "Shopping".to_string(),
            })
        );
        assert_eq!(registry.panel("p").unwrap().title, "Shopping");
        assert_eq!(capture.baselines.baseline(&field), Some("Shopping"));
    }

    #[test]
    fn test_successive_edits_diff_against_last_commit() {
        let (mut registry, mut history, mut capture) = setup();
        let field = FieldRef::CardText("a".to_string());
        for text in ["one", "two"] {
            capture.focus_field(&mut registry, &mut history, field.clone()).unwrap();
            capture.type_text(text).unwrap();
            capture.commit_field(&mut registry, &mut history);
        }
        let mut commands = Vec::new();
        while let Some(cmd) = history.pop_undo() {
            commands.push(cmd);
        }
        assert_eq!(
            commands[0],
            Command::TextEdit(EditCardText {
                card_id: "a".to_string(),
                old_text: "one".to_string(),
                new_text: "two".to_string(),
            })
        );
    }

    #[test]
    fn test_type_without_focus_is_rejected() {
        let (_, _, mut capture) = setup();
        assert!(capture.type_text("x").unwrap_err().is_validation());
    }

    #[test]
    fn test_revert_focused_edit_goes_to_redo() {
        let (mut registry, mut history, mut capture) = setup();
        capture
            .focus_field(&mut registry, &mut history, FieldRef::CardText("a".to_string()))
            .unwrap();
        capture.type_text("draft").unwrap();

        let command = capture.revert_focused_edit(&mut history).unwrap();
        assert_eq!(command.kind(), "text-edit");
        assert_eq!(capture.baselines.draft(), Some("A"));
        assert!(!history.can_undo());
        assert_eq!(history.redo_depth(), 1);
        assert!(capture.revert_focused_edit(&mut history).is_none());
        assert!(capture.commit_field(&mut registry, &mut history).is_none());
    }

    #[test]
    fn test_noop_card_drop_is_not_recorded() {
        let (mut registry, mut history, mut capture) = setup();
        capture.begin_card_drag(&registry, "b").unwrap();
        let recorded = capture.drop_card(&mut registry, &mut history, "p", 1).unwrap();
        assert!(recorded.is_none());
        assert!(!history.can_undo());
        assert!(capture.drag_in_flight().is_none());
    }

    #[test]
    fn test_card_drop_records_landed_indices() {
        let (mut registry, mut history, mut capture) = setup();
        capture.begin_card_drag(&registry, "a").unwrap();
        let recorded = capture
            .drop_card(&mut registry, &mut history, "q", 42)
            .unwrap()
            .unwrap();
        assert_eq!(
            recorded,
            Command::MoveCard(MoveCard {
                card_id: "a".to_string(),
                source_panel_id: "p".to_string(),
                source_index: 0,
                dest_panel_id: "q".to_string(),
                dest_index: 0,
            })
        );
    }

    #[test]
    fn test_panel_drop_past_end_is_noop_for_last_panel() {
        let (mut registry, mut history, mut capture) = setup();
        let last = registry.panels()[2].id.clone();
        capture.begin_panel_drag(&registry, &last).unwrap();
        assert!(capture
            .drop_panel(&mut registry, &mut history, 10)
            .unwrap()
            .is_none());

        capture.begin_panel_drag(&registry, "p").unwrap();
        let recorded = capture
            .drop_panel(&mut registry, &mut history, 1)
            .unwrap()
            .unwrap();
        assert_eq!(
            recorded,
            Command::MovePanel(MovePanel {
                panel_id: "p".to_string(),
                old_index: 0,
                new_index: 1,
            })
        );
    }

    #[test]
    fn test_drop_without_drag() {
        let (mut registry, mut history, mut capture) = setup();
        assert!(capture
            .drop_panel(&mut registry, &mut history, 0)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_create_card_rejects_bookmark_panels() {
        let (mut registry, mut history, mut capture) = setup();
        let links = registry.panels()[2].id.clone();
        let err = capture
            .create_card(&mut registry, &mut history, &links, Card::new("x"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_card_drop_rejects_bookmark_panels() {
        let (mut registry, mut history, mut capture) = setup();
        let links = registry.panels()[2].id.clone();
        capture.begin_card_drag(&registry, "a").unwrap();

        let err = capture
            .drop_card(&mut registry, &mut history, &links, 0)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(registry.panel(&links).unwrap().cards.is_empty());
        assert_eq!(registry.panel("p").unwrap().cards[0].id, "a");
        assert!(capture.drag_in_flight().is_none());
        assert!(!history.can_undo());
    }

    #[test]
    fn test_focusing_another_field_commits_pending_typing() {
        let (mut registry, mut history, mut capture) = setup();
        capture
            .focus_field(&mut registry, &mut history, FieldRef::CardText("a".to_string()))
            .unwrap();
        capture.type_text("A edited").unwrap();

        let committed = capture
            .focus_field(&mut registry, &mut history, FieldRef::CardText("b".to_string()))
            .unwrap();
        assert_eq!(
            committed,
            Some(Command::TextEdit(EditCardText {
                card_id: "a".to_string(),
                old_text: "A".to_string(),
                new_text: "A edited".to_string(),
            }))
        );
        assert_eq!(registry.find_card("a").unwrap().text, "A edited");
        assert_eq!(history.undo_depth(), 1);
        assert_eq!(
            capture.baselines.focused(),
            Some(&FieldRef::CardText("b".to_string()))
        );
        assert!(capture.commit_field(&mut registry, &mut history).is_none());
    }

    #[test]
    fn test_focusing_missing_field_keeps_current_focus() {
        let (mut registry, mut history, mut capture) = setup();
        capture
            .focus_field(&mut registry, &mut history, FieldRef::CardText("a".to_string()))
            .unwrap();
        capture.type_text("draft").unwrap();

        let err = capture
            .focus_field(&mut registry, &mut history, FieldRef::CardText("zzz".to_string()))
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(capture.baselines.draft(), Some("draft"));
        assert!(!history.can_undo());
    }
}
