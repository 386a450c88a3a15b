use super::{CommandContext, Reversible};
use crate::capture::FieldRef;
use crate::panel::{Panel, PanelId};
use serde::{Deserialize, Serialize};

/// A panel was deleted; carries its full state at deletion time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePanel {
    pub panel: Panel,
    pub next_sibling_id: Option<PanelId>,
}

impl Reversible for DeletePanel {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        if context.registry.panel(&self.panel.id).is_some() {
            tracing::warn!("Panel {} already present, skipping restore", self.panel.id);
            return false;
        }
        context
            .registry
            .insert_panel_before(self.panel.clone(), self.next_sibling_id.as_deref());
        true
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        context.registry.remove_panel(&self.panel.id).is_some()
    }

    fn description(&self) -> String {
        format!("Delete panel '{}'", self.panel.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditPanelTitle {
    pub panel_id: PanelId,
    pub old_title: String,
    pub new_title: String,
}

impl EditPanelTitle {
    fn set(&self, context: &mut CommandContext, title: &str) -> bool {
        if !context.registry.set_panel_title(&self.panel_id, title) {
            return false;
        }
        context
            .baselines
            .sync_if_focused(&FieldRef::PanelTitle(self.panel_id.clone()), title);
        true
    }
}

impl Reversible for EditPanelTitle {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        self.set(context, &self.old_title)
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        self.set(context, &self.new_title)
    }

    fn description(&self) -> String {
        format!("Rename panel '{}' to '{}'", self.old_title, self.new_title)
    }
}

/// A panel was dragged to a new position within its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePanel {
    pub panel_id: PanelId,
    pub old_index: usize,
    pub new_index: usize,
}

impl Reversible for MovePanel {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        context.registry.move_panel_to(&self.panel_id, self.old_index)
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        context.registry.move_panel_to(&self.panel_id, self.new_index)
    }

    fn description(&self) -> String {
        format!(
            "Move panel {} from {} to {}",
            self.panel_id, self.old_index, self.new_index
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::FieldBaselines;
    use crate::registry::PanelRegistry;

    fn panel(id: &str) -> Panel {
        let mut p = Panel::notes(id.to_uppercase());
        p.id = id.to_string();
        p
    }

    #[test]
    fn test_delete_panel_round_trip() {
        let mut registry = PanelRegistry::from_panels(vec![panel("a"), panel("b"), panel("c")]);
        let mut baselines = FieldBaselines::default();
        let (removed, next) = registry.remove_panel("b").unwrap();
        let cmd = DeletePanel {
            panel: removed,
            next_sibling_id: next,
        };
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };

        assert!(cmd.apply_inverse(&mut ctx));
        assert_eq!(ctx.registry.panel_ids(), vec!["a", "b", "c"]);
        assert!(cmd.apply_forward(&mut ctx));
        assert_eq!(ctx.registry.panel_ids(), vec!["a", "c"]);
    }

    #[test]
    fn test_restore_twice_is_skipped() {
        let mut registry = PanelRegistry::from_panels(vec![panel("a")]);
        let mut baselines = FieldBaselines::default();
        let cmd = DeletePanel {
            panel: panel("a"),
            next_sibling_id: None,
        };
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };
        assert!(!cmd.apply_inverse(&mut ctx));
        assert_eq!(ctx.registry.len(), 1);
    }

    #[test]
    fn test_title_edit_updates_focused_baseline() {
        let mut registry = PanelRegistry::from_panels(vec![panel("a")]);
        let mut baselines = FieldBaselines::default();
        let field = FieldRef::PanelTitle("a".to_string());
        baselines.focus(field.clone(), "Renamed");

        let cmd = EditPanelTitle {
            panel_id: "a".to_string(),
            old_title: "A".to_string(),
            new_title: "Renamed".to_string(),
        };
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };
        assert!(cmd.apply_inverse(&mut ctx));
        assert_eq!(ctx.registry.panel("a").unwrap().title, "A");
        assert_eq!(baselines.baseline(&field), Some("A"));
        assert!(!baselines.has_uncommitted_edit());
    }

    #[test]
    fn test_move_panel_on_missing_panel_is_noop() {
        let mut registry = PanelRegistry::from_panels(vec![panel("a")]);
        let mut baselines = FieldBaselines::default();
        let cmd = MovePanel {
            panel_id: "gone".to_string(),
            old_index: 0,
            new_index: 1,
        };
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };
        assert!(!cmd.apply_inverse(&mut ctx));
        assert_eq!(ctx.registry.panel_ids(), vec!["a"]);
    }
}
