//! Reversible edits recorded by the undo/redo engine.
//!
//! Each command carries exactly what is needed to reverse the mutation
//! and to re-apply it. Commands are never mutated once recorded; applying
//! one in either direction only reads from it.

use crate::capture::FieldBaselines;
use crate::registry::PanelRegistry;
use serde::{Deserialize, Serialize};

pub mod card_commands;
pub mod panel_commands;

pub use card_commands::*;
pub use panel_commands::*;

/// Behaviour shared by every command kind.
pub trait Reversible {
    /// Restore the state from before the edit. Returns false when the
    /// target could not be found and the step was skipped.
    fn apply_inverse(&self, context: &mut CommandContext) -> bool;

    /// Perform the edit again.
    fn apply_forward(&self, context: &mut CommandContext) -> bool;

    /// Human-readable description of what this command does
    fn description(&self) -> String;
}

/// Mutable state a command is applied against.
pub struct CommandContext<'a> {
    pub registry: &'a mut PanelRegistry,
    pub baselines: &'a mut FieldBaselines,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "itemType", rename_all = "kebab-case")]
pub enum Command {
    PanelDelete(DeletePanel),
    CardDelete(DeleteCard),
    TextEdit(EditCardText),
    PanelTitleEdit(EditPanelTitle),
    MoveCard(MoveCard),
    MovePanel(MovePanel),
    CreateCard(CreateCard),
}

impl Command {
    fn as_reversible(&self) -> &dyn Reversible {
        match self {
            Command::PanelDelete(cmd) => cmd,
            Command::CardDelete(cmd) => cmd,
            Command::TextEdit(cmd) => cmd,
            Command::PanelTitleEdit(cmd) => cmd,
            Command::MoveCard(cmd) => cmd,
            Command::MovePanel(cmd) => cmd,
            Command::CreateCard(cmd) => cmd,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Command::PanelDelete(_) => "panel-delete",
            Command::CardDelete(_) => "card-delete",
            Command::TextEdit(_) => "text-edit",
            Command::PanelTitleEdit(_) => "panel-title-edit",
            Command::MoveCard(_) => "move-card",
            Command::MovePanel(_) => "move-panel",
            Command::CreateCard(_) => "create-card",
        }
    }
}

impl Reversible for Command {
    fn apply_inverse(&self, context: &mut CommandContext) -> bool {
        self.as_reversible().apply_inverse(context)
    }

    fn apply_forward(&self, context: &mut CommandContext) -> bool {
        self.as_reversible().apply_forward(context)
    }

    fn description(&self) -> String {
        self.as_reversible().description()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Panel;

    #[test]
    fn test_tagged_wire_format() {
        let cmd = Command::MovePanel(MovePanel {
            panel_id: "panel-1".to_string(),
            old_index: 0,
            new_index: 2,
        });
        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["itemType"], "move-panel");
        assert_eq!(json["newIndex"], 2);
        assert_eq!(cmd.kind(), "move-panel");
    }

    #[test]
    fn test_description_dispatch() {
        let cmd = Command::PanelDelete(DeletePanel {
            panel: Panel::notes("Groceries"),
            next_sibling_id: None,
        });
        assert!(cmd.description().contains("Groceries"));
    }
}
