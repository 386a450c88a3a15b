//! Undo/redo history management.
//!
//! Two bounded LIFO stacks of [`Command`]s. History is linear: recording a
//! new command discards everything that could have been redone. Stacks live
//! only as long as the view session that owns them.

use crate::commands::{Command, CommandContext, Reversible};
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_DEPTH: usize = 100;

#[derive(Debug)]
pub struct HistoryManager {
    /// Most recent = back of deque.
    undo_stack: VecDeque<Command>,

    /// Most recent = back of deque.
    redo_stack: VecDeque<Command>,

    /// Oldest entries are dropped beyond this many per stack.
    max_depth: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
        }
    }

    /// Record a freshly captured edit and invalidate the redo history.
    pub fn record_command(&mut self, command: Command) {
        tracing::debug!("Recorded: {}", command.description());
        self.push_undo(command);
        self.redo_stack.clear();
    }

    pub fn pop_undo(&mut self) -> Option<Command> {
        self.undo_stack.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<Command> {
        self.redo_stack.pop_back()
    }

    pub fn push_undo(&mut self, command: Command) {
        Self::push_bounded(&mut self.undo_stack, command, self.max_depth);
    }

    pub fn push_redo(&mut self, command: Command) {
        Self::push_bounded(&mut self.redo_stack, command, self.max_depth);
    }

    fn push_bounded(stack: &mut VecDeque<Command>, command: Command, max_depth: usize) {
        stack.push_back(command);
        while stack.len() > max_depth {
            stack.pop_front();
        }
    }

    /// Pop the latest edit, apply its inverse, and move it to the redo stack.
    ///
    /// Returns the command when one was popped, even if its target had
    /// disappeared and applying it degraded to a no-op.
    pub fn undo(&mut self, context: &mut CommandContext) -> Option<Command> {
        let command = self.pop_undo()?;
        if !command.apply_inverse(context) {
            tracing::warn!("Undo of '{}' skipped: target missing", command.description());
        } else {
            tracing::debug!("Undid: {}", command.description());
        }
        self.push_redo(command.clone());
        Some(command)
    }

    /// Pop the latest undone edit, apply it forward, and move it back to undo.
    pub fn redo(&mut self, context: &mut CommandContext) -> Option<Command> {
        let command = self.pop_redo()?;
        if !command.apply_forward(context) {
            tracing::warn!("Redo of '{}' skipped: target missing", command.description());
        } else {
            tracing::debug!("Redid: {}", command.description());
        }
        self.push_undo(command.clone());
        Some(command)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Drop all history, as a page reload would.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::FieldBaselines;
    use crate::commands::{EditPanelTitle, MovePanel};
    use crate::panel::Panel;
    use crate::registry::PanelRegistry;

    fn title_edit(old: &str, new: &str) -> Command {
        Command::PanelTitleEdit(EditPanelTitle {
            panel_id: "p".to_string(),
            old_title: old.to_string(),
            new_title: new.to_string(),
        })
    }

    fn registry() -> PanelRegistry {
        let mut panel = Panel::notes("v2");
        panel.id = "p".to_string();
        PanelRegistry::from_panels(vec![panel])
    }

    #[test]
    fn test_basic_undo() {
        let mut history = HistoryManager::new();
        history.record_command(title_edit("v1", "v2"));
        assert!(history.can_undo());
        assert!(!history.can_redo());

        let mut registry = registry();
        let mut baselines = FieldBaselines::default();
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };
        let undone = history.undo(&mut ctx).unwrap();
        assert_eq!(undone, title_edit("v1", "v2"));
        assert_eq!(registry.panel("p").unwrap().title, "v1");
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut history = HistoryManager::new();
        let mut registry = registry();
        let before = registry.clone();
        let mut baselines = FieldBaselines::default();
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };
        assert!(history.undo(&mut ctx).is_none());
        assert!(history.redo(&mut ctx).is_none());
        assert_eq!(registry, before);
    }

    #[test]
    fn test_redo_cleared_on_new_action() {
        let mut history = HistoryManager::new();
        history.record_command(title_edit("a", "b"));
        history.push_redo(title_edit("b", "c"));
        history.push_redo(title_edit("c", "d"));
        assert_eq!(history.redo_depth(), 2);

        history.record_command(title_edit("b", "x"));
        assert_eq!(history.redo_depth(), 0);
        assert_eq!(history.undo_depth(), 2);
    }

    #[test]
    fn test_undo_of_missing_target_still_moves_to_redo() {
        let mut history = HistoryManager::new();
        history.record_command(Command::MovePanel(MovePanel {
            panel_id: "gone".to_string(),
            old_index: 0,
            new_index: 1,
        }));
        let mut registry = registry();
        let mut baselines = FieldBaselines::default();
        let mut ctx = CommandContext {
            registry: &mut registry,
            baselines: &mut baselines,
        };
        assert!(history.undo(&mut ctx).is_some());
        assert_eq!(history.redo_depth(), 1);
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut history = HistoryManager::with_depth(2);
        history.record_command(title_edit("1", "2"));
        history.record_command(title_edit("2", "3"));
        history.record_command(title_edit("3", "4"));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.pop_undo(), Some(title_edit("3", "4")));
        assert_eq!(history.pop_undo(), Some(title_edit("2", "3")));
        assert!(history.pop_undo().is_none());
    }

    #[test]
    fn test_clear() {
        let mut history = HistoryManager::new();
        history.record_command(title_edit("a", "b"));
        history.push_redo(title_edit("b", "c"));
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }
}
