//! One open organizer page: the in-memory panel list of a view plus
//! everything needed to edit, undo and persist it.

use crate::bookmarks::{self, SortOptions};
use crate::bucket::{load_settings, load_view, save_view};
use crate::bulk_import::{self, FolderImportSummary};
use crate::capture::{DragContext, EditCapture, FieldRef};
use crate::card::{Card, CardId};
use crate::commands::{Command, CommandContext};
use crate::export::{ImportSummary, ViewExport, ViewExporter, ViewImporter};
use crate::history::HistoryManager;
use crate::panel::{Panel, PanelId};
use crate::registry::PanelRegistry;
use crate::relocation::{RelocationOutcome, Relocator};
use crate::settings::Settings;
use crate::view::ViewId;
use panelboard_core::{
    AppConfig, BookmarkProvider, KeyValueStore, LogEntry, Loggable, PanelPosition,
    PanelboardError, PanelboardResult, TabController, TabSignal,
};
use std::sync::Arc;

pub const DEFAULT_PANEL_TITLE: &str = "To-Do List";

pub struct ViewSession {
    view: ViewId,
    registry: PanelRegistry,
    history: HistoryManager,
    capture: EditCapture,
    settings: Settings,
    logs: Vec<LogEntry>,
    store: Arc<dyn KeyValueStore>,
    tabs: Arc<dyn TabController>,
    config: AppConfig,
}

impl ViewSession {
    /// Open `view`. An empty bucket is seeded with a single notes panel.
    pub async fn open(
        view: ViewId,
        store: Arc<dyn KeyValueStore>,
        tabs: Arc<dyn TabController>,
        config: AppConfig,
    ) -> PanelboardResult<Self> {
        let mut session = Self {
            view,
            registry: PanelRegistry::new(),
            history: HistoryManager::with_depth(config.history_depth),
            capture: EditCapture::new(),
            settings: Settings::default(),
            logs: Vec::new(),
            store,
            tabs,
            config,
        };
        session.load().await?;
        Ok(session)
    }

    async fn load(&mut self) -> PanelboardResult<()> {
        let panels = load_view(self.store.as_ref(), self.view).await?;
        let seeded = panels.is_empty();
        self.registry = if seeded {
            PanelRegistry::from_panels(vec![Panel::notes(DEFAULT_PANEL_TITLE)])
        } else {
            PanelRegistry::from_panels(panels)
        };
        self.settings = load_settings(self.store.as_ref()).await?;
        if seeded {
            self.save().await?;
            tracing::info!("View {} was empty, seeded a default panel", self.view);
        }
        Ok(())
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    pub fn panels(&self) -> &[Panel] {
        self.registry.panels()
    }

    pub fn registry(&self) -> &PanelRegistry {
        &self.registry
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn drag_in_flight(&self) -> Option<&DragContext> {
        self.capture.drag_in_flight()
    }

    pub fn focused_field(&self) -> Option<&FieldRef> {
        self.capture.baselines.focused()
    }

    pub async fn save(&self) -> PanelboardResult<()> {
        save_view(self.store.as_ref(), self.view, self.registry.panels()).await
    }

    /// Re-read storage as a fresh page load would. History and any
    /// in-progress edit or drag are discarded.
    pub async fn reload(&mut self) -> PanelboardResult<()> {
        self.load().await?;
        self.history.clear();
        self.capture = EditCapture::new();
        tracing::debug!("View {} reloaded from storage", self.view);
        Ok(())
    }

    /// Returns true when the signal made the session reload.
    pub async fn handle_signal(&mut self, signal: TabSignal) -> PanelboardResult<bool> {
        match signal {
            TabSignal::Reload => {
                self.reload().await?;
                Ok(true)
            }
            TabSignal::Focus => Ok(false),
        }
    }

    /// Add a panel at `position`, or where the settings put new panels.
    pub async fn add_panel(
        &mut self,
        panel: Panel,
        position: Option<PanelPosition>,
    ) -> PanelboardResult<PanelId> {
        let position = position.unwrap_or(self.settings.new_panel_position);
        let id = panel.id.clone();
        self.registry.add_panel(panel, position);
        self.save().await?;
        Ok(id)
    }

    pub async fn delete_panel(&mut self, panel_id: &str) -> PanelboardResult<Command> {
        let command = self
            .capture
            .delete_panel(&mut self.registry, &mut self.history, panel_id)?;
        self.save().await?;
        Ok(command)
    }

    pub async fn delete_card(&mut self, card_id: &str) -> PanelboardResult<Command> {
        let command = self
            .capture
            .delete_card(&mut self.registry, &mut self.history, card_id)?;
        self.save().await?;
        Ok(command)
    }

    pub async fn add_card(&mut self, panel_id: &str, text: &str) -> PanelboardResult<CardId> {
        self.insert_card(panel_id, Card::new(text)).await
    }

    /// Paste an image as a new card.
    pub async fn paste_image(&mut self, panel_id: &str, data_uri: &str) -> PanelboardResult<CardId> {
        if !data_uri.starts_with("data:") {
            return Err(PanelboardError::Validation(
                "pasted images must be data: uris".to_string(),
            ));
        }
        self.insert_card(panel_id, Card::with_image(data_uri)).await
    }

    async fn insert_card(&mut self, panel_id: &str, card: Card) -> PanelboardResult<CardId> {
        let id = card.id.clone();
        self.capture
            .create_card(&mut self.registry, &mut self.history, panel_id, card)?;
        self.save().await?;
        Ok(id)
    }

    /// Focus a field, committing and saving any pending edit of the previous one.
    pub async fn focus(&mut self, field: FieldRef) -> PanelboardResult<Option<Command>> {
        let command = self
            .capture
            .focus_field(&mut self.registry, &mut self.history, field)?;
        if command.is_some() {
            self.save().await?;
        }
        Ok(command)
    }

    pub fn type_text(&mut self, text: &str) -> PanelboardResult<()> {
        self.capture.type_text(text)
    }

    /// Blur the focused field, recording and saving an edit if it changed.
    pub async fn commit_field(&mut self) -> PanelboardResult<Option<Command>> {
        let command = self
            .capture
            .commit_field(&mut self.registry, &mut self.history);
        if command.is_some() {
            self.save().await?;
        }
        Ok(command)
    }

    pub fn begin_card_drag(&mut self, card_id: &str) -> PanelboardResult<()> {
        self.capture.begin_card_drag(&self.registry, card_id)
    }

    pub fn begin_panel_drag(&mut self, panel_id: &str) -> PanelboardResult<()> {
        self.capture.begin_panel_drag(&self.registry, panel_id)
    }

    pub fn cancel_drag(&mut self) {
        self.capture.cancel_drag();
    }

    pub async fn drop_card(
        &mut self,
        dest_panel_id: &str,
        dest_index: usize,
    ) -> PanelboardResult<Option<Command>> {
        let command = self.capture.drop_card(
            &mut self.registry,
            &mut self.history,
            dest_panel_id,
            dest_index,
        )?;
        if command.is_some() {
            self.save().await?;
        }
        Ok(command)
    }

    pub async fn drop_panel(&mut self, dest_index: usize) -> PanelboardResult<Option<Command>> {
        let command = self
            .capture
            .drop_panel(&mut self.registry, &mut self.history, dest_index)?;
        if command.is_some() {
            self.save().await?;
        }
        Ok(command)
    }

    /// Undo. Uncommitted typing in the focused field is reverted first and
    /// becomes redoable; otherwise the newest recorded command is undone.
    pub async fn undo(&mut self) -> PanelboardResult<Option<Command>> {
        if let Some(command) = self.capture.revert_focused_edit(&mut self.history) {
            return Ok(Some(command));
        }
        let mut context = CommandContext {
            registry: &mut self.registry,
            baselines: &mut self.capture.baselines,
        };
        let command = self.history.undo(&mut context);
        if command.is_some() {
            self.save().await?;
        }
        Ok(command)
    }

    pub async fn redo(&mut self) -> PanelboardResult<Option<Command>> {
        let mut context = CommandContext {
            registry: &mut self.registry,
            baselines: &mut self.capture.baselines,
        };
        let command = self.history.redo(&mut context);
        if command.is_some() {
            self.save().await?;
        }
        Ok(command)
    }

    fn relocator(&self) -> Relocator<'_> {
        Relocator::new(self.store.as_ref(), self.tabs.as_ref())
            .from_view(self.view)
            .with_reload_delay(self.config.reload_delay())
    }

    async fn finish_relocation(
        &mut self,
        result: PanelboardResult<RelocationOutcome>,
        failure: &str,
    ) -> PanelboardResult<RelocationOutcome> {
        let outcome = match result {
            Ok(outcome) => outcome,
            Err(e) => {
                self.add_error(format!("{}: {}", failure, e));
                return Err(e);
            }
        };
        if let Some(delay) = outcome.reload_active_after {
            tokio::time::sleep(delay).await;
            self.reload().await?;
        }
        self.add_log(outcome.message.clone());
        Ok(outcome)
    }

    /// Send a panel of this view to another view.
    pub async fn move_panel_to(
        &mut self,
        panel_id: &str,
        destination: ViewId,
        position: PanelPosition,
    ) -> PanelboardResult<RelocationOutcome> {
        self.save().await?;
        let result = self
            .relocator()
            .move_panel(panel_id, self.view, destination, position)
            .await;
        self.finish_relocation(result, "Error moving panel").await
    }

    pub async fn swap_with(&mut self, other: ViewId) -> PanelboardResult<RelocationOutcome> {
        self.save().await?;
        let result = self.relocator().swap_organizers(self.view, other).await;
        self.finish_relocation(result, "Error swapping organizers").await
    }

    pub async fn import_bookmark_folders(
        &mut self,
        bookmarks: &dyn BookmarkProvider,
    ) -> PanelboardResult<FolderImportSummary> {
        self.save().await?;
        let summary = bulk_import::import_bookmark_folders(
            self.store.as_ref(),
            bookmarks,
            self.view,
            &self.config,
        )
        .await?;
        if summary.added_count() > 0 {
            self.reload().await?;
        }
        self.add_log(summary.message());
        Ok(summary)
    }

    pub async fn export(&self) -> PanelboardResult<ViewExport> {
        self.save().await?;
        ViewExporter::export_view(self.store.as_ref(), self.view).await
    }

    /// Replace this view's panels and the shared settings with a backup.
    pub async fn import(
        &mut self,
        backup: ViewExport,
        bookmarks: Option<&dyn BookmarkProvider>,
    ) -> PanelboardResult<ImportSummary> {
        if backup.view != self.view {
            return Err(PanelboardError::Validation(format!(
                "backup is for View {}, not View {}",
                backup.view, self.view
            )));
        }
        let summary = ViewImporter::import_view(self.store.as_ref(), bookmarks, backup).await?;
        self.reload().await?;
        self.add_log("Import successful!".to_string());
        Ok(summary)
    }

    /// Sort the bookmark folder shown in the sidebar, or the bookmark bar.
    pub async fn sort_bookmarks(
        &mut self,
        bookmarks: &dyn BookmarkProvider,
    ) -> PanelboardResult<usize> {
        let root = if self.settings.sidebar_folder_id.is_empty() {
            bookmarks::BOOKMARK_BAR_ID.to_string()
        } else {
            self.settings.sidebar_folder_id.clone()
        };
        let sorted =
            bookmarks::sort_bookmarks(bookmarks, &root, SortOptions::from(&self.settings)).await?;
        self.add_log(format!("Sorted {} bookmark folders.", sorted));
        Ok(sorted)
    }

    /// A bookmark folder was renamed outside the organizer.
    pub async fn folder_renamed(&mut self, folder_id: &str, title: &str) -> PanelboardResult<bool> {
        let changed = bookmarks::sync_folder_title(&mut self.registry, folder_id, title);
        if changed {
            self.save().await?;
        }
        Ok(changed)
    }
}

impl Loggable for ViewSession {
    fn add_log(&mut self, message: String) {
        tracing::info!("[view {}] {}", self.view, message);
        self.logs.push(LogEntry::new(message));
    }

    fn add_error(&mut self, message: String) {
        tracing::warn!("[view {}] {}", self.view, message);
        self.logs.push(LogEntry::error(message));
    }

    fn get_logs(&self) -> &[LogEntry] {
        &self.logs
    }
}
