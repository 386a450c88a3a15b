//! Moving panels between views.
//!
//! Each view's panel list is a separate bucket in the shared store and
//! nothing locks them: two readers can interleave and the later write
//! wins. Both buckets are written in a single `set` call, which narrows
//! but does not close the window in which a panel could be duplicated or
//! lost. Nothing is mutated in memory before that write succeeds.

use crate::bucket::{decode_panels, encode_panels};
use crate::panel::Panel;
use crate::view::ViewId;
use panelboard_core::{
    AppConfig, KeyValueStore, PanelPosition, PanelboardError, PanelboardResult, TabController,
    TabHandle,
};
use serde::Serialize;
use serde_json::Map;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelocationOutcome {
    pub message: String,
    /// Other tabs showing an affected view that were told to reload.
    pub reloaded_tabs: Vec<TabHandle>,
    /// Set when the active view was affected and must reload itself after this delay.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reload_active_after: Option<Duration>,
}

pub struct Relocator<'a> {
    store: &'a dyn KeyValueStore,
    tabs: &'a dyn TabController,
    active_view: Option<ViewId>,
    reload_delay: Duration,
}

impl<'a> Relocator<'a> {
    pub fn new(store: &'a dyn KeyValueStore, tabs: &'a dyn TabController) -> Self {
        Self {
            store,
            tabs,
            active_view: None,
            reload_delay: AppConfig::default().reload_delay(),
        }
    }

    /// The view the caller is showing; it is never reloaded through the tab controller.
    pub fn from_view(mut self, view: ViewId) -> Self {
        self.active_view = Some(view);
        self
    }

    pub fn with_reload_delay(mut self, delay: Duration) -> Self {
        self.reload_delay = delay;
        self
    }

    async fn read_pair(&self, x: ViewId, y: ViewId) -> PanelboardResult<(Vec<Panel>, Vec<Panel>)> {
        let keys = [x.storage_key().to_string(), y.storage_key().to_string()];
        let mut values = self.store.get(&keys).await?;
        let first = decode_panels(values.remove(x.storage_key()))?;
        let second = decode_panels(values.remove(y.storage_key()))?;
        Ok((first, second))
    }

    async fn write_pair(
        &self,
        x: ViewId,
        x_panels: &[Panel],
        y: ViewId,
        y_panels: &[Panel],
    ) -> PanelboardResult<()> {
        let mut items = Map::new();
        items.insert(x.storage_key().to_string(), encode_panels(x_panels)?);
        items.insert(y.storage_key().to_string(), encode_panels(y_panels)?);
        self.store.set(items).await
    }

    pub async fn move_panel(
        &self,
        panel_id: &str,
        source: ViewId,
        destination: ViewId,
        position: PanelPosition,
    ) -> PanelboardResult<RelocationOutcome> {
        if panel_id.is_empty() {
            return Err(PanelboardError::Validation("Invalid panel ID.".to_string()));
        }
        if source == destination {
            return Err(PanelboardError::Validation(
                "Source and destination organizers cannot be the same.".to_string(),
            ));
        }

        let (mut source_panels, mut destination_panels) =
            self.read_pair(source, destination).await?;

        let index = source_panels
            .iter()
            .position(|p| p.id == panel_id)
            .ok_or_else(|| {
                PanelboardError::NotFound(format!(
                    "Could not find panel {} in view {}. It might have been deleted.",
                    panel_id, source
                ))
            })?;
        let panel = source_panels.remove(index);
        let title = panel.title.clone();
        match position {
            PanelPosition::Top => destination_panels.insert(0, panel),
            PanelPosition::Bottom => destination_panels.push(panel),
        }

        self.write_pair(source, &source_panels, destination, &destination_panels)
            .await?;
        tracing::info!(
            "Moved panel {} from view {} to view {} ({:?})",
            panel_id,
            source,
            destination,
            position
        );

        let (reloaded_tabs, reload_active_after) = self.refresh_views([source, destination]).await;
        Ok(RelocationOutcome {
            message: format!("Moved '{}' from {} to {}.", title, source, destination),
            reloaded_tabs,
            reload_active_after,
        })
    }

    /// Exchange the complete panel lists of two views.
    pub async fn swap_organizers(&self, x: ViewId, y: ViewId) -> PanelboardResult<RelocationOutcome> {
        if x == y {
            return Err(PanelboardError::Validation(
                "Cannot swap an organizer with itself.".to_string(),
            ));
        }

        let (x_panels, y_panels) = self.read_pair(x, y).await?;
        self.write_pair(x, &y_panels, y, &x_panels).await?;
        tracing::info!(
            "Swapped views {} ({} panels) and {} ({} panels)",
            x,
            x_panels.len(),
            y,
            y_panels.len()
        );

        let (reloaded_tabs, reload_active_after) = self.refresh_views([x, y]).await;
        Ok(RelocationOutcome {
            message: format!("Swapped organizers {} and {}.", x, y),
            reloaded_tabs,
            reload_active_after,
        })
    }

    /// Best effort: failures are logged, views without an open tab are skipped.
    async fn refresh_views(&self, views: [ViewId; 2]) -> (Vec<TabHandle>, Option<Duration>) {
        let mut reloaded = Vec::new();
        for view in views {
            if Some(view) == self.active_view {
                continue;
            }
            let tabs = match self.tabs.find_tabs(view.page_url()).await {
                Ok(tabs) => tabs,
                Err(e) => {
                    tracing::warn!("Could not look up tabs for view {}: {}", view, e);
                    continue;
                }
            };
            for tab in tabs {
                match self.tabs.reload(tab).await {
                    Ok(()) => reloaded.push(tab),
                    Err(e) => tracing::warn!("Could not reload {}: {}", tab, e),
                }
            }
        }

        let reload_active = self
            .active_view
            .is_some_and(|active| views.contains(&active));
        (reloaded, reload_active.then_some(self.reload_delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::read_bucket;
    use panelboard_persistence::{LocalTabHub, MemoryStore};
    use serde_json::json;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        let mut items = Map::new();
        items.insert(
            ViewId::A.storage_key().to_string(),
            json!([
                {"id": "p1", "title": "One", "type": "notes", "cards": []},
                {"id": "p2", "title": "Two", "type": "notes", "cards": []}
            ]),
        );
        items.insert(
            ViewId::B.storage_key().to_string(),
            json!([{"id": "p3", "title": "Three", "type": "notes", "cards": []}]),
        );
        store.set(items).await.unwrap();
        store
    }

    fn ids(panels: &[Panel]) -> Vec<&str> {
        panels.iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_default_reload_delay_follows_config() {
        let store = seeded().await;
        let tabs = LocalTabHub::new();
        let outcome = Relocator::new(&store, &tabs)
            .from_view(ViewId::A)
            .move_panel("p1", ViewId::A, ViewId::B, PanelPosition::Top)
            .await
            .unwrap();
        assert_eq!(
            outcome.reload_active_after,
            Some(AppConfig::default().reload_delay())
        );
    }

    #[tokio::test]
    async fn test_move_to_top_of_empty_view() {
        let store = seeded().await;
        let tabs = LocalTabHub::new();
        let relocator = Relocator::new(&store, &tabs);

        relocator
            .move_panel("p1", ViewId::A, ViewId::C, PanelPosition::Top)
            .await
            .unwrap();

        let a = read_bucket(&store, ViewId::A).await.unwrap();
        let c = read_bucket(&store, ViewId::C).await.unwrap();
        assert_eq!(ids(&a), vec!["p2"]);
        assert_eq!(ids(&c), vec!["p1"]);
    }

    #[tokio::test]
    async fn test_move_positions() {
        let store = seeded().await;
        let tabs = LocalTabHub::new();
        let relocator = Relocator::new(&store, &tabs);

        relocator
            .move_panel("p2", ViewId::A, ViewId::B, PanelPosition::Bottom)
            .await
            .unwrap();
        relocator
            .move_panel("p1", ViewId::A, ViewId::B, PanelPosition::Top)
            .await
            .unwrap();

        let b = read_bucket(&store, ViewId::B).await.unwrap();
        assert_eq!(ids(&b), vec!["p1", "p3", "p2"]);
        assert!(read_bucket(&store, ViewId::A).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_same_view_rejected_before_io() {
        let store = seeded().await;
        let tabs = LocalTabHub::new();
        let err = Relocator::new(&store, &tabs)
            .move_panel("p1", ViewId::A, ViewId::A, PanelPosition::Top)
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_missing_panel_leaves_buckets_untouched() {
        let store = seeded().await;
        let before = store.snapshot().await;
        let tabs = LocalTabHub::new();

        let err = Relocator::new(&store, &tabs)
            .move_panel("nonexistent", ViewId::A, ViewId::B, PanelPosition::Bottom)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_swap_twice_restores() {
        let store = seeded().await;
        let before = store.snapshot().await;
        let tabs = LocalTabHub::new();
        let relocator = Relocator::new(&store, &tabs);

        relocator.swap_organizers(ViewId::A, ViewId::B).await.unwrap();
        assert_eq!(ids(&read_bucket(&store, ViewId::A).await.unwrap()), vec!["p3"]);
        relocator.swap_organizers(ViewId::A, ViewId::B).await.unwrap();
        assert_eq!(store.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_refresh_skips_active_view_and_schedules_self_reload() {
        let store = seeded().await;
        let tabs = LocalTabHub::new();
        let (tab_a, _rx_a) = tabs.open_tab(ViewId::A.page_url());
        let (tab_b, _rx_b) = tabs.open_tab(ViewId::B.page_url());
        let (_tab_c, _rx_c) = tabs.open_tab(ViewId::C.page_url());

        let outcome = Relocator::new(&store, &tabs)
            .from_view(ViewId::A)
            .with_reload_delay(Duration::from_millis(5))
            .move_panel("p1", ViewId::A, ViewId::B, PanelPosition::Bottom)
            .await
            .unwrap();

        assert_eq!(outcome.reloaded_tabs, vec![tab_b]);
        assert!(!outcome.reloaded_tabs.contains(&tab_a));
        assert_eq!(outcome.reload_active_after, Some(Duration::from_millis(5)));
    }

    #[tokio::test]
    async fn test_unaffected_active_view_does_not_reload() {
        let store = seeded().await;
        let tabs = LocalTabHub::new();
        let outcome = Relocator::new(&store, &tabs)
            .from_view(ViewId::C)
            .swap_organizers(ViewId::A, ViewId::B)
            .await
            .unwrap();
        assert!(outcome.reload_active_after.is_none());
        assert!(outcome.reloaded_tabs.is_empty());
    }
}
