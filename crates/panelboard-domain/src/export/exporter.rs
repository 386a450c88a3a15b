use super::models::ViewExport;
use crate::bucket::{load_settings, local_image_ids, read_bucket};
use crate::view::ViewId;
use chrono::NaiveDate;
use panelboard_core::{KeyValueStore, PanelboardResult};

pub struct ViewExporter;

impl ViewExporter {
    /// Gather a view's panels, the shared settings, and its stored images.
    pub async fn export_view(
        store: &dyn KeyValueStore,
        view: ViewId,
    ) -> PanelboardResult<ViewExport> {
        let panels = read_bucket(store, view).await?;
        let settings = load_settings(store).await?;
        let image_ids = local_image_ids(&panels);
        let images = if image_ids.is_empty() {
            Default::default()
        } else {
            store.get(&image_ids).await?
        };

        tracing::info!(
            "Exported view {}: {} panels, {} images",
            view,
            panels.len(),
            images.len()
        );
        Ok(ViewExport {
            view,
            panels,
            settings,
            images,
        })
    }

    pub fn export_filename(view: ViewId, date: NaiveDate) -> String {
        format!("startpage-backup-{}-{}.json", view, date.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::save_view;
    use crate::card::Card;
    use crate::panel::Panel;
    use panelboard_persistence::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(
            ViewExporter::export_filename(ViewId::C, date),
            "startpage-backup-C-2024-03-09.json"
        );
    }

    #[tokio::test]
    async fn test_export_includes_images_and_settings() {
        let store = MemoryStore::new();
        let mut panel = Panel::notes("Pics");
        let mut card = Card::with_image("data:image/png;base64,AAAA");
        card.id = "card-1".to_string();
        panel.cards.push(card);
        save_view(&store, ViewId::A, &[panel]).await.unwrap();

        let export = ViewExporter::export_view(&store, ViewId::A).await.unwrap();
        let value = export.to_value().unwrap();
        assert_eq!(value["panelsState"][0]["cards"][0]["imageUrl"], json!("local"));
        assert_eq!(value["card-1"], json!("data:image/png;base64,AAAA"));
        assert_eq!(value["settings"]["theme"], json!("light"));
    }
}
