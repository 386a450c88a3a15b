//! Reading and writing one view's bucket.
//!
//! Inline `data:` images are kept out of the panel document: each is
//! stored under its card id and the card carries the local marker instead.

use crate::card::LOCAL_IMAGE_MARKER;
use crate::panel::Panel;
use crate::settings::Settings;
use crate::view::{ViewId, SETTINGS_KEY};
use panelboard_core::{KeyValueStore, PanelboardError, PanelboardResult};
use serde_json::{Map, Value};

/// Decode a stored panel list. A missing bucket is an empty list.
pub fn decode_panels(value: Option<Value>) -> PanelboardResult<Vec<Panel>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| PanelboardError::Serialization(format!("panel list: {}", e))),
    }
}

pub fn encode_panels(panels: &[Panel]) -> PanelboardResult<Value> {
    serde_json::to_value(panels).map_err(|e| PanelboardError::Serialization(e.to_string()))
}

/// Move inline images out of the panels. Returns the stripped panels and
/// the image entries keyed by card id.
pub fn split_images(panels: &[Panel]) -> (Vec<Panel>, Map<String, Value>) {
    let mut images = Map::new();
    let stripped = panels
        .iter()
        .cloned()
        .map(|mut panel| {
            for card in panel.cards.iter_mut().filter(|c| c.has_inline_image()) {
                if let Some(uri) = card.image_url.replace(LOCAL_IMAGE_MARKER.to_string()) {
                    images.insert(card.id.clone(), Value::String(uri));
                }
            }
            panel
        })
        .collect();
    (stripped, images)
}

/// Card ids whose image payload lives under their own key.
pub fn local_image_ids(panels: &[Panel]) -> Vec<String> {
    panels
        .iter()
        .filter(|p| p.is_notes())
        .flat_map(|p| p.cards.iter())
        .filter(|c| c.has_local_image())
        .map(|c| c.id.clone())
        .collect()
}

/// Replace local markers with the stored payloads that exist.
pub fn hydrate_images(panels: &mut [Panel], images: &Map<String, Value>) {
    for card in panels.iter_mut().flat_map(|p| p.cards.iter_mut()) {
        if !card.has_local_image() {
            continue;
        }
        if let Some(Value::String(uri)) = images.get(&card.id) {
            card.image_url = Some(uri.clone());
        }
    }
}

/// Raw panel list of a bucket, images left as markers.
pub async fn read_bucket(store: &dyn KeyValueStore, view: ViewId) -> PanelboardResult<Vec<Panel>> {
    decode_panels(store.get_one(view.storage_key()).await?)
}

/// Panel list of a view with image payloads restored.
pub async fn load_view(store: &dyn KeyValueStore, view: ViewId) -> PanelboardResult<Vec<Panel>> {
    let mut panels = read_bucket(store, view).await?;
    let image_ids = local_image_ids(&panels);
    if !image_ids.is_empty() {
        let images = store.get(&image_ids).await?;
        hydrate_images(&mut panels, &images);
    }
    tracing::debug!("Loaded {} panels for view {}", panels.len(), view);
    Ok(panels)
}

/// Persist a view's panels and their image payloads in one write.
pub async fn save_view(
    store: &dyn KeyValueStore,
    view: ViewId,
    panels: &[Panel],
) -> PanelboardResult<()> {
    let (stripped, mut items) = split_images(panels);
    items.insert(view.storage_key().to_string(), encode_panels(&stripped)?);
    store.set(items).await?;
    tracing::debug!("Saved {} panels for view {}", panels.len(), view);
    Ok(())
}

pub async fn load_settings(store: &dyn KeyValueStore) -> PanelboardResult<Settings> {
    Ok(Settings::from_value(store.get_one(SETTINGS_KEY).await?))
}

pub async fn save_settings(store: &dyn KeyValueStore, settings: &Settings) -> PanelboardResult<()> {
    let value =
        serde_json::to_value(settings).map_err(|e| PanelboardError::Serialization(e.to_string()))?;
    let mut items = Map::new();
    items.insert(SETTINGS_KEY.to_string(), value);
    store.set(items).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use serde_json::json;

    fn panel_with_image() -> Panel {
        let mut panel = Panel::notes("Pics");
        let mut card = Card::with_image("data:image/png;base64,AAAA");
        card.id = "card-img".to_string();
        panel.cards.push(card);
        panel.cards.push(Card::new("plain"));
        panel
    }

    #[test]
    fn test_split_then_hydrate_restores_images() {
        let panels = vec![panel_with_image()];
        let (mut stripped, images) = split_images(&panels);

        assert_eq!(stripped[0].cards[0].image_url.as_deref(), Some(LOCAL_IMAGE_MARKER));
        assert_eq!(images.get("card-img"), Some(&json!("data:image/png;base64,AAAA")));
        assert_eq!(local_image_ids(&stripped), vec!["card-img".to_string()]);

        hydrate_images(&mut stripped, &images);
        assert_eq!(stripped, panels);
    }

    #[test]
    fn test_missing_payload_keeps_marker() {
        let (mut stripped, _) = split_images(&[panel_with_image()]);
        hydrate_images(&mut stripped, &Map::new());
        assert!(stripped[0].cards[0].has_local_image());
    }

    #[test]
    fn test_decode_missing_and_malformed() {
        assert!(decode_panels(None).unwrap().is_empty());
        assert!(decode_panels(Some(Value::Null)).unwrap().is_empty());
        assert!(matches!(
            decode_panels(Some(json!({"not": "a list"}))),
            Err(PanelboardError::Serialization(_))
        ));
    }
}
