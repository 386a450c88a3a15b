use crate::bucket::{decode_panels, encode_panels, local_image_ids};
use crate::panel::Panel;
use crate::settings::Settings;
use crate::view::{ViewId, SETTINGS_KEY};
use panelboard_core::{PanelboardError, PanelboardResult};
use serde_json::{Map, Value};

/// One view's backup document.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewExport {
    pub view: ViewId,
    pub panels: Vec<Panel>,
    pub settings: Settings,
    /// Image payloads keyed by card id.
    pub images: Map<String, Value>,
}

impl ViewExport {
    pub fn to_value(&self) -> PanelboardResult<Value> {
        let mut document = self.images.clone();
        document.insert(
            self.view.storage_key().to_string(),
            encode_panels(&self.panels)?,
        );
        document.insert(
            SETTINGS_KEY.to_string(),
            serde_json::to_value(&self.settings)
                .map_err(|e| PanelboardError::Serialization(e.to_string()))?,
        );
        Ok(Value::Object(document))
    }

    pub fn to_json_string(&self) -> PanelboardResult<String> {
        serde_json::to_string_pretty(&self.to_value()?)
            .map_err(|e| PanelboardError::Serialization(e.to_string()))
    }

    /// Parse a backup for `view`. Both the view's bucket key and `settings`
    /// must be present; nothing else is required.
    pub fn from_value(view: ViewId, value: Value) -> PanelboardResult<Self> {
        let Value::Object(mut document) = value else {
            return Err(PanelboardError::Validation(
                "Invalid backup file: expected a JSON object.".to_string(),
            ));
        };
        let key = view.storage_key();
        let (Some(panels), Some(settings)) = (document.remove(key), document.remove(SETTINGS_KEY))
        else {
            return Err(PanelboardError::Validation(format!(
                "Invalid backup file for View {}: '{}' and '{}' are both required.",
                view, key, SETTINGS_KEY
            )));
        };

        let panels = decode_panels(Some(panels))?;
        let settings = serde_json::from_value(settings)
            .map_err(|e| PanelboardError::Validation(format!("Invalid settings: {}", e)))?;
        let images = local_image_ids(&panels)
            .into_iter()
            .filter_map(|id| document.remove(&id).map(|uri| (id, uri)))
            .collect();

        Ok(Self {
            view,
            panels,
            settings,
            images,
        })
    }

    pub fn from_json_str(view: ViewId, data: &str) -> PanelboardResult<Self> {
        let value: Value = serde_json::from_str(data)
            .map_err(|e| PanelboardError::Validation(format!("Invalid backup file: {}", e)))?;
        Self::from_value(view, value)
    }
}
