use crate::view::ViewId;
use panelboard_core::PanelPosition;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BookmarkSortOrder {
    #[default]
    Mixed,
    FoldersFirst,
}

/// Settings record shared by every view.
///
/// Keys this struct does not model are carried in `extra` so a load/save
/// cycle never drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub show_clock: bool,
    #[serde(default = "default_true")]
    pub show_date: bool,
    #[serde(default = "default_true")]
    pub show_year: bool,
    #[serde(default = "default_true")]
    pub show_day_of_week: bool,
    #[serde(default = "default_date_font_size")]
    pub date_font_size: String,
    #[serde(default)]
    pub sidebar_folder_id: String,
    #[serde(default)]
    pub new_panel_position: PanelPosition,
    #[serde(default = "default_true", rename = "startupA")]
    pub startup_a: bool,
    #[serde(default, rename = "startupB")]
    pub startup_b: bool,
    #[serde(default, rename = "startupC")]
    pub startup_c: bool,
    #[serde(default)]
    pub sort_recursively: bool,
    #[serde(default)]
    pub sort_order: BookmarkSortOrder,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bg_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sidebar_bg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

fn default_date_font_size() -> String {
    "11px".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            show_clock: true,
            show_date: true,
            show_year: true,
            show_day_of_week: true,
            date_font_size: default_date_font_size(),
            sidebar_folder_id: String::new(),
            new_panel_position: PanelPosition::default(),
            startup_a: true,
            startup_b: false,
            startup_c: false,
            sort_recursively: false,
            sort_order: BookmarkSortOrder::default(),
            primary_color: None,
            bg_color: None,
            sidebar_bg: None,
            text_color: None,
            accent_color: None,
            extra: Map::new(),
        }
    }
}

impl Settings {
    /// Lenient decode: a missing or malformed record yields defaults.
    pub fn from_value(value: Option<Value>) -> Self {
        value
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    /// Views opened at launch. All-false falls back to A.
    pub fn startup_views(&self) -> Vec<ViewId> {
        let views: Vec<ViewId> = [
            (ViewId::A, self.startup_a),
            (ViewId::B, self.startup_b),
            (ViewId::C, self.startup_c),
        ]
        .into_iter()
        .filter_map(|(view, wanted)| wanted.then_some(view))
        .collect();

        if views.is_empty() {
            vec![ViewId::A]
        } else {
            views
        }
    }
}
