use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a new or relocated panel lands in its destination list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPosition {
    Top,
    #[default]
    Bottom,
}

impl std::str::FromStr for PanelPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            other => Err(format!("unknown position '{}', expected top or bottom", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,
    #[serde(default = "default_reload_delay_ms")]
    pub reload_delay_ms: u64,
    #[serde(default = "default_reserved_folder_ids")]
    pub reserved_folder_ids: Vec<String>,
    #[serde(default)]
    pub default_new_panel_position: PanelPosition,
}

fn default_history_depth() -> usize {
    100
}

fn default_reload_delay_ms() -> u64 {
    150
}

fn default_reserved_folder_ids() -> Vec<String> {
    vec!["0".to_string(), "1".to_string(), "2".to_string()]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
            reload_delay_ms: default_reload_delay_ms(),
            reserved_folder_ids: default_reserved_folder_ids(),
            default_new_panel_position: PanelPosition::default(),
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/panelboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("panelboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("panelboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    return Self::from_toml_str(&content);
                }
            }
        }
        Self::default()
    }

    /// Parse a config document, falling back to defaults when it is malformed.
    pub fn from_toml_str(content: &str) -> Self {
        toml::from_str(content).unwrap_or_default()
    }

    pub fn reload_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reload_delay_ms)
    }

    pub fn is_reserved_folder(&self, folder_id: &str) -> bool {
        self.reserved_folder_ids.iter().any(|id| id == folder_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.history_depth, 100);
        assert_eq!(config.reload_delay_ms, 150);
        assert!(config.is_reserved_folder("1"));
        assert!(!config.is_reserved_folder("42"));
        assert_eq!(config.default_new_panel_position, PanelPosition::Bottom);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = AppConfig::from_toml_str("history_depth = 5\ndefault_new_panel_position = \"top\"");
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.reload_delay_ms, 150);
        assert_eq!(config.default_new_panel_position, PanelPosition::Top);
    }

    #[test]
    fn test_malformed_toml_falls_back() {
        let config = AppConfig::from_toml_str("history_depth = \"lots\"");
        assert_eq!(config.history_depth, 100);
    }

    #[test]
    fn test_position_parse() {
        assert_eq!("TOP".parse::<PanelPosition>().unwrap(), PanelPosition::Top);
        assert!("middle".parse::<PanelPosition>().is_err());
    }
}
