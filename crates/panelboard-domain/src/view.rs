use panelboard_core::PanelboardError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key of the record shared by all views.
pub const SETTINGS_KEY: &str = "settings";

/// One of the three independent organizer pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ViewId {
    A,
    B,
    C,
}

impl ViewId {
    pub const ALL: [ViewId; 3] = [ViewId::A, ViewId::B, ViewId::C];

    /// Storage bucket holding this view's panel list.
    pub fn storage_key(self) -> &'static str {
        match self {
            ViewId::A => "panelsState",
            ViewId::B => "panelsState_B",
            ViewId::C => "panelsState_C",
        }
    }

    pub fn page_url(self) -> &'static str {
        match self {
            ViewId::A => "panelA.html",
            ViewId::B => "panelB.html",
            ViewId::C => "panelC.html",
        }
    }

    /// Resolve a page url (or path ending in one) back to its view. Unknown pages are A.
    pub fn from_page_url(url: &str) -> Self {
        let file = url.rsplit('/').next().unwrap_or(url);
        if file.starts_with("panelB") {
            ViewId::B
        } else if file.starts_with("panelC") {
            ViewId::C
        } else {
            ViewId::A
        }
    }

    pub fn letter(self) -> char {
        match self {
            ViewId::A => 'A',
            ViewId::B => 'B',
            ViewId::C => 'C',
        }
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for ViewId {
    type Err = PanelboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(ViewId::A),
            "B" | "b" => Ok(ViewId::B),
            "C" | "c" => Ok(ViewId::C),
            other => Err(PanelboardError::Validation(format!(
                "Unknown view '{}', expected A, B or C",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_distinct() {
        assert_eq!(ViewId::A.storage_key(), "panelsState");
        assert_eq!(ViewId::B.storage_key(), "panelsState_B");
        assert_eq!(ViewId::C.storage_key(), "panelsState_C");
    }

    #[test]
    fn test_from_page_url() {
        assert_eq!(ViewId::from_page_url("chrome-extension://x/panelB.html"), ViewId::B);
        assert_eq!(ViewId::from_page_url("panelC.html"), ViewId::C);
        assert_eq!(ViewId::from_page_url("index.html"), ViewId::A);
    }

    #[test]
    fn test_parse() {
        assert_eq!("b".parse::<ViewId>().unwrap(), ViewId::B);
        assert!("D".parse::<ViewId>().unwrap_err().is_validation());
    }
}
