use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CardId = String;

/// Marker stored in a panel document when the image payload lives under the card's own key.
pub const LOCAL_IMAGE_MARKER: &str = "local";

/// Text used when a card is recreated without its original content.
pub const PLACEHOLDER_TEXT: &str = "New Card";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub text: String,
    /// `None`, the local marker, or an inline `data:` uri.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Card {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: format!("card-{}", Uuid::new_v4()),
            text: text.into(),
            image_url: None,
        }
    }

    pub fn with_image(data_uri: impl Into<String>) -> Self {
        Self {
            id: format!("card-{}", Uuid::new_v4()),
            text: String::new(),
            image_url: Some(data_uri.into()),
        }
    }

    /// The fixed template a redone card creation is rebuilt from.
    pub fn placeholder(id: CardId) -> Self {
        Self {
            id,
            text: PLACEHOLDER_TEXT.to_string(),
            image_url: None,
        }
    }

    pub fn has_inline_image(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| url.starts_with("data:"))
    }

    pub fn has_local_image(&self) -> bool {
        self.image_url.as_deref() == Some(LOCAL_IMAGE_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_ids_are_unique() {
        let a = Card::new("one");
        let b = Card::new("one");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("card-"));
    }

    #[test]
    fn test_image_kinds() {
        let inline = Card::with_image("data:image/png;base64,AAAA");
        assert!(inline.has_inline_image());
        assert!(!inline.has_local_image());

        let mut local = Card::new("");
        local.image_url = Some(LOCAL_IMAGE_MARKER.to_string());
        assert!(local.has_local_image());
        assert!(!local.has_inline_image());
    }

    #[test]
    fn test_wire_format_uses_image_url() {
        let card = Card::placeholder("card-1".to_string());
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["imageUrl"], serde_json::Value::Null);
        assert_eq!(json["text"], "New Card");
    }
}
