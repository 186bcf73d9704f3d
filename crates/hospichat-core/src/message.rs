//! UI-agnostic message types
//!
//! A `Message` is one turn of the conversation. It is shared between the
//! store and whatever view renders it, and doesn't depend on any specific
//! UI framework.

use serde::{Deserialize, Serialize};

/// One turn in the conversation: the user's text or a formatted assistant reply
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Prose portion of the message
    pub text: String,
    pub is_user: bool,
    /// Bullet items, present only on assistant replies that had at least one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
}

impl Message {
    /// A message typed by the user. User messages never carry items.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            items: None,
        }
    }

    pub fn assistant(text: impl Into<String>, items: Option<Vec<String>>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            items,
        }
    }

    pub fn has_items(&self) -> bool {
        self.items.as_ref().is_some_and(|items| !items.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_has_no_items() {
        let msg = Message::user("Bonjour");
        assert!(msg.is_user);
        assert_eq!(msg.items, None);
        assert!(!msg.has_items());
    }

    #[test]
    fn test_serialized_field_names() {
        let msg = Message::assistant("Voici:", Some(vec!["A".to_string()]));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "text": "Voici:", "isUser": false, "items": ["A"] })
        );
    }

    #[test]
    fn test_absent_items_are_omitted() {
        let json = serde_json::to_string(&Message::user("salut")).unwrap();
        assert_eq!(json, r#"{"text":"salut","isUser":true}"#);
    }
}
