//! Response shapes of the Actions protocol. These mirror the envelope an
//! Actions client expects; the serialized field names are part of the wire
//! contract and must not drift.

use serde::{
    Deserialize,
    Serialize,
};

/// UI metadata for one action: what to show and which links to offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<ActionLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionLinks {
    pub actions: Vec<LinkedAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkedAction {
    pub label: String,
    pub href: String,
}

/// POST response: an unsigned transaction for the client to sign plus the
/// next action to render once it lands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionPostResponse {
    pub transaction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<PostActionLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostActionLinks {
    pub next: NextActionLink,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NextActionLink {
    Inline { action: ActionMetadata },
}

/// Bare acknowledgment for requests that carry nothing actionable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Acknowledgment {
    pub success: bool,
}

impl ActionMetadata {
    pub fn with_actions(
        icon: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        label: impl Into<String>,
        actions: Vec<LinkedAction>,
    ) -> Self {
        Self {
            kind: "action".to_string(),
            icon: icon.into(),
            title: title.into(),
            description: description.into(),
            label: label.into(),
            links: Some(ActionLinks { actions }),
        }
    }
}

impl LinkedAction {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

impl ActionPostResponse {
    pub fn with_next_action(transaction: String, action: ActionMetadata) -> Self {
        Self {
            transaction,
            links: Some(PostActionLinks {
                next: NextActionLink::Inline { action },
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use serde_json::json;

    #[test]
    fn action_metadata__serializes_with_wire_field_names() {
        let metadata = ActionMetadata::with_actions(
            "https://x/thumbnail.png",
            "Title",
            "Description",
            "",
            vec![LinkedAction::new("Go", "/api/action?scene=farm")],
        );
        let expected = json!({
            "type": "action",
            "icon": "https://x/thumbnail.png",
            "title": "Title",
            "description": "Description",
            "label": "",
            "links": {
                "actions": [{ "label": "Go", "href": "/api/action?scene=farm" }]
            }
        });
        assert_eq!(expected, serde_json::to_value(&metadata).unwrap());
    }

    #[test]
    fn post_response__next_action_is_tagged_inline() {
        let payload = ActionPostResponse::with_next_action(
            "dHg=".to_string(),
            ActionMetadata::with_actions("i", "t", "d", "l", vec![]),
        );
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!("dHg=", value["transaction"]);
        assert_eq!("inline", value["links"]["next"]["type"]);
        assert_eq!("action", value["links"]["next"]["action"]["type"]);
    }
}
