use serde::{Deserialize, Serialize};

use crate::domain::{Item, ItemId, ItemType};

pub const ITEMS_ROUTE: &str = "/api/items";
pub const CLAIM_ROUTE: &str = "/api/items/claim";
pub const PING_ROUTE: &str = "/api/ping";

/// Body of `POST /api/items`, sent form-encoded.
///
/// Every field is optional on the wire so the service can answer a missing
/// field with its own validation message instead of a decoder rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemForm {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub item_type: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
}

/// Client-side view of a report about to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemReport {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub location: String,
    pub contact_name: String,
    pub contact_phone: String,
}

impl From<&NewItemReport> for CreateItemForm {
    fn from(report: &NewItemReport) -> Self {
        Self {
            title: Some(report.title.clone()),
            description: Some(report.description.clone()),
            item_type: Some(report.item_type.as_str().to_string()),
            location: Some(report.location.clone()),
            contact_name: Some(report.contact_name.clone()),
            contact_phone: Some(report.contact_phone.clone()),
        }
    }
}

/// Body of `POST /api/items/claim`. The id stays textual so a malformed value
/// reaches the service's own "Invalid item id" answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimItemForm {
    #[serde(default)]
    pub id: Option<String>,
}

impl ClaimItemForm {
    pub fn for_item(id: ItemId) -> Self {
        Self {
            id: Some(id.0.to_string()),
        }
    }
}

/// Answer to create and claim requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            item: None,
        }
    }

    pub fn created(message: impl Into<String>, item: Item) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            item: Some(item),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            item: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}
