use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_newtype!(ItemId);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised {kind} value '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

/// Whether an item was reported as lost by its owner or found by someone else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemType {
    #[default]
    Lost,
    Found,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Lost => "LOST",
            ItemType::Found => "FOUND",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("lost") {
            Ok(ItemType::Lost)
        } else if s.eq_ignore_ascii_case("found") {
            Ok(ItemType::Found)
        } else {
            Err(ParseEnumError {
                kind: "item type",
                value: s.to_string(),
            })
        }
    }
}

/// Claim state. `Claimed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    Open,
    Claimed,
}

impl ItemStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemStatus::Open => "OPEN",
            ItemStatus::Claimed => "CLAIMED",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("open") {
            Ok(ItemStatus::Open)
        } else if s.eq_ignore_ascii_case("claimed") {
            Ok(ItemStatus::Claimed)
        } else {
            Err(ParseEnumError {
                kind: "item status",
                value: s.to_string(),
            })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    #[serde(default)]
    pub location: String,
    pub contact_name: String,
    pub contact_phone: String,
    #[serde(default)]
    pub status: ItemStatus,
    pub date_reported: DateTime<Utc>,
}

impl Item {
    pub fn is_claimable(&self) -> bool {
        self.status == ItemStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_uses_camel_case_wire_names() {
        let json = serde_json::json!({
            "id": 7,
            "title": "Wallet",
            "description": "",
            "type": "LOST",
            "location": "Library",
            "contactName": "Jo",
            "contactPhone": "555-1234",
            "status": "OPEN",
            "dateReported": "2025-03-01T10:00:00Z"
        });
        let item: Item = serde_json::from_value(json).expect("item");
        assert_eq!(item.id, ItemId(7));
        assert_eq!(item.item_type, ItemType::Lost);
        assert_eq!(item.contact_name, "Jo");
        assert!(item.is_claimable());
    }

    #[test]
    fn missing_status_decodes_as_open() {
        let json = serde_json::json!({
            "id": 1,
            "title": "Keys",
            "type": "FOUND",
            "contactName": "Sam",
            "contactPhone": "1",
            "dateReported": "2025-03-01T10:00:00Z"
        });
        let item: Item = serde_json::from_value(json).expect("item");
        assert_eq!(item.status, ItemStatus::Open);
        assert_eq!(item.description, "");
    }

    #[test]
    fn item_type_parses_case_insensitively() {
        assert_eq!("found".parse::<ItemType>(), Ok(ItemType::Found));
        assert_eq!("LOST".parse::<ItemType>(), Ok(ItemType::Lost));
        assert!("stolen".parse::<ItemType>().is_err());
    }
}
