use shared::{
    domain::{Item, ItemId, ItemType},
    error::{ApiError, ErrorCode},
    protocol::CreateItemForm,
};
use storage::{ClaimUpdate, NewItem, Storage};
use tracing::{error, info};

pub const DEFAULT_LIST_LIMIT: u32 = 50;

pub const ITEM_SAVED_MESSAGE: &str = "Item saved successfully";
pub const ITEM_CLAIMED_MESSAGE: &str = "Item marked as claimed";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
pub const INVALID_TYPE_MESSAGE: &str = "Invalid item type";
pub const INVALID_ID_MESSAGE: &str = "Invalid item id";
pub const ITEM_NOT_FOUND_MESSAGE: &str = "Item not found";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save item";
pub const CLAIM_FAILED_MESSAGE: &str = "Failed to update item status";
pub const LIST_FAILED_MESSAGE: &str = "Failed to load items";

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub list_limit: u32,
}

impl ApiContext {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

pub async fn list_items(ctx: &ApiContext) -> Result<Vec<Item>, ApiError> {
    ctx.storage
        .list_recent_items(ctx.list_limit)
        .await
        .map_err(|err| internal(err, LIST_FAILED_MESSAGE))
}

/// Validates and stores a new report. Values are trimmed before the
/// required-field check, so whitespace-only input counts as missing.
pub async fn create_item(ctx: &ApiContext, form: &CreateItemForm) -> Result<Item, ApiError> {
    let title = trimmed(&form.title);
    let raw_type = trimmed(&form.item_type);
    let contact_name = trimmed(&form.contact_name);
    let contact_phone = trimmed(&form.contact_phone);

    let required = [&title, &raw_type, &contact_name, &contact_phone];
    if required.iter().any(|value| value.is_empty()) {
        return Err(ApiError::validation(MISSING_FIELDS_MESSAGE));
    }

    let item_type: ItemType = raw_type
        .parse()
        .map_err(|_| ApiError::validation(INVALID_TYPE_MESSAGE))?;

    let new_item = NewItem {
        title,
        description: trimmed(&form.description),
        item_type,
        location: trimmed(&form.location),
        contact_name,
        contact_phone,
    };

    let item = ctx
        .storage
        .insert_item(&new_item)
        .await
        .map_err(|err| internal(err, SAVE_FAILED_MESSAGE))?;
    info!(item_id = %item.id, item_type = %item.item_type, "item reported");
    Ok(item)
}

pub fn parse_item_id(raw: Option<&str>) -> Result<ItemId, ApiError> {
    raw.map(str::trim)
        .and_then(|value| value.parse::<i64>().ok())
        .map(ItemId)
        .ok_or_else(|| ApiError::validation(INVALID_ID_MESSAGE))
}

/// Claiming an already claimed item succeeds without touching it.
pub async fn claim_item(ctx: &ApiContext, item_id: ItemId) -> Result<ClaimUpdate, ApiError> {
    let update = ctx
        .storage
        .mark_item_claimed(item_id)
        .await
        .map_err(|err| internal(err, CLAIM_FAILED_MESSAGE))?;

    match update {
        ClaimUpdate::Missing => Err(ApiError::not_found(ITEM_NOT_FOUND_MESSAGE)),
        ClaimUpdate::Claimed => {
            info!(%item_id, "item claimed");
            Ok(update)
        }
        ClaimUpdate::AlreadyClaimed => {
            info!(%item_id, "item was already claimed");
            Ok(update)
        }
    }
}

fn trimmed(value: &Option<String>) -> String {
    value.as_deref().map(str::trim).unwrap_or_default().to_string()
}

fn internal(err: anyhow::Error, message: &str) -> ApiError {
    error!(error = %format!("{err:#}"), "{message}");
    ApiError::new(ErrorCode::Internal, message)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
