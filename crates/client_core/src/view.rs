//! Plain-text rendering of the portal list for terminal front-ends.

use shared::domain::{Item, ItemType};

use crate::{ListView, PortalController};

pub const NO_MATCHES_MESSAGE: &str = "No items match this filter.";
pub const LIST_HEADER: &str = "Showing the most recently reported items.";

pub fn type_banner(item_type: ItemType) -> &'static str {
    match item_type {
        ItemType::Lost => "LOST ITEM",
        ItemType::Found => "FOUND ITEM",
    }
}

pub fn render_item_card(item: &Item) -> String {
    let mut lines = vec![
        format!("#{} {}", item.id, type_banner(item.item_type)),
        format!("Status: {}", item.status),
        item.title.clone(),
    ];
    if !item.description.is_empty() {
        lines.push(item.description.clone());
    }
    lines.push(format!("Location: {}", item.location));
    lines.push(format!("Contact: {}", item.contact_name));
    lines.push(format!("Phone: {}", item.contact_phone));
    lines.push(format!(
        "Reported: {}",
        item.date_reported.format("%Y-%m-%d %H:%M UTC")
    ));
    if item.is_claimable() {
        lines.push(format!("[claim with: claim {}]", item.id));
    }
    lines.join("\n")
}

/// Header, list-level error (if any), then either the cards or the
/// no-matches notice.
pub fn render_list(controller: &PortalController) -> String {
    let mut sections = vec![LIST_HEADER.to_string()];
    if let Some(error) = &controller.state().list_error {
        sections.push(error.clone());
    }
    match controller.list_view() {
        ListView::NoMatches => sections.push(NO_MATCHES_MESSAGE.to_string()),
        ListView::Items(items) => sections.extend(items.into_iter().map(render_item_card)),
    }
    sections.join("\n\n")
}
