use std::str::FromStr;

use shared::{
    domain::{Item, ItemType, ParseEnumError},
    protocol::NewItemReport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Type,
    Location,
    ContactName,
    ContactPhone,
}

impl FromStr for FormField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(FormField::Title),
            "description" => Ok(FormField::Description),
            "type" => Ok(FormField::Type),
            "location" => Ok(FormField::Location),
            "contactName" => Ok(FormField::ContactName),
            "contactPhone" => Ok(FormField::ContactPhone),
            other => Err(ParseEnumError {
                kind: "form field",
                value: other.to_string(),
            }),
        }
    }
}

/// Pending report being edited. `Default` is the blank form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportForm {
    pub title: String,
    pub description: String,
    pub item_type: ItemType,
    pub location: String,
    pub contact_name: String,
    pub contact_phone: String,
}

impl ReportForm {
    /// Stores `value` as typed. Only the `type` field can reject a value.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), ParseEnumError> {
        match field {
            FormField::Title => self.title = value.to_string(),
            FormField::Description => self.description = value.to_string(),
            FormField::Type => self.item_type = value.parse()?,
            FormField::Location => self.location = value.to_string(),
            FormField::ContactName => self.contact_name = value.to_string(),
            FormField::ContactPhone => self.contact_phone = value.to_string(),
        }
        Ok(())
    }

    /// Empty-string check only; whitespace counts as filled in.
    pub fn missing_required(&self) -> bool {
        self.title.is_empty() || self.contact_name.is_empty() || self.contact_phone.is_empty()
    }

    pub fn to_report(&self) -> NewItemReport {
        NewItemReport {
            title: self.title.clone(),
            description: self.description.clone(),
            item_type: self.item_type,
            location: self.location.clone(),
            contact_name: self.contact_name.clone(),
            contact_phone: self.contact_phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    Lost,
    Found,
}

impl ItemFilter {
    pub fn matches(self, item: &Item) -> bool {
        match self {
            ItemFilter::All => true,
            ItemFilter::Lost => item.item_type == ItemType::Lost,
            ItemFilter::Found => item.item_type == ItemType::Found,
        }
    }
}

impl FromStr for ItemFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(ItemFilter::All);
        }
        match s.parse::<ItemType>() {
            Ok(ItemType::Lost) => Ok(ItemFilter::Lost),
            Ok(ItemType::Found) => Ok(ItemFilter::Found),
            Err(_) => Err(ParseEnumError {
                kind: "item filter",
                value: s.to_string(),
            }),
        }
    }
}

/// Outcome of the latest submit attempt. At most one message is ever shown.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Succeeded(String),
    Failed(String),
}

impl SubmitStatus {
    pub fn success_message(&self) -> Option<&str> {
        match self {
            SubmitStatus::Succeeded(message) => Some(message),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SubmitStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PortalState {
    pub form: ReportForm,
    pub items: Vec<Item>,
    pub filter: ItemFilter,
    pub submit: SubmitStatus,
    pub list_error: Option<String>,
    pub alert: Option<String>,
}

pub fn visible_items(items: &[Item], filter: ItemFilter) -> Vec<&Item> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView<'a> {
    NoMatches,
    Items(Vec<&'a Item>),
}
