use std::sync::Arc;

use shared::{
    domain::{Item, ItemId, ParseEnumError},
    protocol::{MutationResponse, PingResponse},
};
use tracing::{info, warn};

pub mod error;
pub mod transport;
pub mod types;
pub mod view;

pub use error::{PortalError, TransportError};
pub use transport::{HttpPortalService, PortalService};
pub use types::{
    visible_items, FormField, ItemFilter, ListView, PortalState, ReportForm, SubmitStatus,
};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in Title, Contact Name and Contact Phone.";
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Item reported successfully.";
pub const SUBMIT_FALLBACK_MESSAGE: &str = "Failed to save item.";
pub const SUBMIT_TRANSPORT_MESSAGE: &str = "Error sending data. Check backend.";
pub const LIST_ERROR_MESSAGE: &str = "Could not load items. Check if backend is running.";
pub const CLAIM_CONFIRM_PROMPT: &str = "Mark this item as claimed?";
pub const CLAIM_FALLBACK_MESSAGE: &str = "Failed to update item.";
pub const CLAIM_TRANSPORT_MESSAGE: &str = "Error talking to backend.";

/// Yes/no gate consulted before a claim request is sent.
pub trait ClaimPrompt {
    fn confirm_claim(&self, item_id: ItemId) -> bool;
}

impl<F> ClaimPrompt for F
where
    F: Fn(ItemId) -> bool,
{
    fn confirm_claim(&self, item_id: ItemId) -> bool {
        self(item_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    Declined,
    /// The item is already claimed in the current list, so no claim action exists for it.
    NotOffered,
}

/// Owns the portal session: the report form, the last fetched list, the
/// active filter and the user-visible messages.
pub struct PortalController {
    service: Arc<dyn PortalService>,
    state: PortalState,
}

impl PortalController {
    pub fn new(service: Arc<dyn PortalService>) -> Self {
        Self {
            service,
            state: PortalState::default(),
        }
    }

    /// Starts a session and performs the initial list fetch. A failed fetch
    /// leaves the error in state instead of failing the session.
    pub async fn open(service: Arc<dyn PortalService>) -> Self {
        let mut controller = Self::new(service);
        let _ = controller.refresh().await;
        controller
    }

    pub fn state(&self) -> &PortalState {
        &self.state
    }

    pub fn update_field(&mut self, field: FormField, value: &str) -> Result<(), ParseEnumError> {
        self.state.form.set(field, value)
    }

    pub fn set_filter(&mut self, filter: ItemFilter) {
        self.state.filter = filter;
    }

    pub fn visible_items(&self) -> Vec<&Item> {
        visible_items(&self.state.items, self.state.filter)
    }

    pub fn list_view(&self) -> ListView<'_> {
        let items = self.visible_items();
        if items.is_empty() && self.state.list_error.is_none() {
            ListView::NoMatches
        } else {
            ListView::Items(items)
        }
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.state.alert.take()
    }

    pub async fn refresh(&mut self) -> Result<(), PortalError> {
        match self.service.list_items().await {
            Ok(items) => {
                self.state.items = items;
                self.state.list_error = None;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to load items");
                self.state.list_error = Some(LIST_ERROR_MESSAGE.to_string());
                Err(PortalError::Transport(err))
            }
        }
    }

    /// Sends the current form. Returns the created item when the service
    /// echoes it back.
    pub async fn submit(&mut self) -> Result<Option<Item>, PortalError> {
        self.state.submit = SubmitStatus::Idle;

        if self.state.form.missing_required() {
            self.state.submit = SubmitStatus::Failed(MISSING_FIELDS_MESSAGE.to_string());
            return Err(PortalError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
        }

        let report = self.state.form.to_report();
        let response = match self.service.create_item(&report).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "failed to send report");
                self.state.submit = SubmitStatus::Failed(SUBMIT_TRANSPORT_MESSAGE.to_string());
                return Err(PortalError::Transport(err));
            }
        };

        if !response.success {
            let message = failure_message(&response, SUBMIT_FALLBACK_MESSAGE);
            warn!(%message, "report rejected by service");
            self.state.submit = SubmitStatus::Failed(message.clone());
            return Err(PortalError::Application(message));
        }

        info!(title = %report.title, "item reported");
        self.state.form = ReportForm::default();
        self.state.submit = SubmitStatus::Succeeded(SUBMIT_SUCCESS_MESSAGE.to_string());
        let _ = self.refresh().await;
        Ok(response.item)
    }

    /// Claims an item after confirmation. The new status is only ever taken
    /// from a fresh list fetch.
    pub async fn claim(
        &mut self,
        item_id: ItemId,
        prompt: &dyn ClaimPrompt,
    ) -> Result<ClaimOutcome, PortalError> {
        let listed = self.state.items.iter().find(|item| item.id == item_id);
        if listed.is_some_and(|item| !item.is_claimable()) {
            return Ok(ClaimOutcome::NotOffered);
        }

        if !prompt.confirm_claim(item_id) {
            return Ok(ClaimOutcome::Declined);
        }

        let response = match self.service.claim_item(item_id).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%item_id, error = %err, "failed to send claim");
                self.state.alert = Some(CLAIM_TRANSPORT_MESSAGE.to_string());
                return Err(PortalError::Transport(err));
            }
        };

        if !response.success {
            let message = failure_message(&response, CLAIM_FALLBACK_MESSAGE);
            warn!(%item_id, %message, "claim rejected by service");
            self.state.alert = Some(message.clone());
            return Err(PortalError::Application(message));
        }

        info!(%item_id, "item claimed");
        let _ = self.refresh().await;
        Ok(ClaimOutcome::Claimed)
    }

    pub async fn ping(&self) -> Result<PingResponse, PortalError> {
        Ok(self.service.ping().await?)
    }
}

fn failure_message(response: &MutationResponse, fallback: &str) -> String {
    response
        .message
        .as_deref()
        .filter(|message| !message.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
