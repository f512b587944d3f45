use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Item, ItemId},
    protocol::{
        ClaimItemForm, CreateItemForm, MutationResponse, NewItemReport, PingResponse, CLAIM_ROUTE,
        ITEMS_ROUTE, PING_ROUTE,
    },
};
use url::Url;

use crate::error::TransportError;

/// Request/response contract with the lost & found service.
///
/// `Ok` means the service answered; whether it accepted the mutation is in
/// [`MutationResponse::success`].
#[async_trait]
pub trait PortalService: Send + Sync {
    async fn list_items(&self) -> Result<Vec<Item>, TransportError>;
    async fn create_item(&self, report: &NewItemReport)
        -> Result<MutationResponse, TransportError>;
    async fn claim_item(&self, item_id: ItemId) -> Result<MutationResponse, TransportError>;
    async fn ping(&self) -> Result<PingResponse, TransportError>;
}

pub struct HttpPortalService {
    http: Client,
    base_url: Url,
}

impl HttpPortalService {
    pub fn new(server_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = Url::parse(server_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url, TransportError> {
        Ok(self.base_url.join(route.trim_start_matches('/'))?)
    }
}

#[async_trait]
impl PortalService for HttpPortalService {
    async fn list_items(&self) -> Result<Vec<Item>, TransportError> {
        let items = self
            .http
            .get(self.endpoint(ITEMS_ROUTE)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(items)
    }

    async fn create_item(
        &self,
        report: &NewItemReport,
    ) -> Result<MutationResponse, TransportError> {
        // Non-2xx answers still carry a `success:false` body worth reading.
        let body = self
            .http
            .post(self.endpoint(ITEMS_ROUTE)?)
            .form(&CreateItemForm::from(report))
            .send()
            .await?
            .json()
            .await?;
        Ok(body)
    }

    async fn claim_item(&self, item_id: ItemId) -> Result<MutationResponse, TransportError> {
        let body = self
            .http
            .post(self.endpoint(CLAIM_ROUTE)?)
            .form(&ClaimItemForm::for_item(item_id))
            .send()
            .await?
            .json()
            .await?;
        Ok(body)
    }

    async fn ping(&self) -> Result<PingResponse, TransportError> {
        let body = self
            .http
            .get(self.endpoint(PING_ROUTE)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
