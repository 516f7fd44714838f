//! Draft persistence boundary and its REST implementation.
//!
//! | Operation    | Request                                              |
//! |--------------|------------------------------------------------------|
//! | create draft | `POST /organizations/{org}/hackathons/drafts`        |
//! | update draft | `PUT  /organizations/{org}/hackathons/drafts/{id}`   |
//! | fetch draft  | `GET  /organizations/{org}/hackathons/drafts/{id}`   |
//! | publish      | `POST /organizations/{org}/hackathons`               |
//!
//! Every response is wrapped in an [`ApiEnvelope`]. Requests are never
//! retried here; a failed call is reported to the caller, who decides.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::{Result, WizardError};
use crate::hackathon::{ApiEnvelope, DraftRecord, Hackathon, HackathonData, PublishPayload};

/// The four backend operations the wizard depends on.
#[async_trait]
pub trait DraftService: Send + Sync {
    /// Persist a new draft and return it with its assigned id.
    async fn create_draft(
        &self,
        organization_id: &str,
        sections: &HackathonData,
    ) -> Result<DraftRecord>;

    /// Overwrite the given sections of an existing draft.
    async fn update_draft(
        &self,
        organization_id: &str,
        draft_id: &str,
        sections: &HackathonData,
    ) -> Result<DraftRecord>;

    async fn fetch_draft(&self, organization_id: &str, draft_id: &str) -> Result<DraftRecord>;

    /// Turn a complete payload into a live hackathon.
    async fn publish(&self, organization_id: &str, payload: &PublishPayload) -> Result<Hackathon>;
}

/// [`DraftService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpDraftService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpDraftService {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, token))
    }

    /// Reuse an existing [`reqwest::Client`].
    pub fn with_client(client: Client, base_url: &str, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn drafts_url(&self, organization_id: &str) -> String {
        format!(
            "{}/organizations/{organization_id}/hackathons/drafts",
            self.base_url
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.authorize(request).send().await?;
        parse_envelope(response).await
    }
}

#[async_trait]
impl DraftService for HttpDraftService {
    async fn create_draft(
        &self,
        organization_id: &str,
        sections: &HackathonData,
    ) -> Result<DraftRecord> {
        let url = self.drafts_url(organization_id);
        debug!("POST {url}");
        self.send(self.client.post(url).json(sections)).await
    }

    async fn update_draft(
        &self,
        organization_id: &str,
        draft_id: &str,
        sections: &HackathonData,
    ) -> Result<DraftRecord> {
        let url = format!("{}/{draft_id}", self.drafts_url(organization_id));
        debug!("PUT {url}");
        self.send(self.client.put(url).json(sections)).await
    }

    async fn fetch_draft(&self, organization_id: &str, draft_id: &str) -> Result<DraftRecord> {
        let url = format!("{}/{draft_id}", self.drafts_url(organization_id));
        debug!("GET {url}");
        self.send(self.client.get(url)).await
    }

    async fn publish(&self, organization_id: &str, payload: &PublishPayload) -> Result<Hackathon> {
        let url = format!(
            "{}/organizations/{organization_id}/hackathons",
            self.base_url
        );
        debug!("POST {url}");
        self.send(self.client.post(url).json(payload)).await
    }
}

/// Unwrap an [`ApiEnvelope`], turning HTTP and envelope-level failures into
/// [`WizardError::Api`].
async fn parse_envelope<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.text().await?;

    let envelope: Option<ApiEnvelope<T>> = serde_json::from_str(&body).ok();

    if !status.is_success() {
        let message = envelope
            .and_then(|e| e.message)
            .unwrap_or_else(|| body.trim().to_string());
        warn!("API request failed ({status}): {message}");
        return Err(WizardError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope = match envelope {
        Some(e) => e,
        // Surface the real decode error for a 2xx body we could not read.
        None => serde_json::from_str::<ApiEnvelope<T>>(&body)?,
    };

    match (envelope.success, envelope.data) {
        (true, Some(data)) => Ok(data),
        (_, _) => Err(WizardError::Api {
            status: status.as_u16(),
            message: envelope
                .message
                .unwrap_or_else(|| "Request was not successful".to_string()),
        }),
    }
}
