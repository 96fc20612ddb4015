use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::Client;

use super::models::{TicketRequest, TicketResponse};

/// The helpdesk authenticates with the API key as the basic-auth user; the
/// password is ignored but must be present.
const BASIC_AUTH_PASSWORD: &str = "dummy";

pub struct FreshserviceClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl FreshserviceClient {
    pub fn new(host: String, api_key: String, timeout_secs: u64, connect_timeout: u64) -> Self {
        // Config carries a bare domain; tests hand in a full URL.
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("https://{}", host.trim_end_matches('/'))
        };

        Self {
            base_url,
            api_key,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .connect_timeout(std::time::Duration::from_secs(connect_timeout))
                .build()
                .expect("Failed to build helpdesk HTTP client"),
        }
    }

    /// Files the ticket and returns its display id, or None when the
    /// helpdesk did not confirm creation.
    pub async fn create_ticket(&self, ticket: &TicketRequest) -> Result<Option<u64>> {
        let url = format!("{}/helpdesk/tickets.json", self.base_url);

        info!("Sending new ticket request to the helpdesk");
        let res = self
            .client
            .post(&url)
            .basic_auth(&self.api_key, Some(BASIC_AUTH_PASSWORD))
            .json(&serde_json::json!({ "helpdesk_ticket": ticket }))
            .send()
            .await
            .context("Failed to send ticket request")?;

        info!("Helpdesk responded with {}", res.status());

        let body: TicketResponse = res.json().await.context("Failed to parse ticket response")?;
        if !body.status {
            return Ok(None);
        }

        match body.item {
            Some(item) => Ok(Some(item.helpdesk_ticket.display_id)),
            None => {
                warn!("Helpdesk reported success without a ticket body");
                Ok(None)
            }
        }
    }

    pub fn ticket_url(&self, display_id: u64) -> String {
        format!("{}/helpdesk/tickets/{}", self.base_url, display_id)
    }
}
