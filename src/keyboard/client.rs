//! Async HTTP client for the keybind endpoint

use reqwest::Client;
use std::time::Duration;

use crate::core::error::{DotfolioError, Result};
use crate::keyboard::keybind::{parse_keybinds, Keybind, Platform};
use crate::keyboard::visualizer::FetchTicket;

/// Client for `GET {base_url}/api/keybinds/{platform}`
#[derive(Debug, Clone)]
pub struct KeybindClient {
    client: Client,
    base_url: String,
}

impl KeybindClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, platform: Platform) -> String {
        format!("{}{}", self.base_url, platform.endpoint_path())
    }

    /// Fetch and validate the keybind list for `platform`
    pub async fn fetch(&self, platform: Platform) -> Result<Vec<Keybind>> {
        let url = self.endpoint(platform);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DotfolioError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        parse_keybinds(&body)
    }

    /// Fetch on behalf of a visualizer ticket, handing the ticket back
    pub async fn fetch_ticket(&self, ticket: FetchTicket) -> (FetchTicket, Result<Vec<Keybind>>) {
        let result = self.fetch(ticket.platform).await;
        (ticket, result)
    }
}
