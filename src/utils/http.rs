//! HTTP client utilities.

use std::time::Duration;

use reqwest::blocking::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Create a configured blocking HTTP client.
pub fn create_client(config: &ApiConfig) -> Result<Client> {
    Ok(Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// GET `url` and return the body text of a 2xx response.
///
/// Network failures and non-2xx statuses both surface as
/// [`AppError::Transport`] carrying the request URL.
pub fn fetch_text(client: &Client, url: &Url) -> Result<String> {
    let response = client
        .get(url.clone())
        .send()
        .map_err(|e| AppError::transport(url.as_str(), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AppError::transport(url.as_str(), format!("status {status}")));
    }

    response
        .text()
        .map_err(|e| AppError::transport(url.as_str(), e))
}
