use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::{upstream_message, ApiError, ApiResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn build_client(timeout: Duration) -> Result<Client> {
    let user_agent = format!("inspiculture/{}", env!("CARGO_PKG_VERSION"));
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// Send `request` and decode a 2xx JSON body into `T`.
pub async fn send_json<T: DeserializeOwned>(
    service: &'static str,
    request: RequestBuilder,
) -> ApiResult<T> {
    let res = request.send().await?;
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        debug!(service, status = status.as_u16(), "upstream rejected request");
        return Err(ApiError::Status {
            service,
            status: status.as_u16(),
            message: upstream_message(&text),
        });
    }
    serde_json::from_str(&text).map_err(|source| ApiError::Decode { service, source })
}

/// Strip credential query parameters before a URL goes into a log line.
pub fn redact(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let params = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((k, _)) if k == "api_key" || k == "key" => format!("{k}=***"),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{params}")
}
