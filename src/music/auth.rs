//! Spotify client-credentials token exchange.
//!
//! The token is cached with its expiry and exchanged again shortly before it
//! runs out, or right after the API rejects it.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::SpotifyConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::send_json;

const SERVICE: &str = "Spotify accounts";
/// Tokens this close to expiry are treated as expired.
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: Option<String>,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(TOKEN_REFRESH_MARGIN_SECS) < self.expires_at
    }
}

pub struct SpotifyAuth {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<AccessToken>>,
}

impl SpotifyAuth {
    pub fn new(client: Client, config: &SpotifyConfig) -> Self {
        Self {
            client,
            token_url: format!("{}/api/token", config.accounts_base_url),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: RwLock::new(None),
        }
    }

    /// A bearer token valid for at least the refresh margin.
    pub async fn bearer(&self) -> ApiResult<String> {
        if let Some(token) = self.cached.read().await.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.exchange().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    pub async fn invalidate(&self) {
        if self.cached.write().await.take().is_some() {
            debug!("Dropped cached Spotify token");
        }
    }

    async fn exchange(&self) -> ApiResult<AccessToken> {
        debug!(url = %self.token_url, "Requesting Spotify client-credentials token");
        let request = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let response: TokenResponse = send_json(SERVICE, request).await.map_err(|e| {
            warn!("Spotify token exchange failed: {}", e);
            ApiError::Auth(e.to_string())
        })?;

        let expires_at = Utc::now() + Duration::seconds(response.expires_in.max(0));
        info!(expires_at = %expires_at, "Obtained Spotify access token");
        Ok(AccessToken {
            value: response.access_token,
            expires_at,
        })
    }
}
