use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::auth::SpotifyAuth;
use super::MusicApi;
use crate::config::SpotifyConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::send_json;

const SERVICE: &str = "Spotify";

pub struct SpotifyClient {
    client: Client,
    api_base_url: String,
    auth: SpotifyAuth,
}

/// Spotify's paging object. Playlist listings can contain `null` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Option<Vec<Option<T>>>,
    pub total: Option<u32>,
    pub next: Option<String>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self {
            items: None,
            total: None,
            next: None,
        }
    }
}

impl<T> Paging<T> {
    pub fn from_items(items: Vec<T>) -> Self {
        Self {
            total: Some(items.len() as u32),
            items: Some(items.into_iter().map(Some).collect()),
            next: None,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.items.unwrap_or_default().into_iter().flatten().collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Paging<TrackDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    pub categories: Option<Paging<CategoryDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryPlaylistsResponse {
    pub playlists: Option<Paging<PlaylistDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryDto {
    pub id: String,
    pub name: String,
    pub icons: Option<Vec<ImageDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistDto {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<ImageDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlaylistTrackItem {
    pub track: Option<TrackDto>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackDto {
    /// `None` for local files added to a playlist.
    pub id: Option<String>,
    pub name: Option<String>,
    pub artists: Option<Vec<ArtistDto>>,
    pub album: Option<AlbumDto>,
    pub duration_ms: Option<u32>,
    pub popularity: Option<u32>,
    pub explicit: Option<bool>,
    pub preview_url: Option<String>,
    pub external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistDto {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumDto {
    pub id: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub images: Option<Vec<ImageDto>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageDto {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

impl SpotifyClient {
    pub fn new(client: Client, config: &SpotifyConfig) -> Self {
        Self {
            auth: SpotifyAuth::new(client.clone(), config),
            client,
            api_base_url: config.api_base_url.clone(),
        }
    }

    /// Exchange credentials now instead of on the first API call.
    pub async fn authenticate(&self) -> ApiResult<()> {
        self.auth.bearer().await.map(|_| ())
    }

    fn url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut url = format!("{}/v1/{}", self.api_base_url, path.trim_start_matches('/'));
        for (i, (key, value)) in params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> ApiResult<T> {
        let token = self.auth.bearer().await?;
        debug!(url = %url, "Spotify request");
        let result = send_json(SERVICE, self.client.get(url).bearer_auth(token)).await;
        if let Err(ApiError::Status { status: 401, .. }) = &result {
            self.auth.invalidate().await;
        }
        result
    }
}

#[async_trait]
impl MusicApi for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> ApiResult<SearchResponse> {
        let limit = limit.to_string();
        let url = self.url(
            "search",
            &[("q", query), ("type", "track"), ("limit", limit.as_str())],
        );
        self.get_json(&url).await
    }

    async fn browse_categories(&self, limit: u32) -> ApiResult<CategoriesResponse> {
        let limit = limit.to_string();
        let url = self.url("browse/categories", &[("limit", limit.as_str())]);
        self.get_json(&url).await
    }

    async fn category_playlists(
        &self,
        category_id: &str,
        limit: u32,
    ) -> ApiResult<CategoryPlaylistsResponse> {
        let limit = limit.to_string();
        let path = format!("browse/categories/{}/playlists", urlencoding::encode(category_id));
        let url = self.url(&path, &[("limit", limit.as_str())]);
        self.get_json(&url).await
    }

    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> ApiResult<Paging<PlaylistTrackItem>> {
        let limit = limit.to_string();
        let path = format!("playlists/{}/tracks", urlencoding::encode(playlist_id));
        let url = self.url(&path, &[("limit", limit.as_str())]);
        self.get_json(&url).await
    }

    async fn track(&self, id: &str) -> ApiResult<TrackDto> {
        let path = format!("tracks/{}", urlencoding::encode(id));
        let url = self.url(&path, &[]);
        self.get_json(&url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> SpotifyClient {
        SpotifyClient::new(
            Client::new(),
            &SpotifyConfig {
                api_base_url: "https://api.test".to_string(),
                accounts_base_url: "https://accounts.test".to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                page_size: 20,
            },
        )
    }

    #[test]
    fn urls_encode_parameters() {
        assert_eq!(
            client().url("search", &[("q", "daft punk"), ("type", "track")]),
            "https://api.test/v1/search?q=daft%20punk&type=track"
        );
        assert_eq!(client().url("/tracks/abc", &[]), "https://api.test/v1/tracks/abc");
    }

    #[test]
    fn paging_skips_null_entries() {
        let paging: Paging<PlaylistDto> = serde_json::from_value(json!({
            "items": [null, { "id": "p1", "name": "Hot Hits" }, null],
            "total": 3
        }))
        .expect("paging deserialize");
        let items = paging.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, "p1");
    }

    #[test]
    fn local_track_has_no_id() {
        let item: PlaylistTrackItem = serde_json::from_value(json!({
            "track": { "id": null, "name": "demo.mp3", "artists": [] }
        }))
        .expect("item deserialize");
        assert!(item.track.and_then(|t| t.id).is_none());
    }
}
