use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiResult;
use crate::filter::Catalogued;

mod auth;
mod client;
mod map;
mod store;

pub use auth::{SpotifyAuth, TOKEN_REFRESH_MARGIN_SECS};
pub use client::{
    AlbumDto, ArtistDto, CategoriesResponse, CategoryDto, CategoryPlaylistsResponse,
    ExternalUrls, ImageDto, Paging, PlaylistDto, PlaylistTrackItem, SearchResponse,
    SpotifyClient, TrackDto,
};
pub use map::{map_categories, map_playlist_tracks, map_search, map_track, map_track_details};
pub use store::{MusicState, MusicStore, DEFAULT_MUSIC_QUERY, NO_TRACKS_FOUND};

#[async_trait]
pub trait MusicApi: Send + Sync {
    async fn search_tracks(&self, query: &str, limit: u32) -> ApiResult<SearchResponse>;
    async fn browse_categories(&self, limit: u32) -> ApiResult<CategoriesResponse>;
    async fn category_playlists(
        &self,
        category_id: &str,
        limit: u32,
    ) -> ApiResult<CategoryPlaylistsResponse>;
    async fn playlist_tracks(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> ApiResult<Paging<PlaylistTrackItem>>;
    async fn track(&self, id: &str) -> ApiResult<TrackDto>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub artwork_url: Option<String>,
    pub preview_url: Option<String>,
    pub duration_ms: Option<u32>,
    /// Browse category the track was loaded through, if any.
    pub tags: Vec<String>,
    pub favorite: bool,
}

impl Catalogued for Track {
    fn title(&self) -> &str {
        &self.title
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseCategory {
    pub id: String,
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackDetails {
    pub id: String,
    pub title: String,
    pub artists: Vec<ArtistRef>,
    pub album: Option<AlbumRef>,
    pub duration_ms: Option<u32>,
    pub popularity: Option<u32>,
    pub explicit: bool,
    pub preview_url: Option<String>,
    pub external_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlbumRef {
    pub id: Option<String>,
    pub name: Option<String>,
    pub release_date: Option<String>,
    pub artwork_url: Option<String>,
}
