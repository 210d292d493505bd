use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::{
    map_categories, map_playlist_tracks, map_search, map_track_details, BrowseCategory, MusicApi,
    Track, TrackDetails,
};
use crate::error::ApiResult;
use crate::filter::{filter_items, with_all, ALL_CATEGORY};
use crate::ticket::Tickets;

/// Search term used when the user has not typed anything.
pub const DEFAULT_MUSIC_QUERY: &str = "top hits";
pub const NO_TRACKS_FOUND: &str = "No tracks found.";
const CATEGORY_LIMIT: u32 = 50;
const PLAYLIST_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MusicState {
    pub tracks: Vec<Track>,
    pub is_loading: bool,
    pub error: String,
    pub categories: Vec<String>,
    pub selected_category: String,
    /// Local title filter; never sent to Spotify.
    pub query: String,
    pub details: Option<TrackDetails>,
    pub details_id: Option<String>,
    pub details_loading: bool,
}

impl Default for MusicState {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            is_loading: false,
            error: String::new(),
            categories: vec![ALL_CATEGORY.to_string()],
            selected_category: ALL_CATEGORY.to_string(),
            query: String::new(),
            details: None,
            details_id: None,
            details_loading: false,
        }
    }
}

#[derive(Debug, Default)]
struct Catalogue {
    /// What the visible list is filtered from: search results or a category's tracks.
    tracks: Vec<Track>,
    search_results: Vec<Track>,
    categories: Vec<BrowseCategory>,
    last_fetch: String,
    /// Browse category failure; shown until the categories load.
    reference_error: Option<String>,
    /// Message of the last failed detail load, cleared by the next one.
    detail_error: Option<String>,
}

/// State holder for the music tab.
///
/// Text search filters locally. Picking a browse category loads that category's
/// playlist tracks from Spotify; picking "All" goes back to the search results.
pub struct MusicStore {
    api: Arc<dyn MusicApi>,
    page_size: u32,
    state: watch::Sender<MusicState>,
    catalogue: Mutex<Catalogue>,
    list_tickets: Tickets,
    detail_tickets: Tickets,
}

impl MusicStore {
    pub fn new(api: Arc<dyn MusicApi>, page_size: u32) -> Self {
        let (state, _) = watch::channel(MusicState::default());
        Self {
            api,
            page_size,
            state,
            catalogue: Mutex::new(Catalogue::default()),
            list_tickets: Tickets::default(),
            detail_tickets: Tickets::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<MusicState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MusicState {
        self.state.borrow().clone()
    }

    pub async fn load_categories(&self) {
        match self.api.browse_categories(CATEGORY_LIMIT).await {
            Ok(response) => {
                let categories = map_categories(response);
                info!(count = categories.len(), "Loaded Spotify browse categories");
                let names = with_all(categories.iter().map(|c| c.name.clone()));
                let resolved = {
                    let mut catalogue = self.catalogue.lock().await;
                    catalogue.categories = categories;
                    catalogue.reference_error.take()
                };
                self.state.send_modify(|s| {
                    if resolved.as_deref() == Some(s.error.as_str()) {
                        s.error.clear();
                    }
                    s.categories = names;
                });
            }
            Err(e) => {
                warn!("Browse categories fetch failed: {}", e);
                let message = e.to_string();
                self.catalogue.lock().await.reference_error = Some(message.clone());
                self.state.send_modify(|s| s.error = message);
            }
        }
    }

    /// Replace the catalogue with Spotify's track search for `query`.
    pub async fn fetch(&self, query: &str) {
        let query = query.trim().to_string();
        let term = if query.is_empty() {
            DEFAULT_MUSIC_QUERY.to_string()
        } else {
            query.clone()
        };
        let ticket = self.list_tickets.issue();
        let reference_error = {
            let mut catalogue = self.catalogue.lock().await;
            catalogue.last_fetch = query;
            catalogue.reference_error.clone()
        };
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = reference_error.unwrap_or_default();
        });

        let result = self.api.search_tracks(&term, self.page_size).await;

        let mut catalogue = self.catalogue.lock().await;
        if !self.list_tickets.is_current(ticket) {
            debug!(query = %term, "Dropping superseded track search");
            return;
        }

        match result {
            Ok(response) => {
                let tracks = map_search(response);
                let count = tracks.len();
                info!(query = %term, count, "Fetched tracks");
                catalogue.search_results = tracks.clone();
                catalogue.tracks = tracks;
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    // Search results carry no category tags.
                    s.selected_category = ALL_CATEGORY.to_string();
                    s.tracks = filter_items(&catalogue.tracks, ALL_CATEGORY, &s.query);
                    if count == 0 {
                        s.error = NO_TRACKS_FOUND.to_string();
                    }
                });
            }
            Err(e) => {
                warn!(query = %term, "Track search failed: {}", e);
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = e.to_string();
                });
            }
        }
    }

    pub async fn refresh(&self) {
        let selected = self.state.borrow().selected_category.clone();
        if selected != ALL_CATEGORY {
            self.select_category(&selected).await;
            return;
        }
        let query = self.catalogue.lock().await.last_fetch.clone();
        self.fetch(&query).await;
    }

    pub async fn retry(&self) {
        self.refresh().await;
    }

    /// Title filter over the current catalogue. Never hits the network.
    pub async fn search(&self, query: &str) {
        let catalogue = self.catalogue.lock().await;
        self.state.send_modify(|s| {
            s.query = query.to_string();
            s.tracks = filter_items(&catalogue.tracks, &s.selected_category, query);
        });
    }

    pub async fn select_category(&self, name: &str) {
        let category = {
            let mut catalogue = self.catalogue.lock().await;
            if name == ALL_CATEGORY {
                catalogue.tracks = catalogue.search_results.clone();
            }
            let found = catalogue.categories.iter().find(|c| c.name == name).cloned();
            if found.is_none() {
                // Supersedes any category load still in flight.
                self.list_tickets.issue();
                self.state.send_modify(|s| {
                    s.selected_category = name.to_string();
                    s.is_loading = false;
                    s.tracks = filter_items(&catalogue.tracks, name, &s.query);
                });
                return;
            }
            found
        };
        if let Some(category) = category {
            self.fetch_category(category).await;
        }
    }

    async fn fetch_category(&self, category: BrowseCategory) {
        let ticket = self.list_tickets.issue();
        let reference_error = self.catalogue.lock().await.reference_error.clone();
        self.state.send_modify(|s| {
            s.selected_category = category.name.clone();
            s.is_loading = true;
            s.error = reference_error.unwrap_or_default();
        });

        let result = self.category_tracks(&category).await;

        let mut catalogue = self.catalogue.lock().await;
        if !self.list_tickets.is_current(ticket) {
            debug!(category = %category.id, "Dropping superseded category tracks");
            return;
        }

        match result {
            Ok(tracks) => {
                let count = tracks.len();
                info!(category = %category.id, count, "Fetched category tracks");
                catalogue.tracks = tracks;
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.tracks = filter_items(&catalogue.tracks, &category.name, &s.query);
                    if count == 0 {
                        s.error = NO_TRACKS_FOUND.to_string();
                    }
                });
            }
            Err(e) => {
                warn!(category = %category.id, "Category tracks fetch failed: {}", e);
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = e.to_string();
                });
            }
        }
    }

    // Tracks of the category's first usable playlist.
    async fn category_tracks(&self, category: &BrowseCategory) -> ApiResult<Vec<Track>> {
        let playlists = self
            .api
            .category_playlists(&category.id, PLAYLIST_LIMIT)
            .await?
            .playlists
            .unwrap_or_default()
            .into_items();
        let Some(playlist) = playlists.into_iter().next() else {
            return Ok(Vec::new());
        };
        debug!(category = %category.id, playlist = %playlist.id, "Loading playlist tracks");
        let page = self.api.playlist_tracks(&playlist.id, self.page_size).await?;
        Ok(map_playlist_tracks(page, &category.name))
    }

    /// Load the detail record for `id`. Only the most recent request is applied.
    pub async fn fetch_details(&self, id: &str) {
        let ticket = self.detail_tickets.issue();
        let previous_failure = self.catalogue.lock().await.detail_error.take();
        self.state.send_modify(|s| {
            if s.details_id.as_deref() != Some(id) {
                s.details = None;
            }
            s.details_id = Some(id.to_string());
            s.details_loading = true;
            if previous_failure.as_deref() == Some(s.error.as_str()) {
                s.error.clear();
            }
        });

        let result = self.api.track(id).await;
        if !self.detail_tickets.is_current(ticket) {
            debug!(id, "Dropping superseded track details");
            return;
        }

        match result {
            Ok(track) => {
                let details = map_track_details(track, id);
                info!(id, title = %details.title, "Fetched track details");
                self.state.send_modify(|s| {
                    s.details = Some(details);
                    s.details_loading = false;
                });
            }
            Err(e) => {
                warn!(id, "Track details fetch failed: {}", e);
                let message = e.to_string();
                self.catalogue.lock().await.detail_error = Some(message.clone());
                self.state.send_modify(|s| {
                    s.details_loading = false;
                    s.error = message;
                });
            }
        }
    }

    pub fn clear_details(&self) {
        self.detail_tickets.issue();
        self.state.send_modify(|s| {
            s.details = None;
            s.details_id = None;
            s.details_loading = false;
        });
    }

    /// Flip the client-side favorite flag. Lost on the next fetch.
    pub async fn toggle_favorite(&self, id: &str) {
        let mut catalogue = self.catalogue.lock().await;
        let Catalogue {
            tracks,
            search_results,
            ..
        } = &mut *catalogue;
        for track in tracks
            .iter_mut()
            .chain(search_results.iter_mut())
            .filter(|t| t.id == id)
        {
            track.favorite = !track.favorite;
        }
        self.state.send_modify(|s| {
            for track in s.tracks.iter_mut().filter(|t| t.id == id) {
                track.favorite = !track.favorite;
            }
        });
    }
}
