use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use super::{Genre, Show, ShowDetails, ShowMapper, ShowsApi};
use crate::filter::{filter_items, with_all, ALL_CATEGORY};
use crate::ticket::Tickets;

pub const NO_SHOWS_FOUND: &str = "No shows found.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowsState {
    pub shows: Vec<Show>,
    pub is_loading: bool,
    pub error: String,
    pub categories: Vec<String>,
    pub selected_category: String,
    /// Local title filter; never sent to TMDb.
    pub query: String,
    pub details: Option<ShowDetails>,
    pub details_id: Option<i64>,
    pub details_loading: bool,
}

impl Default for ShowsState {
    fn default() -> Self {
        Self {
            shows: Vec::new(),
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
    shows: Vec<Show>,
    genres: Vec<Genre>,
    last_fetch: String,
    /// Genre list failure; shown until the genres load.
    reference_error: Option<String>,
    /// Message of the last failed detail load, cleared by the next one.
    detail_error: Option<String>,
}

/// State holder for the shows tab.
///
/// Genres are reference data loaded once. `search` and `select_category` only
/// filter what the last `fetch` returned.
pub struct ShowsStore {
    api: Arc<dyn ShowsApi>,
    mapper: ShowMapper,
    state: watch::Sender<ShowsState>,
    catalogue: Mutex<Catalogue>,
    list_tickets: Tickets,
    detail_tickets: Tickets,
}

impl ShowsStore {
    pub fn new(api: Arc<dyn ShowsApi>, mapper: ShowMapper) -> Self {
        let (state, _) = watch::channel(ShowsState::default());
        Self {
            api,
            mapper,
            state,
            catalogue: Mutex::new(Catalogue::default()),
            list_tickets: Tickets::default(),
            detail_tickets: Tickets::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ShowsState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ShowsState {
        self.state.borrow().clone()
    }

    pub async fn load_categories(&self) {
        match self.api.movie_genres().await {
            Ok(list) => {
                let genres = list.genres.unwrap_or_default();
                info!(count = genres.len(), "Loaded TMDb genres");
                let mut catalogue = self.catalogue.lock().await;
                self.mapper.rename_genres(&mut catalogue.shows, &genres);
                let categories = with_all(genres.iter().map(|g| g.name.clone()));
                catalogue.genres = genres;
                let resolved = catalogue.reference_error.take();
                self.state.send_modify(|s| {
                    if resolved.as_deref() == Some(s.error.as_str()) {
                        s.error.clear();
                    }
                    s.categories = categories;
                    s.shows = filter_items(&catalogue.shows, &s.selected_category, &s.query);
                });
            }
            Err(e) => {
                warn!("Genre fetch failed: {}", e);
                let message = e.to_string();
                self.catalogue.lock().await.reference_error = Some(message.clone());
                self.state.send_modify(|s| s.error = message);
            }
        }
    }

    /// Replace the catalogue: popular titles for an empty query, TMDb search otherwise.
    pub async fn fetch(&self, query: &str) {
        let query = query.trim().to_string();
        let ticket = self.list_tickets.issue();
        let reference_error = {
            let mut catalogue = self.catalogue.lock().await;
            catalogue.last_fetch = query.clone();
            catalogue.reference_error.clone()
        };
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = reference_error.unwrap_or_default();
        });

        let result = if query.is_empty() {
            self.api.popular_movies(1).await
        } else {
            self.api.search_movies(&query, 1).await
        };

        let mut catalogue = self.catalogue.lock().await;
        if !self.list_tickets.is_current(ticket) {
            debug!(query = %query, "Dropping superseded shows response");
            return;
        }

        match result {
            Ok(page) => {
                let shows = self.mapper.shows(page, &catalogue.genres);
                let count = shows.len();
                info!(query = %query, count, "Fetched shows");
                catalogue.shows = shows;
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.shows = filter_items(&catalogue.shows, &s.selected_category, &s.query);
                    if count == 0 {
                        s.error = NO_SHOWS_FOUND.to_string();
                    }
                });
            }
            Err(e) => {
                warn!(query = %query, "Shows fetch failed: {}", e);
                self.state.send_modify(|s| {
                    s.is_loading = false;
                    s.error = e.to_string();
                });
            }
        }
    }

    pub async fn refresh(&self) {
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
            s.shows = filter_items(&catalogue.shows, &s.selected_category, query);
        });
    }

    pub async fn select_category(&self, category: &str) {
        let catalogue = self.catalogue.lock().await;
        self.state.send_modify(|s| {
            s.selected_category = category.to_string();
            s.shows = filter_items(&catalogue.shows, category, &s.query);
        });
    }

    /// Load the detail record for `id`. Only the most recent request is applied.
    pub async fn fetch_details(&self, id: i64) {
        let ticket = self.detail_tickets.issue();
        let previous_failure = self.catalogue.lock().await.detail_error.take();
        self.state.send_modify(|s| {
            if s.details_id != Some(id) {
                s.details = None;
            }
            s.details_id = Some(id);
            s.details_loading = true;
            if previous_failure.as_deref() == Some(s.error.as_str()) {
                s.error.clear();
            }
        });

        let result = self.api.movie_details(id).await;
        if !self.detail_tickets.is_current(ticket) {
            debug!(id, "Dropping superseded show details");
            return;
        }

        match result {
            Ok(details) => {
                let details = self.mapper.details(details);
                info!(id, title = %details.title, "Fetched show details");
                self.state.send_modify(|s| {
                    s.details = Some(details);
                    s.details_loading = false;
                });
            }
            Err(e) => {
                warn!(id, "Show details fetch failed: {}", e);
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

    /// Flip the favorite flag locally; the next fetch takes TMDb's value again.
    pub async fn toggle_favorite(&self, id: i64) {
        let mut catalogue = self.catalogue.lock().await;
        for show in catalogue.shows.iter_mut().filter(|s| s.id == id) {
            show.favorite = !show.favorite;
        }
        self.state.send_modify(|s| {
            for show in s.shows.iter_mut().filter(|s| s.id == id) {
                show.favorite = !show.favorite;
            }
        });
    }
}
